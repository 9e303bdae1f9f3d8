//! Request signing for venue authentication.
//!
//! Both venues authenticate write requests by signing a canonical payload
//! string. They differ only in the primitive and the output encoding:
//!
//! | venue   | primitive                      | encoding |
//! |---------|--------------------------------|----------|
//! | Binance | RSA PKCS#1 v1.5 over SHA-256   | base64   |
//! | Bybit   | HMAC-SHA256                    | hex      |
//!
//! Adapters build the payload layout their venue expects and hand it to a
//! [`RequestSigner`]; they never touch key material directly.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::credentials::KeySource;
use crate::error::{VenueError, VenueResult};

type HmacSha256 = Hmac<Sha256>;

/// Signs canonical request payloads.
pub trait RequestSigner: Send + Sync {
    /// Sign the payload and return the encoded signature.
    fn sign(&self, payload: &str) -> VenueResult<String>;

    /// Scheme label for logs.
    fn scheme(&self) -> &'static str;
}

/// HMAC-SHA256 signer with lowercase hex output.
pub struct HmacSha256Signer {
    secret: Zeroizing<Vec<u8>>,
}

impl HmacSha256Signer {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Zeroizing::new(secret.as_bytes().to_vec()),
        }
    }
}

impl RequestSigner for HmacSha256Signer {
    fn sign(&self, payload: &str) -> VenueResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| VenueError::Credentials(format!("HMAC key error: {e}")))?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn scheme(&self) -> &'static str {
        "hmac-sha256"
    }
}

/// RSA PKCS#1 v1.5 / SHA-256 signer with standard base64 output.
pub struct RsaSha256Signer {
    key: SigningKey<Sha256>,
}

impl RsaSha256Signer {
    /// Parse a PEM private key.
    ///
    /// Accepts PKCS#8 (`BEGIN PRIVATE KEY`), encrypted PKCS#8
    /// (`BEGIN ENCRYPTED PRIVATE KEY`, password required) and PKCS#1
    /// (`BEGIN RSA PRIVATE KEY`).
    pub fn from_pem(pem: &str, password: Option<&str>) -> VenueResult<Self> {
        let pem = pem.trim();
        let key = if pem.contains("BEGIN ENCRYPTED PRIVATE KEY") {
            let password = password.ok_or_else(|| {
                VenueError::Credentials("encrypted private key requires a password".to_string())
            })?;
            RsaPrivateKey::from_pkcs8_encrypted_pem(pem, password.as_bytes())
                .map_err(|e| VenueError::Credentials(format!("failed to decrypt private key: {e}")))?
        } else if pem.contains("BEGIN RSA PRIVATE KEY") {
            RsaPrivateKey::from_pkcs1_pem(pem)
                .map_err(|e| VenueError::Credentials(format!("invalid PKCS#1 private key: {e}")))?
        } else {
            RsaPrivateKey::from_pkcs8_pem(pem)
                .map_err(|e| VenueError::Credentials(format!("invalid PKCS#8 private key: {e}")))?
        };

        Ok(Self {
            key: SigningKey::<Sha256>::new(key),
        })
    }

    /// Load from a key source.
    pub fn from_source(source: &KeySource, password: Option<&str>) -> VenueResult<Self> {
        let pem = source.read()?;
        Self::from_pem(&pem, password)
    }
}

impl RequestSigner for RsaSha256Signer {
    fn sign(&self, payload: &str) -> VenueResult<String> {
        let signature = self
            .key
            .try_sign(payload.as_bytes())
            .map_err(|e| VenueError::Credentials(format!("RSA signing failed: {e}")))?;
        Ok(BASE64.encode(signature.to_bytes()))
    }

    fn scheme(&self) -> &'static str {
        "rsa-sha256"
    }
}
