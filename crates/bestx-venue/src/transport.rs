//! Shared REST transport for venue adapters.
//!
//! Owns the HTTP client and base endpoint, sends one request, and turns
//! transport failures into [`VenueError::Network`]. Response bodies are
//! returned raw; schema and error-code interpretation belong to the adapter.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{VenueError, VenueResult};

/// Default timeout for venue requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Status code and body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// 5xx, 429 (rate limit) and 418 (temporary IP ban) mean the venue
    /// could not process the request at all.
    pub fn is_transient(&self) -> bool {
        self.status.is_server_error()
            || self.status == StatusCode::TOO_MANY_REQUESTS
            || self.status == StatusCode::IM_A_TEAPOT
    }

    /// Deserialize the body.
    pub fn json<T: DeserializeOwned>(&self) -> VenueResult<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            VenueError::Parse(format!("{e}; body: {}", truncate(&self.body, 256)))
        })
    }

    /// Error describing a transient failure status.
    pub fn transient_error(&self) -> VenueError {
        VenueError::Network(format!(
            "HTTP {}: {}",
            self.status,
            truncate(&self.body, 256)
        ))
    }
}

/// HTTP client bound to one venue base URL.
#[derive(Debug, Clone)]
pub struct RestTransport {
    client: Client,
    base_url: Url,
}

impl RestTransport {
    /// Create a transport.
    ///
    /// # Arguments
    /// * `base_url` - venue REST root (e.g., "https://api.binance.com")
    /// * `timeout` - per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> VenueResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| VenueError::HttpClient(format!("invalid base URL {base_url}: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VenueError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an absolute API path against the base URL.
    pub fn endpoint(&self, path: &str) -> VenueResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| VenueError::HttpClient(format!("invalid endpoint {path}: {e}")))
    }

    /// Start a request.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send a request and read the full body.
    pub async fn send(&self, request: RequestBuilder) -> VenueResult<RawResponse> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                VenueError::Network(format!("request timed out: {e}"))
            } else if e.is_connect() {
                VenueError::Network(format!("connection failed: {e}"))
            } else {
                VenueError::Network(format!("HTTP request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VenueError::Network(format!("failed to read response body: {e}")))?;

        debug!(%status, bytes = body.len(), "Venue response received");

        Ok(RawResponse { status, body })
    }
}

/// Truncate long bodies for error messages.
pub(crate) fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
