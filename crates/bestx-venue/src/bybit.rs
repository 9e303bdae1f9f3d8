//! Bybit v5 REST adapter.
//!
//! - Price: `GET /v5/market/tickers` (public), `result.list[0].lastPrice`
//! - Order: `POST /v5/order/create` (Market), HMAC-signed JSON body
//!
//! Every response is wrapped in `{retCode, retMsg, result}`; a non-zero
//! `retCode` is an error even on HTTP 200.

use std::sync::Arc;

use bestx_core::{
    ClientOrderId, OrderRequest, OrderResult, OrderSide, OrderStatus, Price, PriceQuote, Symbol,
    VenueId,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::adapter::{BoxFuture, ExchangeAdapter};
use crate::clock::{Clock, SystemClock};
use crate::config::{BybitConfig, Network};
use crate::credentials::BybitCredentials;
use crate::error::{VenueError, VenueResult};
use crate::signer::{HmacSha256Signer, RequestSigner};
use crate::transport::{truncate, RawResponse, RestTransport};

const TICKERS_PATH: &str = "/v5/market/tickers";
const ORDER_CREATE_PATH: &str = "/v5/order/create";

const HEADER_API_KEY: &str = "X-BAPI-API-KEY";
const HEADER_SIGN: &str = "X-BAPI-SIGN";
const HEADER_SIGN_TYPE: &str = "X-BAPI-SIGN-TYPE";
const HEADER_TIMESTAMP: &str = "X-BAPI-TIMESTAMP";
const HEADER_RECV_WINDOW: &str = "X-BAPI-RECV-WINDOW";
/// Sign type 2 = HMAC-SHA256.
const SIGN_TYPE_HMAC: &str = "2";

/// 10003 invalid key, 10004 bad signature, 10005 permission denied,
/// 10007 auth failed, 10009 IP banned, 33004 key expired.
const AUTH_RET_CODES: [i64; 6] = [10003, 10004, 10005, 10007, 10009, 33004];
/// Insufficient balance / margin codes across spot and derivatives.
const INSUFFICIENT_FUNDS_RET_CODES: [i64; 4] = [110004, 110007, 110012, 170131];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    ret_code: i64,
    #[serde(default)]
    ret_msg: String,
    #[serde(default)]
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct TickersResult {
    list: Vec<TickerEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TickerEntry {
    symbol: String,
    last_price: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderResult {
    order_id: String,
    #[serde(default)]
    order_link_id: String,
}

/// Body of `POST /v5/order/create`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderBody<'a> {
    category: &'a str,
    symbol: &'a str,
    side: &'static str,
    order_type: &'static str,
    qty: String,
    order_link_id: &'a str,
    /// Spot market buys read `qty` in quote coin unless this is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    market_unit: Option<&'static str>,
}

/// Bybit adapter.
pub struct BybitAdapter {
    transport: RestTransport,
    api_key: String,
    signer: Box<dyn RequestSigner>,
    clock: Arc<dyn Clock>,
    recv_window_ms: u64,
    category: String,
}

impl BybitAdapter {
    /// Create an adapter from configuration and loaded credentials.
    pub fn new(
        config: &BybitConfig,
        network: Network,
        credentials: &BybitCredentials,
    ) -> VenueResult<Self> {
        let signer = HmacSha256Signer::new(&credentials.api_secret);
        Self::with_signer(
            config,
            network,
            credentials.api_key.clone(),
            Box::new(signer),
            Arc::new(SystemClock),
        )
    }

    /// Create an adapter with an explicit signer and clock.
    pub fn with_signer(
        config: &BybitConfig,
        network: Network,
        api_key: String,
        signer: Box<dyn RequestSigner>,
        clock: Arc<dyn Clock>,
    ) -> VenueResult<Self> {
        let base_url = config.base_url(network);
        let transport = RestTransport::new(base_url, config.timeout())?;

        info!(
            venue = %VenueId::Bybit,
            base_url = %base_url,
            category = %config.category,
            scheme = signer.scheme(),
            "Bybit adapter initialized"
        );

        Ok(Self {
            transport,
            api_key,
            signer,
            clock,
            recv_window_ms: config.recv_window_ms,
            category: config.category.clone(),
        })
    }

    async fn fetch_price(&self, symbol: &Symbol) -> VenueResult<PriceQuote> {
        let mut url = self.transport.endpoint(TICKERS_PATH)?;
        url.query_pairs_mut()
            .append_pair("category", &self.category)
            .append_pair("symbol", symbol.as_str());

        let raw = self
            .transport
            .send(self.transport.request(Method::GET, url))
            .await?;
        let result = unwrap_envelope(&raw)?;

        let quote = parse_tickers(result, symbol)?;
        debug!(venue = %VenueId::Bybit, symbol = %symbol, price = %quote.price, "Fetched price");
        Ok(quote)
    }

    async fn submit_market_order(&self, request: &OrderRequest) -> VenueResult<OrderResult> {
        let cloid = ClientOrderId::new();
        let body = self.order_body(request, &cloid)?;
        let timestamp = self.clock.now_ms().to_string();
        let recv_window = self.recv_window_ms.to_string();
        let signature = self
            .signer
            .sign(&signing_payload(&timestamp, &self.api_key, &recv_window, &body))?;

        info!(
            venue = %VenueId::Bybit,
            symbol = %request.symbol(),
            side = %request.side(),
            quantity = %request.quantity(),
            cloid = %cloid,
            "Submitting market order"
        );

        let url = self.transport.endpoint(ORDER_CREATE_PATH)?;
        let http = self
            .transport
            .request(Method::POST, url)
            .header(CONTENT_TYPE, "application/json")
            .header(HEADER_API_KEY, &self.api_key)
            .header(HEADER_SIGN, signature)
            .header(HEADER_SIGN_TYPE, SIGN_TYPE_HMAC)
            .header(HEADER_TIMESTAMP, timestamp)
            .header(HEADER_RECV_WINDOW, recv_window)
            .body(body);

        let raw = self.transport.send(http).await?;
        let result = match unwrap_envelope(&raw) {
            Ok(result) => result,
            Err(err) => {
                warn!(venue = %VenueId::Bybit, cloid = %cloid, error = %err, "Order failed");
                return Err(err);
            }
        };

        let created: CreateOrderResult = serde_json::from_value(result)
            .map_err(|e| VenueError::Parse(format!("invalid order/create result: {e}")))?;

        let client_order_id = if created.order_link_id.is_empty() {
            cloid
        } else {
            ClientOrderId::from_string(created.order_link_id)
        };

        info!(
            venue = %VenueId::Bybit,
            order_id = %created.order_id,
            "Order accepted"
        );

        Ok(OrderResult {
            venue: VenueId::Bybit,
            order_id: created.order_id,
            client_order_id,
            status: OrderStatus::Accepted,
            executed_price: None,
            executed_quantity: None,
        })
    }

    fn order_body(&self, request: &OrderRequest, cloid: &ClientOrderId) -> VenueResult<String> {
        let body = CreateOrderBody {
            category: &self.category,
            symbol: request.symbol().as_str(),
            side: side_wire(request.side()),
            order_type: "Market",
            qty: request.quantity().to_wire(),
            order_link_id: cloid.as_str(),
            market_unit: (self.category == "spot").then_some("baseCoin"),
        };
        serde_json::to_string(&body)
            .map_err(|e| VenueError::Parse(format!("failed to encode order body: {e}")))
    }
}

impl ExchangeAdapter for BybitAdapter {
    fn venue(&self) -> VenueId {
        VenueId::Bybit
    }

    fn get_price<'a>(&'a self, symbol: &'a Symbol) -> BoxFuture<'a, VenueResult<PriceQuote>> {
        Box::pin(self.fetch_price(symbol))
    }

    fn place_order<'a>(
        &'a self,
        request: &'a OrderRequest,
    ) -> BoxFuture<'a, VenueResult<OrderResult>> {
        Box::pin(self.submit_market_order(request))
    }
}

fn side_wire(side: OrderSide) -> &'static str {
    match side {
        OrderSide::Buy => "Buy",
        OrderSide::Sell => "Sell",
    }
}

/// `timestamp + api_key + recv_window + payload`
fn signing_payload(timestamp: &str, api_key: &str, recv_window: &str, payload: &str) -> String {
    format!("{timestamp}{api_key}{recv_window}{payload}")
}

/// Check HTTP status and `retCode`, returning `result` on success.
fn unwrap_envelope(raw: &RawResponse) -> VenueResult<serde_json::Value> {
    if raw.is_transient() {
        return Err(raw.transient_error());
    }

    let envelope = match serde_json::from_str::<Envelope>(&raw.body) {
        Ok(envelope) => envelope,
        Err(e) if raw.is_success() => {
            return Err(VenueError::Parse(format!(
                "{e}; body: {}",
                truncate(&raw.body, 256)
            )))
        }
        Err(_) if raw.status == StatusCode::UNAUTHORIZED => {
            return Err(VenueError::Auth(format!("HTTP {}", raw.status)))
        }
        Err(_) => {
            return Err(VenueError::Rejected {
                code: None,
                message: format!("HTTP {}: {}", raw.status, truncate(&raw.body, 256)),
            })
        }
    };

    if envelope.ret_code != 0 {
        return Err(classify_ret_code(envelope.ret_code, envelope.ret_msg));
    }
    if !raw.is_success() {
        return Err(VenueError::Rejected {
            code: None,
            message: format!("HTTP {}: {}", raw.status, envelope.ret_msg),
        });
    }

    Ok(envelope.result)
}

fn classify_ret_code(code: i64, message: String) -> VenueError {
    if AUTH_RET_CODES.contains(&code) {
        VenueError::Auth(format!("{message} ({code})"))
    } else if INSUFFICIENT_FUNDS_RET_CODES.contains(&code) {
        VenueError::InsufficientFunds(format!("{message} ({code})"))
    } else {
        VenueError::Rejected {
            code: Some(code),
            message,
        }
    }
}

fn parse_tickers(result: serde_json::Value, symbol: &Symbol) -> VenueResult<PriceQuote> {
    let tickers: TickersResult = serde_json::from_value(result)
        .map_err(|e| VenueError::Parse(format!("invalid tickers result: {e}")))?;

    let entry = tickers
        .list
        .into_iter()
        .find(|t| t.symbol == symbol.as_str())
        .ok_or_else(|| VenueError::Parse(format!("no ticker returned for {symbol}")))?;

    let last_price = entry
        .last_price
        .ok_or_else(|| VenueError::Parse(format!("ticker for {symbol} has no lastPrice")))?;
    let price: Price = last_price
        .parse()
        .map_err(|e| VenueError::Parse(format!("invalid lastPrice {last_price:?}: {e}")))?;

    Ok(PriceQuote::new(VenueId::Bybit, symbol.clone(), price)?)
}
