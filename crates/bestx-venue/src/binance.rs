//! Binance spot REST adapter.
//!
//! - Price: `GET /api/v3/ticker/price`
//! - Order: `POST /api/v3/order` (MARKET), RSA-signed query string
//!
//! Every request carries the `X-MBX-APIKEY` header. Signed requests append
//! `signature=<base64>` computed over the exact encoded query that precedes it.

use std::sync::Arc;

use bestx_core::{
    ClientOrderId, OrderRequest, OrderResult, OrderSide, OrderStatus, Price, PriceQuote, Size,
    Symbol, VenueId,
};
use reqwest::{Method, StatusCode, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::adapter::{BoxFuture, ExchangeAdapter};
use crate::clock::{Clock, SystemClock};
use crate::config::{BinanceConfig, Network};
use crate::credentials::BinanceCredentials;
use crate::error::{VenueError, VenueResult};
use crate::signer::{RequestSigner, RsaSha256Signer};
use crate::transport::{truncate, RawResponse, RestTransport};

const TICKER_PRICE_PATH: &str = "/api/v3/ticker/price";
const ORDER_PATH: &str = "/api/v3/order";
const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Error codes meaning the key or signature was not accepted.
/// -1002 unauthorized, -1022 bad signature, -2014 bad key format,
/// -2015 invalid key / IP / permissions.
const AUTH_ERROR_CODES: [i64; 4] = [-1002, -1022, -2014, -2015];
/// NEW_ORDER_REJECTED; the message tells why.
const NEW_ORDER_REJECTED: i64 = -2010;

#[derive(Debug, Deserialize)]
struct TickerPriceResponse {
    symbol: String,
    price: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewOrderResponse {
    order_id: i64,
    client_order_id: String,
    status: String,
    #[serde(default)]
    executed_qty: Option<String>,
    #[serde(default)]
    cummulative_quote_qty: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    code: i64,
    msg: String,
}

/// Binance adapter.
pub struct BinanceAdapter {
    transport: RestTransport,
    api_key: String,
    signer: Box<dyn RequestSigner>,
    clock: Arc<dyn Clock>,
    recv_window_ms: u64,
}

impl BinanceAdapter {
    /// Create an adapter from configuration and loaded credentials.
    pub fn new(
        config: &BinanceConfig,
        network: Network,
        credentials: &BinanceCredentials,
    ) -> VenueResult<Self> {
        let password = credentials.key_password.as_ref().map(|p| p.as_str());
        let signer = RsaSha256Signer::from_source(&credentials.private_key, password)?;
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
        config: &BinanceConfig,
        network: Network,
        api_key: String,
        signer: Box<dyn RequestSigner>,
        clock: Arc<dyn Clock>,
    ) -> VenueResult<Self> {
        let base_url = config.base_url(network);
        let transport = RestTransport::new(base_url, config.timeout())?;

        info!(
            venue = %VenueId::Binance,
            base_url = %base_url,
            scheme = signer.scheme(),
            "Binance adapter initialized"
        );

        Ok(Self {
            transport,
            api_key,
            signer,
            clock,
            recv_window_ms: config.recv_window_ms,
        })
    }

    async fn fetch_price(&self, symbol: &Symbol) -> VenueResult<PriceQuote> {
        let mut url = self.transport.endpoint(TICKER_PRICE_PATH)?;
        url.query_pairs_mut().append_pair("symbol", symbol.as_str());

        let request = self
            .transport
            .request(Method::GET, url)
            .header(API_KEY_HEADER, &self.api_key);
        let raw = self.transport.send(request).await?;
        if !raw.is_success() {
            return Err(classify_error(&raw));
        }

        let quote = parse_ticker(&raw, symbol)?;
        debug!(venue = %VenueId::Binance, symbol = %symbol, price = %quote.price, "Fetched price");
        Ok(quote)
    }

    async fn submit_market_order(&self, request: &OrderRequest) -> VenueResult<OrderResult> {
        let cloid = ClientOrderId::new();
        let url = self.signed_order_url(request, &cloid, self.clock.now_ms())?;

        info!(
            venue = %VenueId::Binance,
            symbol = %request.symbol(),
            side = %request.side(),
            quantity = %request.quantity(),
            cloid = %cloid,
            "Submitting market order"
        );

        let http = self
            .transport
            .request(Method::POST, url)
            .header(API_KEY_HEADER, &self.api_key);
        let raw = self.transport.send(http).await?;
        if !raw.is_success() {
            let err = classify_error(&raw);
            warn!(venue = %VenueId::Binance, cloid = %cloid, error = %err, "Order failed");
            return Err(err);
        }

        let result = parse_order_response(&raw)?;
        info!(
            venue = %VenueId::Binance,
            order_id = %result.order_id,
            status = %result.status,
            executed_price = ?result.executed_price,
            executed_quantity = ?result.executed_quantity,
            "Order placed"
        );
        Ok(result)
    }

    /// Build the signed order URL.
    ///
    /// The signature covers the encoded query exactly as sent, so it is
    /// computed from `url.query()` before `signature` is appended.
    fn signed_order_url(
        &self,
        request: &OrderRequest,
        cloid: &ClientOrderId,
        timestamp_ms: u64,
    ) -> VenueResult<Url> {
        let mut url = self.transport.endpoint(ORDER_PATH)?;
        url.query_pairs_mut()
            .append_pair("symbol", request.symbol().as_str())
            .append_pair("side", side_wire(request.side()))
            .append_pair("type", "MARKET")
            .append_pair("quantity", &request.quantity().to_wire())
            .append_pair("newClientOrderId", cloid.as_str())
            .append_pair("recvWindow", &self.recv_window_ms.to_string())
            .append_pair("timestamp", &timestamp_ms.to_string());

        let payload = url.query().unwrap_or_default().to_string();
        let signature = self.signer.sign(&payload)?;
        url.query_pairs_mut().append_pair("signature", &signature);
        Ok(url)
    }
}

impl ExchangeAdapter for BinanceAdapter {
    fn venue(&self) -> VenueId {
        VenueId::Binance
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
        OrderSide::Buy => "BUY",
        OrderSide::Sell => "SELL",
    }
}

fn parse_ticker(raw: &RawResponse, symbol: &Symbol) -> VenueResult<PriceQuote> {
    let ticker: TickerPriceResponse = raw.json()?;
    if ticker.symbol != symbol.as_str() {
        return Err(VenueError::Parse(format!(
            "ticker for {} returned symbol {}",
            symbol, ticker.symbol
        )));
    }
    let price: Price = ticker
        .price
        .parse()
        .map_err(|e| VenueError::Parse(format!("invalid price {:?}: {e}", ticker.price)))?;
    Ok(PriceQuote::new(VenueId::Binance, symbol.clone(), price)?)
}

fn parse_decimal(field: &str, value: Option<&str>) -> VenueResult<Option<Decimal>> {
    value
        .map(|v| {
            v.parse::<Decimal>()
                .map_err(|e| VenueError::Parse(format!("invalid {field} {v:?}: {e}")))
        })
        .transpose()
}

fn parse_order_response(raw: &RawResponse) -> VenueResult<OrderResult> {
    let resp: NewOrderResponse = raw.json()?;

    let executed_qty = parse_decimal("executedQty", resp.executed_qty.as_deref())?.map(Size::new);
    let quote_qty = parse_decimal("cummulativeQuoteQty", resp.cummulative_quote_qty.as_deref())?;
    let executed_price = match (quote_qty, executed_qty) {
        (Some(notional), Some(qty)) => Price::average(notional, qty),
        _ => None,
    };

    Ok(OrderResult {
        venue: VenueId::Binance,
        order_id: resp.order_id.to_string(),
        client_order_id: ClientOrderId::from_string(resp.client_order_id),
        status: map_status(&resp.status, executed_qty),
        executed_price,
        executed_quantity: executed_qty,
    })
}

/// Terminal statuses still count as a partial fill when some quantity executed.
fn map_status(status: &str, executed_qty: Option<Size>) -> OrderStatus {
    match status {
        "FILLED" => OrderStatus::Filled,
        "PARTIALLY_FILLED" => OrderStatus::PartiallyFilled,
        "NEW" | "PENDING_NEW" => OrderStatus::Accepted,
        "REJECTED" | "EXPIRED" | "EXPIRED_IN_MATCH" | "CANCELED" => {
            if executed_qty.is_some_and(|qty| qty.is_positive()) {
                OrderStatus::PartiallyFilled
            } else {
                OrderStatus::Rejected
            }
        }
        other => {
            warn!(venue = %VenueId::Binance, status = other, "Unrecognised order status");
            OrderStatus::Error
        }
    }
}

/// Map a non-2xx response to a venue error kind.
fn classify_error(raw: &RawResponse) -> VenueError {
    if raw.is_transient() {
        return raw.transient_error();
    }

    if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw.body) {
        if AUTH_ERROR_CODES.contains(&err.code) {
            return VenueError::Auth(format!("{} ({})", err.msg, err.code));
        }
        if err.code == NEW_ORDER_REJECTED && err.msg.to_ascii_lowercase().contains("insufficient") {
            return VenueError::InsufficientFunds(err.msg);
        }
        return VenueError::Rejected {
            code: Some(err.code),
            message: err.msg,
        };
    }

    if raw.status == StatusCode::UNAUTHORIZED {
        return VenueError::Auth(format!("HTTP {}", raw.status));
    }

    VenueError::Rejected {
        code: None,
        message: format!("HTTP {}: {}", raw.status, truncate(&raw.body, 256)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::signer::HmacSha256Signer;
    use rust_decimal_macros::dec;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        }
    }

    fn adapter() -> BinanceAdapter {
        BinanceAdapter::with_signer(
            &BinanceConfig::default(),
            Network::Testnet,
            "test-key".to_string(),
            Box::new(HmacSha256Signer::new("stand-in")),
            Arc::new(FixedClock(1_700_000_000_000)),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_ticker() {
        let quote = parse_ticker(
            &raw(200, r#"{"symbol":"BTCUSDT","price":"60000.01000000"}"#),
            &Symbol::default(),
        )
        .unwrap();
        assert_eq!(quote.venue, VenueId::Binance);
        assert_eq!(quote.price, Price::new(dec!(60000.01)));
    }

    #[test]
    fn test_parse_ticker_schema_drift() {
        let missing = parse_ticker(&raw(200, r#"{"symbol":"BTCUSDT"}"#), &Symbol::default());
        assert!(matches!(missing, Err(VenueError::Parse(_))));

        let not_a_number = parse_ticker(
            &raw(200, r#"{"symbol":"BTCUSDT","price":"n/a"}"#),
            &Symbol::default(),
        );
        assert!(matches!(not_a_number, Err(VenueError::Parse(_))));

        let zero = parse_ticker(
            &raw(200, r#"{"symbol":"BTCUSDT","price":"0.00"}"#),
            &Symbol::default(),
        );
        assert!(matches!(zero, Err(VenueError::Parse(_))));

        let other_symbol = parse_ticker(
            &raw(200, r#"{"symbol":"ETHUSDT","price":"3000"}"#),
            &Symbol::default(),
        );
        assert!(matches!(other_symbol, Err(VenueError::Parse(_))));
    }

    #[test]
    fn test_parse_filled_order() {
        let body = r#"{
            "symbol": "BTCUSDT",
            "orderId": 28,
            "orderListId": -1,
            "clientOrderId": "bx_1700000000000_abcd1234",
            "transactTime": 1700000000123,
            "price": "0.00000000",
            "origQty": "0.01000000",
            "executedQty": "0.01000000",
            "cummulativeQuoteQty": "600.50000000",
            "status": "FILLED",
            "timeInForce": "GTC",
            "type": "MARKET",
            "side": "BUY",
            "fills": []
        }"#;
        let result = parse_order_response(&raw(200, body)).unwrap();

        assert_eq!(result.order_id, "28");
        assert_eq!(result.client_order_id.as_str(), "bx_1700000000000_abcd1234");
        assert_eq!(result.status, OrderStatus::Filled);
        assert_eq!(result.executed_price, Some(Price::new(dec!(60050))));
        assert_eq!(result.executed_quantity, Some(Size::new(dec!(0.01))));
    }

    #[test]
    fn test_parse_ack_order_without_fills() {
        let body = r#"{"symbol":"BTCUSDT","orderId":7,"clientOrderId":"c","transactTime":1,"status":"NEW"}"#;
        let result = parse_order_response(&raw(200, body)).unwrap();
        assert_eq!(result.status, OrderStatus::Accepted);
        assert!(result.executed_price.is_none());
        assert!(result.executed_quantity.is_none());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(map_status("PARTIALLY_FILLED", None), OrderStatus::PartiallyFilled);
        assert_eq!(map_status("EXPIRED", None), OrderStatus::Rejected);
        assert_eq!(
            map_status("CANCELED", Some(Size::new(dec!(0)))),
            OrderStatus::Rejected
        );
        assert_eq!(
            map_status("EXPIRED_IN_MATCH", Some(Size::new(dec!(0.001)))),
            OrderStatus::PartiallyFilled
        );
        assert_eq!(map_status("SOMETHING_NEW", None), OrderStatus::Error);
    }

    #[test]
    fn test_parse_expired_market_order_with_fill() {
        let body = r#"{"symbol":"BTCUSDT","orderId":9,"clientOrderId":"c","status":"EXPIRED","executedQty":"0.00500000","cummulativeQuoteQty":"300.00000000"}"#;
        let result = parse_order_response(&raw(200, body)).unwrap();

        assert_eq!(result.status, OrderStatus::PartiallyFilled);
        assert_eq!(result.executed_price, Some(Price::new(dec!(60000))));
        assert_eq!(result.executed_quantity, Some(Size::new(dec!(0.005))));
    }

    #[test]
    fn test_classify_errors() {
        let auth = classify_error(&raw(401, r#"{"code":-2015,"msg":"Invalid API-key, IP, or permissions for action."}"#));
        assert!(matches!(auth, VenueError::Auth(_)));

        let bad_sig = classify_error(&raw(400, r#"{"code":-1022,"msg":"Signature for this request is not valid."}"#));
        assert!(matches!(bad_sig, VenueError::Auth(_)));

        let funds = classify_error(&raw(400, r#"{"code":-2010,"msg":"Account has insufficient balance for requested action."}"#));
        assert!(matches!(funds, VenueError::InsufficientFunds(_)));

        let rejected = classify_error(&raw(400, r#"{"code":-1013,"msg":"Filter failure: LOT_SIZE"}"#));
        assert_eq!(
            rejected,
            VenueError::Rejected {
                code: Some(-1013),
                message: "Filter failure: LOT_SIZE".to_string()
            }
        );

        let rate_limited = classify_error(&raw(429, r#"{"code":-1003,"msg":"Too many requests."}"#));
        assert!(matches!(rate_limited, VenueError::Network(_)));

        let gateway = classify_error(&raw(502, "<html>Bad Gateway</html>"));
        assert!(matches!(gateway, VenueError::Network(_)));

        let bare_401 = classify_error(&raw(401, ""));
        assert!(matches!(bare_401, VenueError::Auth(_)));

        let opaque = classify_error(&raw(400, "oops"));
        assert!(matches!(opaque, VenueError::Rejected { code: None, .. }));
    }

    #[test]
    fn test_signed_order_url_layout() {
        let adapter = adapter();
        let request =
            OrderRequest::new(Symbol::default(), OrderSide::Sell, Size::new(dec!(0.0100))).unwrap();
        let cloid = ClientOrderId::from_string("bx_1700000000000_abcd1234".to_string());

        let url = adapter
            .signed_order_url(&request, &cloid, 1_700_000_000_000)
            .unwrap();
        let query = url.query().unwrap();
        let (payload, signature) = query.rsplit_once("&signature=").unwrap();

        assert_eq!(url.path(), ORDER_PATH);
        assert_eq!(
            payload,
            "symbol=BTCUSDT&side=SELL&type=MARKET&quantity=0.01\
&newClientOrderId=bx_1700000000000_abcd1234&recvWindow=5000&timestamp=1700000000000"
        );
        assert_eq!(
            signature,
            HmacSha256Signer::new("stand-in").sign(payload).unwrap()
        );
    }
}
