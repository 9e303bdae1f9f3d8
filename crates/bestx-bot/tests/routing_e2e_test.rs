//! End-to-end routing tests.
//!
//! Runs `Application` with real adapters against two mock venues:
//! - Observation mode never posts an order
//! - Trading mode posts exactly one order, to the better venue
//! - A failed quote stops the run before any order

mod integration;
use integration::common::mock_venue::MockVenueServer;

use axum::http::Method;
use bestx_bot::{AppConfig, AppError, Application, OperatingMode, OrderConfig, RunOutcome};
use bestx_core::{OrderSide, OrderStatus, Size, VenueId};
use bestx_router::RouterError;
use bestx_venue::{Credentials, VenueError};
use rust_decimal_macros::dec;

const BINANCE_TICKER: &str = r#"{"symbol":"BTCUSDT","price":"60000.00"}"#;
const BYBIT_TICKER: &str = r#"{"retCode":0,"retMsg":"OK","result":{"category":"spot","list":[{"symbol":"BTCUSDT","lastPrice":"60050.00"}]}}"#;

struct Venues {
    binance: MockVenueServer,
    bybit: MockVenueServer,
}

impl Venues {
    async fn start() -> Self {
        let binance = MockVenueServer::start().await;
        binance.respond(Method::GET, "/api/v3/ticker/price", 200, BINANCE_TICKER);
        binance.respond(
            Method::POST,
            "/api/v3/order",
            200,
            r#"{"symbol":"BTCUSDT","orderId":1,"clientOrderId":"bx_e2e","executedQty":"0.01","cummulativeQuoteQty":"600.00","status":"FILLED"}"#,
        );

        let bybit = MockVenueServer::start().await;
        bybit.respond(Method::GET, "/v5/market/tickers", 200, BYBIT_TICKER);
        bybit.respond(
            Method::POST,
            "/v5/order/create",
            200,
            r#"{"retCode":0,"retMsg":"OK","result":{"orderId":"2","orderLinkId":"bx_e2e"}}"#,
        );

        Self { binance, bybit }
    }

    fn config(&self, mode: OperatingMode, side: OrderSide) -> AppConfig {
        let mut config = AppConfig {
            mode,
            order: OrderConfig {
                side,
                quantity: Size::new(dec!(0.01)),
                ..Default::default()
            },
            ..Default::default()
        };
        config.binance.base_url = Some(self.binance.url());
        config.bybit.base_url = Some(self.bybit.url());
        config
    }

    fn posts(server: &MockVenueServer) -> usize {
        Self::count(server, Method::POST)
    }

    fn gets(server: &MockVenueServer) -> usize {
        Self::count(server, Method::GET)
    }

    fn count(server: &MockVenueServer, method: Method) -> usize {
        server
            .requests()
            .iter()
            .filter(|r| r.method == method)
            .count()
    }
}

fn credentials() -> Credentials {
    let key_path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../bestx-venue/tests/fixtures/test_rsa_key.pem"
    );
    Credentials::from_lookup(|name| {
        match name {
            "BINANCE_API_KEY" => Some("binance-key"),
            "BINANCE_PRIVATE_KEY_PATH" => Some(key_path),
            "BYBIT_API_KEY" => Some("bybit-key"),
            "BYBIT_API_SECRET" => Some("bybit-secret"),
            _ => None,
        }
        .map(str::to_string)
    })
    .unwrap()
}

#[tokio::test]
async fn test_observation_posts_nothing() {
    let venues = Venues::start().await;
    let app = Application::with_credentials(
        venues.config(OperatingMode::Observation, OrderSide::Buy),
        &credentials(),
    )
    .unwrap();

    let outcome = app.run().await.unwrap();

    match outcome {
        RunOutcome::Quoted { buy, sell } => {
            assert_eq!(buy.venue(), VenueId::Binance);
            assert_eq!(sell.venue(), VenueId::Bybit);
        }
        other => panic!("expected quotes, got {other:?}"),
    }
    assert_eq!(Venues::posts(&venues.binance), 0);
    assert_eq!(Venues::posts(&venues.bybit), 0);
    // One ticker request per venue serves both sides.
    assert_eq!(Venues::gets(&venues.binance), 1);
    assert_eq!(Venues::gets(&venues.bybit), 1);
}

#[tokio::test]
async fn test_buy_goes_to_binance() {
    let venues = Venues::start().await;
    let app = Application::with_credentials(
        venues.config(OperatingMode::Trading, OrderSide::Buy),
        &credentials(),
    )
    .unwrap();

    let outcome = app.run().await.unwrap();

    match outcome {
        RunOutcome::Traded(result) => {
            assert_eq!(result.venue, VenueId::Binance);
            assert_eq!(result.status, OrderStatus::Filled);
        }
        other => panic!("expected a trade, got {other:?}"),
    }
    assert_eq!(Venues::posts(&venues.binance), 1);
    assert_eq!(Venues::posts(&venues.bybit), 0);
}

#[tokio::test]
async fn test_sell_goes_to_bybit() {
    let venues = Venues::start().await;
    let app = Application::with_credentials(
        venues.config(OperatingMode::Trading, OrderSide::Sell),
        &credentials(),
    )
    .unwrap();

    let outcome = app.run().await.unwrap();

    match outcome {
        RunOutcome::Traded(result) => {
            assert_eq!(result.venue, VenueId::Bybit);
            assert_eq!(result.status, OrderStatus::Accepted);
        }
        other => panic!("expected a trade, got {other:?}"),
    }
    assert_eq!(Venues::posts(&venues.binance), 0);
    assert_eq!(Venues::posts(&venues.bybit), 1);
}

#[tokio::test]
async fn test_quote_failure_stops_before_order() {
    let venues = Venues::start().await;
    venues
        .bybit
        .respond(Method::GET, "/v5/market/tickers", 503, "maintenance");
    let app = Application::with_credentials(
        venues.config(OperatingMode::Trading, OrderSide::Buy),
        &credentials(),
    )
    .unwrap();

    let err = app.run().await.unwrap_err();

    match err {
        AppError::Router(RouterError::PriceFetch { venue, source }) => {
            assert_eq!(venue, VenueId::Bybit);
            assert!(matches!(source, VenueError::Network(_)));
        }
        other => panic!("expected a price fetch error, got {other:?}"),
    }
    assert_eq!(Venues::posts(&venues.binance), 0);
    assert_eq!(Venues::posts(&venues.bybit), 0);
}
