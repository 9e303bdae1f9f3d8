//! Application wiring.
//!
//! Builds both venue adapters from configuration and credentials, hands
//! them to the trading coordinator, and runs one pass in the configured
//! mode.

use std::sync::Arc;

use bestx_core::OrderResult;
use bestx_router::{RouteDecision, TradingCoordinator};
use bestx_venue::{BinanceAdapter, BybitAdapter, Credentials, DynExchange};
use tracing::info;

use crate::config::{AppConfig, OperatingMode};
use crate::error::AppResult;

/// What one run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Observation mode: best venue per side, no order placed.
    Quoted {
        buy: RouteDecision,
        sell: RouteDecision,
    },
    /// Trading mode: the placed order.
    Traded(OrderResult),
}

/// Main application.
pub struct Application {
    config: AppConfig,
    coordinator: TradingCoordinator,
}

impl Application {
    /// Create the application, reading credentials from the environment.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let credentials = Credentials::from_env()?;
        Self::with_credentials(config, &credentials)
    }

    /// Create the application with explicit credentials.
    pub fn with_credentials(config: AppConfig, credentials: &Credentials) -> AppResult<Self> {
        config.validate()?;

        let binance: DynExchange = Arc::new(BinanceAdapter::new(
            &config.binance,
            config.network,
            &credentials.binance,
        )?);
        let bybit: DynExchange = Arc::new(BybitAdapter::new(
            &config.bybit,
            config.network,
            &credentials.bybit,
        )?);

        let coordinator = TradingCoordinator::new(binance, bybit, config.router)?;
        Ok(Self::from_parts(config, coordinator))
    }

    /// Create the application around an existing coordinator.
    pub fn from_parts(config: AppConfig, coordinator: TradingCoordinator) -> Self {
        Self {
            config,
            coordinator,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &TradingCoordinator {
        &self.coordinator
    }

    /// Run once in the configured mode.
    pub async fn run(&self) -> AppResult<RunOutcome> {
        info!(
            mode = ?self.config.mode,
            network = ?self.config.network,
            symbol = %self.config.order.symbol,
            "Starting run"
        );

        match self.config.mode {
            OperatingMode::Observation => self.observe().await,
            OperatingMode::Trading => self.trade().await,
        }
    }

    async fn observe(&self) -> AppResult<RunOutcome> {
        let symbol = &self.config.order.symbol;
        let (buy, sell) = self.coordinator.best_quotes(symbol).await?;

        info!(
            symbol = %symbol,
            buy_venue = %buy.venue(),
            buy_price = %buy.price(),
            sell_venue = %sell.venue(),
            sell_price = %sell.price(),
            "Best venues (observation mode, no order placed)"
        );

        Ok(RunOutcome::Quoted { buy, sell })
    }

    async fn trade(&self) -> AppResult<RunOutcome> {
        let request = self.config.order_request()?;

        let result = match self.config.order.venue {
            Some(venue) => {
                info!(venue = %venue, "Venue override set, skipping price comparison");
                self.coordinator.place_order_on(venue, &request).await?
            }
            None => self.coordinator.execute_request(&request).await?,
        };

        Ok(RunOutcome::Traded(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestx_core::{OrderSide, Price, Size, VenueId};
    use bestx_router::RouterConfig;
    use bestx_venue::MockExchange;
    use rust_decimal_macros::dec;

    use crate::config::OrderConfig;

    struct Fixture {
        binance: Arc<MockExchange>,
        bybit: Arc<MockExchange>,
        app: Application,
    }

    fn fixture(config: AppConfig) -> Fixture {
        let binance = Arc::new(MockExchange::new(VenueId::Binance, Price::new(dec!(60000))));
        let bybit = Arc::new(MockExchange::new(VenueId::Bybit, Price::new(dec!(60050))));
        let coordinator = TradingCoordinator::new(
            binance.clone() as DynExchange,
            bybit.clone() as DynExchange,
            RouterConfig::default(),
        )
        .unwrap();
        Fixture {
            binance,
            bybit,
            app: Application::from_parts(config, coordinator),
        }
    }

    #[tokio::test]
    async fn test_observation_places_no_order() {
        let f = fixture(AppConfig::default());

        let outcome = f.app.run().await.unwrap();

        match outcome {
            RunOutcome::Quoted { buy, sell } => {
                assert_eq!(buy.venue(), VenueId::Binance);
                assert_eq!(sell.venue(), VenueId::Bybit);
            }
            other => panic!("expected quotes, got {other:?}"),
        }
        assert!(f.binance.placed_orders().is_empty());
        assert!(f.bybit.placed_orders().is_empty());
        assert_eq!(f.binance.price_calls(), 1);
        assert_eq!(f.bybit.price_calls(), 1);
    }

    #[tokio::test]
    async fn test_trading_routes_configured_order() {
        let config = AppConfig {
            mode: OperatingMode::Trading,
            order: OrderConfig {
                side: OrderSide::Sell,
                quantity: Size::new(dec!(0.01)),
                ..Default::default()
            },
            ..Default::default()
        };
        let f = fixture(config);

        let outcome = f.app.run().await.unwrap();

        match outcome {
            RunOutcome::Traded(result) => assert_eq!(result.venue, VenueId::Bybit),
            other => panic!("expected a trade, got {other:?}"),
        }
        assert_eq!(f.bybit.placed_orders().len(), 1);
        assert!(f.binance.placed_orders().is_empty());
    }

    #[tokio::test]
    async fn test_venue_override_skips_quotes() {
        let config = AppConfig {
            mode: OperatingMode::Trading,
            order: OrderConfig {
                venue: Some(VenueId::Bybit),
                ..Default::default()
            },
            ..Default::default()
        };
        let f = fixture(config);

        let outcome = f.app.run().await.unwrap();

        assert!(matches!(outcome, RunOutcome::Traded(ref r) if r.venue == VenueId::Bybit));
        assert_eq!(f.binance.price_calls(), 0);
        assert_eq!(f.bybit.price_calls(), 0);
    }
}
