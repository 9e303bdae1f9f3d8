//! Trading coordinator.
//!
//! Holds one adapter per venue. For every order it asks both venues for a
//! fresh price, picks the better one and places the order there exactly
//! once. Nothing is cached between calls and nothing is retried.
//!
//! # Failure Order
//!
//! 1. Either price fetch fails   → PriceFetch (no order placed)
//! 2. Selected venue fails order → OrderPlacement (other venue untouched)

use bestx_core::{OrderRequest, OrderResult, OrderSide, PriceQuote, Size, Symbol, VenueId};
use bestx_venue::{DynExchange, VenueError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{RouterError, RouterResult};
use crate::selection::{select_venue, RouteDecision};

/// Routing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Venue that wins when both quote the same price. Default: binance.
    #[serde(default = "default_preferred_venue")]
    pub preferred_venue: VenueId,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            preferred_venue: default_preferred_venue(),
        }
    }
}

fn default_preferred_venue() -> VenueId {
    VenueId::Binance
}

/// Routes market orders to the better-priced of two venues.
pub struct TradingCoordinator {
    /// Adapters sorted by venue id; errors from simultaneous failures are
    /// attributed to `first`.
    first: DynExchange,
    second: DynExchange,
    config: RouterConfig,
}

impl TradingCoordinator {
    /// Create a coordinator over two adapters for distinct venues.
    pub fn new(a: DynExchange, b: DynExchange, config: RouterConfig) -> RouterResult<Self> {
        if a.venue() == b.venue() {
            return Err(RouterError::DuplicateVenue(a.venue()));
        }
        let (first, second) = if a.venue() < b.venue() { (a, b) } else { (b, a) };

        info!(
            venues = ?[first.venue(), second.venue()],
            preferred_venue = %config.preferred_venue,
            "Trading coordinator ready"
        );

        Ok(Self {
            first,
            second,
            config,
        })
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Venues in coordinator order.
    pub fn venues(&self) -> [VenueId; 2] {
        [self.first.venue(), self.second.venue()]
    }

    /// Route a market order for `quantity` of `symbol`.
    pub async fn execute(
        &self,
        symbol: Symbol,
        side: OrderSide,
        quantity: Size,
    ) -> RouterResult<OrderResult> {
        let request = OrderRequest::new(symbol, side, quantity)?;
        self.execute_request(&request).await
    }

    /// Route an already validated order request.
    pub async fn execute_request(&self, request: &OrderRequest) -> RouterResult<OrderResult> {
        let decision = self.best_quote(request.symbol(), request.side()).await?;

        info!(
            venue = %decision.venue(),
            symbol = %request.symbol(),
            side = %request.side(),
            quantity = %request.quantity(),
            price = %decision.price(),
            other_venue = %decision.other.venue,
            other_price = %decision.other.price,
            improvement_bps = ?decision.improvement_bps(),
            tie = decision.is_tie(),
            "Routing order"
        );

        self.place_order_on(decision.venue(), request).await
    }

    /// Fetch both prices and select the venue for `side` without trading.
    pub async fn best_quote(&self, symbol: &Symbol, side: OrderSide) -> RouterResult<RouteDecision> {
        let (first, second) = self.quotes(symbol).await?;
        Ok(select_venue(side, first, second, self.config.preferred_venue))
    }

    /// Best buy and sell venue from a single fetch of both prices.
    pub async fn best_quotes(
        &self,
        symbol: &Symbol,
    ) -> RouterResult<(RouteDecision, RouteDecision)> {
        let (first, second) = self.quotes(symbol).await?;
        let preferred = self.config.preferred_venue;
        let buy = select_venue(OrderSide::Buy, first.clone(), second.clone(), preferred);
        let sell = select_venue(OrderSide::Sell, first, second, preferred);
        Ok((buy, sell))
    }

    async fn quotes(&self, symbol: &Symbol) -> RouterResult<(PriceQuote, PriceQuote)> {
        let (first, second) = tokio::join!(
            self.first.get_price(symbol),
            self.second.get_price(symbol)
        );

        let first = first.map_err(|source| price_fetch_failed(self.first.venue(), source))?;
        let second = second.map_err(|source| price_fetch_failed(self.second.venue(), source))?;

        debug!(
            symbol = %symbol,
            first_venue = %first.venue,
            first_price = %first.price,
            second_venue = %second.venue,
            second_price = %second.price,
            "Quotes received"
        );

        Ok((first, second))
    }

    /// Place `request` on `venue` directly, skipping price comparison.
    pub async fn place_order_on(
        &self,
        venue: VenueId,
        request: &OrderRequest,
    ) -> RouterResult<OrderResult> {
        let adapter = self.adapter(venue);

        match adapter.place_order(request).await {
            Ok(result) => {
                info!(
                    venue = %venue,
                    order_id = %result.order_id,
                    client_order_id = %result.client_order_id,
                    status = %result.status,
                    executed_price = ?result.executed_price,
                    executed_quantity = ?result.executed_quantity,
                    "Order completed"
                );
                Ok(result)
            }
            Err(source) => {
                warn!(
                    venue = %venue,
                    kind = source.kind(),
                    error = %source,
                    "Order placement failed"
                );
                Err(RouterError::OrderPlacement { venue, source })
            }
        }
    }

    fn adapter(&self, venue: VenueId) -> &DynExchange {
        if self.first.venue() == venue {
            &self.first
        } else {
            &self.second
        }
    }
}

fn price_fetch_failed(venue: VenueId, source: VenueError) -> RouterError {
    warn!(
        venue = %venue,
        kind = source.kind(),
        error = %source,
        "Price fetch failed, no order placed"
    );
    RouterError::PriceFetch { venue, source }
}
