//! Exchange adapter trait.
//!
//! Provides a trait-based abstraction over one venue's REST API. This allows
//! for:
//! - Dependency injection for testing the coordinator
//! - Symmetric handling of venues with different auth schemes

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bestx_core::{ClientOrderId, OrderRequest, OrderResult, OrderStatus, Price, PriceQuote, Symbol, VenueId};
use parking_lot::Mutex;

use crate::error::{VenueError, VenueResult};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Translation layer for one venue.
pub trait ExchangeAdapter: Send + Sync {
    /// Venue this adapter talks to.
    fn venue(&self) -> VenueId;

    /// Fetch the latest traded price for `symbol`.
    fn get_price<'a>(&'a self, symbol: &'a Symbol) -> BoxFuture<'a, VenueResult<PriceQuote>>;

    /// Submit a market order.
    ///
    /// Not idempotent: every call places a new order on the venue. Callers
    /// must not retry without knowing whether the previous attempt landed.
    fn place_order<'a>(&'a self, request: &'a OrderRequest)
        -> BoxFuture<'a, VenueResult<OrderResult>>;
}

/// Arc wrapper for ExchangeAdapter trait objects.
pub type DynExchange = Arc<dyn ExchangeAdapter>;

/// Mock adapter for testing.
///
/// Returns a configurable price, fills orders at that price unless told
/// otherwise, and records every call.
#[derive(Debug)]
pub struct MockExchange {
    venue: VenueId,
    price: Mutex<VenueResult<Price>>,
    next_order: Mutex<Option<VenueResult<OrderResult>>>,
    price_calls: AtomicUsize,
    orders: Mutex<Vec<OrderRequest>>,
}

impl MockExchange {
    /// Create a mock quoting `price`.
    pub fn new(venue: VenueId, price: Price) -> Self {
        Self {
            venue,
            price: Mutex::new(Ok(price)),
            next_order: Mutex::new(None),
            price_calls: AtomicUsize::new(0),
            orders: Mutex::new(Vec::new()),
        }
    }

    /// Set the quoted price.
    pub fn set_price(&self, price: Price) {
        *self.price.lock() = Ok(price);
    }

    /// Make price fetches fail.
    pub fn set_price_error(&self, error: VenueError) {
        *self.price.lock() = Err(error);
    }

    /// Set the result returned by the next `place_order` call.
    pub fn set_order_result(&self, result: VenueResult<OrderResult>) {
        *self.next_order.lock() = Some(result);
    }

    /// Number of `get_price` calls.
    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }

    /// Orders received by `place_order`.
    pub fn placed_orders(&self) -> Vec<OrderRequest> {
        self.orders.lock().clone()
    }

    fn default_fill(&self, request: &OrderRequest) -> OrderResult {
        let price = self.price.lock().clone().ok();
        OrderResult {
            venue: self.venue,
            order_id: format!("{}-{}", self.venue, self.orders.lock().len()),
            client_order_id: ClientOrderId::new(),
            status: OrderStatus::Filled,
            executed_price: price,
            executed_quantity: Some(request.quantity()),
        }
    }
}

impl ExchangeAdapter for MockExchange {
    fn venue(&self) -> VenueId {
        self.venue
    }

    fn get_price<'a>(&'a self, symbol: &'a Symbol) -> BoxFuture<'a, VenueResult<PriceQuote>> {
        Box::pin(async move {
            self.price_calls.fetch_add(1, Ordering::SeqCst);
            let price = self.price.lock().clone()?;
            Ok(PriceQuote::new(self.venue, symbol.clone(), price)?)
        })
    }

    fn place_order<'a>(
        &'a self,
        request: &'a OrderRequest,
    ) -> BoxFuture<'a, VenueResult<OrderResult>> {
        Box::pin(async move {
            self.orders.lock().push(request.clone());
            match self.next_order.lock().take() {
                Some(result) => result,
                None => Ok(self.default_fill(request)),
            }
        })
    }
}
