//! Single product page.

use crate::{
    core::{
        flows::{Transition, ViewScope},
        gateway::ProductGateway,
        product::{Product, ProductId},
        routes::Route,
    },
    errors::Error,
};
use std::fmt;
use tracing::debug;

/// Stock badge shown next to the price.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StockStatus {
    /// Units available
    InStock(i64),
    /// Nothing left
    SoldOut,
}

impl StockStatus {
    /// Badge for a stock level.
    #[must_use]
    pub const fn from_stock(stock: i64) -> Self {
        if stock > 0 {
            Self::InStock(stock)
        } else {
            Self::SoldOut
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InStock(units) => f.pad(&format!("{units} in stock")),
            Self::SoldOut => f.pad("Sold out"),
        }
    }
}

/// States of the detail page.
#[derive(Debug)]
pub enum DetailState {
    /// Fetching
    Loading,
    /// Fetched
    Found(Product),
    /// No record with this id
    NotFound,
    /// The fetch failed
    Failed(Error),
}

/// The detail page for one product.
#[derive(Debug)]
pub struct DetailView {
    id: ProductId,
    state: DetailState,
    scope: ViewScope,
}

impl DetailView {
    /// Starts in `Loading`.
    #[must_use]
    pub const fn new(id: ProductId, scope: ViewScope) -> Self {
        Self {
            id,
            state: DetailState::Loading,
            scope,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &DetailState {
        &self.state
    }

    /// Consumes the view, returning its final state.
    #[must_use]
    pub fn into_state(self) -> DetailState {
        self.state
    }

    /// The product, once found.
    #[must_use]
    pub const fn product(&self) -> Option<&Product> {
        match &self.state {
            DetailState::Found(product) => Some(product),
            _ => None,
        }
    }

    /// Fetches the product.
    pub async fn load(&mut self, gateway: &dyn ProductGateway) -> Transition {
        if !matches!(self.state, DetailState::Loading | DetailState::Failed(_)) {
            return Transition::Ignored;
        }
        let result = gateway.get_by_id(&self.id).await;

        if !self.scope.is_active() {
            debug!(product_id = %self.id, "Detail load arrived after the view closed; discarding");
            return Transition::Discarded;
        }

        self.state = match result {
            Ok(Some(product)) => DetailState::Found(product),
            Ok(None) => DetailState::NotFound,
            Err(e) => DetailState::Failed(e),
        };
        Transition::Applied
    }

    /// A missing product sends the user back to the list.
    #[must_use]
    pub const fn next_route(&self) -> Option<Route> {
        match self.state {
            DetailState::NotFound => Some(Route::Catalog),
            _ => None,
        }
    }
}
