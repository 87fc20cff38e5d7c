//! Delete flow: `Idle -> Confirming -> Deleting -> {Deleted, Idle}`.
//!
//! A failed delete reports its error and drops back to `Idle`; the record is assumed
//! to still exist.

use super::{Transition, ViewScope};
use crate::{
    core::{
        gateway::ProductGateway,
        product::{Product, ProductId},
        routes::Route,
    },
    errors::Error,
};
use tracing::{debug, info, warn};

/// The record a delete is aimed at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteTarget {
    /// Record to remove
    pub id: ProductId,
    /// Display name shown in the confirmation prompt
    pub name: String,
}

impl From<&Product> for DeleteTarget {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.fields.name.clone(),
        }
    }
}

/// States of the delete flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteState {
    /// Nothing requested
    Idle,
    /// Waiting for the user to confirm
    Confirming(DeleteTarget),
    /// Waiting for the store
    Deleting(DeleteTarget),
    /// Gone
    Deleted(DeleteTarget),
}

/// Confirmation-gated removal of a product.
#[derive(Debug)]
pub struct DeleteFlow {
    state: DeleteState,
    last_error: Option<Error>,
    scope: ViewScope,
}

impl DeleteFlow {
    /// A flow in `Idle`.
    #[must_use]
    pub const fn new(scope: ViewScope) -> Self {
        Self {
            state: DeleteState::Idle,
            last_error: None,
            scope,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &DeleteState {
        &self.state
    }

    /// The error of the last failed attempt, until the next request.
    #[must_use]
    pub const fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Takes the error of the last failed attempt, leaving none behind.
    pub const fn take_error(&mut self) -> Option<Error> {
        self.last_error.take()
    }

    /// Asks for confirmation to delete `target`.
    pub fn request(&mut self, target: DeleteTarget) -> Transition {
        if self.state != DeleteState::Idle {
            return Transition::Ignored;
        }
        debug!(product_id = %target.id, "Delete requested");
        self.last_error = None;
        self.state = DeleteState::Confirming(target);
        Transition::Applied
    }

    /// Question to show while confirming.
    #[must_use]
    pub fn prompt(&self) -> Option<String> {
        match &self.state {
            DeleteState::Confirming(target) => Some(format!(
                "Are you sure you want to delete \"{}\"?",
                target.name
            )),
            _ => None,
        }
    }

    /// Abandons the request. No store call is made.
    pub fn cancel(&mut self) -> Transition {
        if !matches!(self.state, DeleteState::Confirming(_)) {
            return Transition::Ignored;
        }
        self.state = DeleteState::Idle;
        Transition::Applied
    }

    /// Deletes the confirmed target.
    pub async fn confirm(&mut self, gateway: &dyn ProductGateway) -> Transition {
        let DeleteState::Confirming(target) = &self.state else {
            return Transition::Ignored;
        };
        let target = target.clone();

        self.state = DeleteState::Deleting(target.clone());
        let result = gateway.delete_by_id(&target.id).await;

        if !self.scope.is_active() {
            debug!(product_id = %target.id, "Delete result arrived after the view closed; discarding");
            self.state = DeleteState::Confirming(target);
            return Transition::Discarded;
        }

        match result {
            Ok(()) => {
                info!(product_id = %target.id, "Product '{}' deleted", target.name);
                self.state = DeleteState::Deleted(target);
            }
            Err(e) => {
                warn!(product_id = %target.id, "Product '{}' could not be deleted: {e}", target.name);
                self.last_error = Some(e);
                self.state = DeleteState::Idle;
            }
        }
        Transition::Applied
    }

    /// Where to go once the flow is done: away from the deleted record.
    #[must_use]
    pub const fn next_route(&self) -> Option<Route> {
        match self.state {
            DeleteState::Deleted(_) => Some(Route::Home),
            _ => None,
        }
    }
}
