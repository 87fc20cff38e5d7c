//! Record lifecycle flows - create, edit and delete as explicit state machines.
//!
//! Every flow belongs to a [`ViewScope`]. Gateway calls cannot be cancelled, so a
//! result that arrives after the scope was closed is dropped without touching the
//! flow state.

pub mod create;
pub mod delete;
pub mod edit;

pub use create::{CreateFlow, CreateState};
pub use delete::{DeleteFlow, DeleteState, DeleteTarget};
pub use edit::{EditFlow, EditState};

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Liveness of the view that started a flow.
///
/// Clones share the same flag; closing any clone closes them all.
#[derive(Clone, Debug)]
pub struct ViewScope {
    active: Arc<AtomicBool>,
}

impl ViewScope {
    /// A new, active scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Marks the view as torn down.
    pub fn close(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// False once the view has been torn down.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

/// What a flow did with a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The flow moved to a new state
    Applied,
    /// The request is not valid in the current state; nothing happened
    Ignored,
    /// The store answered after the view closed; the answer was dropped and the
    /// state from before the call restored
    Discarded,
}
