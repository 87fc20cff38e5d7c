//! Create flow: `Editing -> Submitting -> {Created, Failed}`.

use super::{Transition, ViewScope};
use crate::{
    core::{
        gateway::ProductGateway,
        product::ProductId,
        routes::Route,
        validation::{Field, ProductForm, ValidationErrors},
    },
    errors::Error,
};
use tracing::{debug, info, warn};

/// States of the create flow.
#[derive(Debug)]
pub enum CreateState {
    /// The user is filling in the form. `errors` holds the last failed validation.
    Editing {
        /// Per-field messages from the last submit attempt
        errors: Option<ValidationErrors>,
    },
    /// Waiting for the store
    Submitting,
    /// The store accepted the record
    Created(ProductId),
    /// The store rejected the write; the form is kept for another attempt
    Failed(Error),
}

/// A new-product form and its submission.
#[derive(Debug)]
pub struct CreateFlow {
    form: ProductForm,
    state: CreateState,
    scope: ViewScope,
}

impl CreateFlow {
    /// Starts with an empty form.
    #[must_use]
    pub fn new(scope: ViewScope) -> Self {
        Self::with_form(ProductForm::default(), scope)
    }

    /// Starts with the given form contents.
    #[must_use]
    pub const fn with_form(form: ProductForm, scope: ViewScope) -> Self {
        Self {
            form,
            state: CreateState::Editing { errors: None },
            scope,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &CreateState {
        &self.state
    }

    /// Consumes the flow, returning its final state.
    #[must_use]
    pub fn into_state(self) -> CreateState {
        self.state
    }

    /// The form as currently filled in.
    #[must_use]
    pub const fn form(&self) -> &ProductForm {
        &self.form
    }

    /// The form, while it can still be edited.
    pub fn form_mut(&mut self) -> Option<&mut ProductForm> {
        match self.state {
            CreateState::Editing { .. } | CreateState::Failed(_) => Some(&mut self.form),
            CreateState::Submitting | CreateState::Created(_) => None,
        }
    }

    /// Inline message for one field from the last submit attempt.
    #[must_use]
    pub fn field_error(&self, field: Field) -> Option<&str> {
        match &self.state {
            CreateState::Editing {
                errors: Some(errors),
            } => errors.get(field),
            _ => None,
        }
    }

    /// Validates the form and, if it passes, creates the record.
    ///
    /// A validation failure stays in `Editing` and never reaches the gateway.
    pub async fn submit(&mut self, gateway: &dyn ProductGateway) -> Transition {
        if !matches!(
            self.state,
            CreateState::Editing { .. } | CreateState::Failed(_)
        ) {
            return Transition::Ignored;
        }

        let fields = match self.form.validate() {
            Ok(fields) => fields,
            Err(errors) => {
                debug!("Create form rejected: {errors}");
                self.state = CreateState::Editing {
                    errors: Some(errors),
                };
                return Transition::Applied;
            }
        };

        let previous = std::mem::replace(&mut self.state, CreateState::Submitting);
        let result = gateway.create(&fields).await;

        if !self.scope.is_active() {
            debug!("Create result arrived after the view closed; discarding");
            self.state = previous;
            return Transition::Discarded;
        }

        self.state = match result {
            Ok(id) => {
                info!(product_id = %id, "Product '{}' created", fields.name);
                CreateState::Created(id)
            }
            Err(e) => {
                warn!("Product '{}' could not be created: {e}", fields.name);
                CreateState::Failed(e)
            }
        };
        Transition::Applied
    }

    /// Where to go once the flow is done.
    #[must_use]
    pub const fn next_route(&self) -> Option<Route> {
        match self.state {
            CreateState::Created(_) => Some(Route::Home),
            _ => None,
        }
    }
}
