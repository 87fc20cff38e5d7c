//! Edit flow: `Loading -> Ready -> [Confirming ->] Submitting -> {Updated, Failed}`,
//! with `Loading -> NotFound` when the record does not exist.
//!
//! The form only exists in states that were reached through a successful load, so a
//! missing record can never show up as an empty form.

use super::{Transition, ViewScope};
use crate::{
    core::{
        gateway::ProductGateway,
        product::{ProductFields, ProductId},
        routes::Route,
        validation::{Field, ProductForm, ValidationErrors},
    },
    errors::Error,
};
use tracing::{debug, info, warn};

/// States of the edit flow.
#[derive(Debug)]
pub enum EditState {
    /// Fetching the record
    Loading,
    /// The fetch itself failed; loading can be retried
    LoadFailed(Error),
    /// No record with this id
    NotFound,
    /// Form prefilled from the record
    Ready {
        /// Form contents
        form: ProductForm,
        /// Per-field messages from the last save attempt
        errors: Option<ValidationErrors>,
    },
    /// Validated; waiting for the user to confirm the save
    Confirming {
        /// Form contents
        form: ProductForm,
        /// The validated fields that will be written
        fields: ProductFields,
    },
    /// Waiting for the store
    Submitting {
        /// Form contents
        form: ProductForm,
    },
    /// Saved
    Updated,
    /// The store rejected the write; the form is kept for another attempt
    Failed {
        /// Form contents
        form: ProductForm,
        /// Why the write failed
        error: Error,
    },
}

/// Editing one existing product.
#[derive(Debug)]
pub struct EditFlow {
    id: ProductId,
    state: EditState,
    scope: ViewScope,
}

impl EditFlow {
    /// Starts in `Loading` for the given record.
    #[must_use]
    pub const fn new(id: ProductId, scope: ViewScope) -> Self {
        Self {
            id,
            state: EditState::Loading,
            scope,
        }
    }

    /// The record being edited.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &EditState {
        &self.state
    }

    /// Consumes the flow, returning its final state.
    #[must_use]
    pub fn into_state(self) -> EditState {
        self.state
    }

    /// The prefilled form, once loaded.
    #[must_use]
    pub const fn form(&self) -> Option<&ProductForm> {
        match &self.state {
            EditState::Ready { form, .. }
            | EditState::Confirming { form, .. }
            | EditState::Submitting { form }
            | EditState::Failed { form, .. } => Some(form),
            EditState::Loading
            | EditState::LoadFailed(_)
            | EditState::NotFound
            | EditState::Updated => None,
        }
    }

    /// The form, while it can be edited.
    pub fn form_mut(&mut self) -> Option<&mut ProductForm> {
        match &mut self.state {
            EditState::Ready { form, .. } | EditState::Failed { form, .. } => Some(form),
            _ => None,
        }
    }

    /// Inline message for one field from the last save attempt.
    #[must_use]
    pub fn field_error(&self, field: Field) -> Option<&str> {
        match &self.state {
            EditState::Ready {
                errors: Some(errors),
                ..
            } => errors.get(field),
            _ => None,
        }
    }

    /// Fetches the record and prefills the form.
    pub async fn load(&mut self, gateway: &dyn ProductGateway) -> Transition {
        if !matches!(self.state, EditState::Loading | EditState::LoadFailed(_)) {
            return Transition::Ignored;
        }
        let previous = std::mem::replace(&mut self.state, EditState::Loading);

        let result = gateway.get_by_id(&self.id).await;

        if !self.scope.is_active() {
            debug!(product_id = %self.id, "Edit load arrived after the view closed; discarding");
            self.state = previous;
            return Transition::Discarded;
        }

        self.state = match result {
            Ok(Some(product)) => EditState::Ready {
                form: ProductForm::from_fields(&product.fields),
                errors: None,
            },
            Ok(None) => {
                warn!(product_id = %self.id, "Product to edit does not exist");
                EditState::NotFound
            }
            Err(e) => EditState::LoadFailed(e),
        };
        Transition::Applied
    }

    /// Validates the form. On success waits in `Confirming`; on failure stays in
    /// `Ready` with per-field errors.
    pub fn request_save(&mut self) -> Transition {
        let form = match std::mem::replace(&mut self.state, EditState::Loading) {
            EditState::Ready { form, .. } | EditState::Failed { form, .. } => form,
            other => {
                self.state = other;
                return Transition::Ignored;
            }
        };

        self.state = match form.validate() {
            Ok(fields) => EditState::Confirming { form, fields },
            Err(errors) => {
                debug!(product_id = %self.id, "Edit form rejected: {errors}");
                EditState::Ready {
                    form,
                    errors: Some(errors),
                }
            }
        };
        Transition::Applied
    }

    /// Backs out of the confirmation without saving.
    pub fn cancel_save(&mut self) -> Transition {
        match std::mem::replace(&mut self.state, EditState::Loading) {
            EditState::Confirming { form, .. } => {
                self.state = EditState::Ready { form, errors: None };
                Transition::Applied
            }
            other => {
                self.state = other;
                Transition::Ignored
            }
        }
    }

    /// Writes the confirmed fields to the store, replacing the whole record.
    pub async fn confirm_save(&mut self, gateway: &dyn ProductGateway) -> Transition {
        let (form, fields) = match std::mem::replace(&mut self.state, EditState::Loading) {
            EditState::Confirming { form, fields } => (form, fields),
            other => {
                self.state = other;
                return Transition::Ignored;
            }
        };

        self.state = EditState::Submitting { form: form.clone() };
        let result = gateway.update_by_id(&self.id, &fields).await;

        if !self.scope.is_active() {
            debug!(product_id = %self.id, "Edit result arrived after the view closed; discarding");
            self.state = EditState::Confirming { form, fields };
            return Transition::Discarded;
        }

        self.state = match result {
            Ok(()) => {
                info!(product_id = %self.id, "Product '{}' updated", fields.name);
                EditState::Updated
            }
            Err(error) => EditState::Failed { form, error },
        };
        Transition::Applied
    }

    /// Validates and saves without a confirmation step.
    pub async fn save(&mut self, gateway: &dyn ProductGateway) -> Transition {
        match self.request_save() {
            Transition::Applied if matches!(self.state, EditState::Confirming { .. }) => {
                self.confirm_save(gateway).await
            }
            other => other,
        }
    }

    /// Where to go once the flow is done.
    #[must_use]
    pub const fn next_route(&self) -> Option<Route> {
        match self.state {
            EditState::NotFound | EditState::Updated => Some(Route::Catalog),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        errors::Result,
        test_utils::{CountingGateway, FailingGateway, sample_fields, setup_test_gateway},
    };

    #[tokio::test]
    async fn test_load_prefills_every_field() -> Result<()> {
        let gateway = setup_test_gateway().await?;
        let fields = sample_fields("Lámpara");
        let id = gateway.create(&fields).await?;

        let mut flow = EditFlow::new(id, ViewScope::new());
        assert_eq!(flow.load(&gateway).await, Transition::Applied);

        let form = flow.form().unwrap();
        assert_eq!(*form, ProductForm::from_fields(&fields));
        assert_eq!(form.category, "Hogar");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_record_goes_to_not_found_without_a_form() -> Result<()> {
        let gateway = setup_test_gateway().await?;
        let mut flow = EditFlow::new(ProductId::new("Zx9mQ2aLkP0"), ViewScope::new());

        flow.load(&gateway).await;

        assert!(matches!(flow.state(), EditState::NotFound));
        assert!(flow.form().is_none());
        assert_eq!(flow.request_save(), Transition::Ignored);
        assert_eq!(flow.next_route(), Some(Route::Catalog));
        Ok(())
    }

    #[tokio::test]
    async fn test_save_writes_full_field_set() -> Result<()> {
        let gateway = setup_test_gateway().await?;
        let id = gateway.create(&sample_fields("Lámpara")).await?;
        let mut flow = EditFlow::new(id.clone(), ViewScope::new());
        flow.load(&gateway).await;

        let form = flow.form_mut().unwrap();
        form.price = "1999.5".to_string();
        form.stock = "0".to_string();
        assert_eq!(flow.save(&gateway).await, Transition::Applied);

        assert!(matches!(flow.state(), EditState::Updated));
        let stored = gateway.get_by_id(&id).await?.unwrap();
        assert_eq!(stored.fields.price, 1999.5);
        assert_eq!(stored.fields.stock, 0);
        assert_eq!(stored.fields.name, "Lámpara");
        Ok(())
    }

    #[tokio::test]
    async fn test_confirmation_can_be_cancelled() -> Result<()> {
        let gateway = CountingGateway::new(setup_test_gateway().await?);
        let id = gateway.inner().create(&sample_fields("Lámpara")).await?;
        let mut flow = EditFlow::new(id, ViewScope::new());
        flow.load(&gateway).await;

        assert_eq!(flow.request_save(), Transition::Applied);
        assert!(matches!(flow.state(), EditState::Confirming { .. }));
        assert_eq!(flow.cancel_save(), Transition::Applied);
        assert!(matches!(flow.state(), EditState::Ready { errors: None, .. }));
        // only the load reached the store
        assert_eq!(gateway.calls(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_edit_stays_ready_with_errors() -> Result<()> {
        let gateway = CountingGateway::new(setup_test_gateway().await?);
        let id = gateway.inner().create(&sample_fields("Lámpara")).await?;
        let mut flow = EditFlow::new(id, ViewScope::new());
        flow.load(&gateway).await;

        flow.form_mut().unwrap().name.clear();
        assert_eq!(flow.save(&gateway).await, Transition::Applied);

        assert!(matches!(flow.state(), EditState::Ready { errors: Some(_), .. }));
        assert!(flow.field_error(Field::Name).is_some());
        assert_eq!(gateway.calls(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_failure_keeps_form() -> Result<()> {
        let gateway = setup_test_gateway().await?;
        let id = gateway.create(&sample_fields("Lámpara")).await?;
        let mut flow = EditFlow::new(id, ViewScope::new());
        flow.load(&gateway).await;
        flow.form_mut().unwrap().brand = "Philips".to_string();

        flow.save(&FailingGateway).await;

        let EditState::Failed { form, error } = flow.state() else {
            panic!("expected Failed, got {:?}", flow.state());
        };
        assert_eq!(form.brand, "Philips");
        assert!(error.is_store_failure());
        assert!(flow.next_route().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_load_failure_can_be_retried() -> Result<()> {
        let gateway = setup_test_gateway().await?;
        let id = gateway.create(&sample_fields("Lámpara")).await?;
        let mut flow = EditFlow::new(id, ViewScope::new());

        flow.load(&FailingGateway).await;
        assert!(matches!(flow.state(), EditState::LoadFailed(_)));

        flow.load(&gateway).await;
        assert!(matches!(flow.state(), EditState::Ready { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_after_view_closed_is_discarded() -> Result<()> {
        let gateway = setup_test_gateway().await?;
        let id = gateway.create(&sample_fields("Lámpara")).await?;
        let scope = ViewScope::new();
        let mut flow = EditFlow::new(id, scope.clone());
        scope.close();

        assert_eq!(flow.load(&gateway).await, Transition::Discarded);
        assert!(matches!(flow.state(), EditState::Loading));
        assert!(flow.form().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_after_view_closed_is_discarded() -> Result<()> {
        let gateway = setup_test_gateway().await?;
        let id = gateway.create(&sample_fields("Lámpara")).await?;
        let scope = ViewScope::new();
        let mut flow = EditFlow::new(id.clone(), scope.clone());
        flow.load(&gateway).await;
        flow.form_mut().unwrap().brand = "Philips".to_string();
        assert_eq!(flow.request_save(), Transition::Applied);
        scope.close();

        assert_eq!(flow.confirm_save(&gateway).await, Transition::Discarded);
        let EditState::Confirming { form, fields } = flow.state() else {
            panic!("expected Confirming, got {:?}", flow.state());
        };
        assert_eq!(form.brand, "Philips");
        assert_eq!(fields.brand, "Philips");
        assert!(flow.next_route().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_save_after_view_closed_is_discarded() -> Result<()> {
        let gateway = setup_test_gateway().await?;
        let id = gateway.create(&sample_fields("Lámpara")).await?;
        let scope = ViewScope::new();
        let mut flow = EditFlow::new(id, scope.clone());
        flow.load(&gateway).await;
        flow.request_save();
        scope.close();

        assert_eq!(flow.confirm_save(&FailingGateway).await, Transition::Discarded);
        assert!(matches!(flow.state(), EditState::Confirming { .. }));
        Ok(())
    }
}
