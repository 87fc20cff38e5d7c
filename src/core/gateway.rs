//! The boundary between the catalog and the document store holding the
//! `products` collection.

use crate::{
    core::product::{Product, ProductFields, ProductId},
    errors::Result,
};
use async_trait::async_trait;

/// Name of the collection every backend reads and writes.
pub const PRODUCTS_COLLECTION: &str = "products";

/// Five operations against the `products` collection.
///
/// Implementations log each failure with the operation and record id, then return
/// it unchanged. Nothing is retried.
#[async_trait]
pub trait ProductGateway: Send + Sync {
    /// Every record with its identifier attached. Empty when the collection is empty.
    async fn list_all(&self) -> Result<Vec<Product>>;

    /// The record with `id`, or `None` when it does not exist.
    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>>;

    /// Persists a new record and returns the identifier the store assigned.
    ///
    /// Callers validate `fields` first.
    async fn create(&self, fields: &ProductFields) -> Result<ProductId>;

    /// Replaces every field of an existing record. Fails when the record is missing.
    async fn update_by_id(&self, id: &ProductId, fields: &ProductFields) -> Result<()>;

    /// Removes a record. Deleting a missing record succeeds.
    async fn delete_by_id(&self, id: &ProductId) -> Result<()>;
}
