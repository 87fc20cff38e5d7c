//! Shared test utilities for the catalog.
//!
//! Provides an in-memory SQL gateway, sample records, and gateway wrappers for
//! counting calls and simulating store failures.

use crate::{
    core::{
        gateway::ProductGateway,
        product::{Category, Product, ProductFields, ProductId},
        validation::ProductForm,
    },
    errors::{Error, Result},
    store::SqlGateway,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Creates a gateway over an in-memory `SQLite` database with the table initialized.
/// This is the standard setup for gateway and flow tests.
pub async fn setup_test_gateway() -> Result<SqlGateway> {
    SqlGateway::connect("sqlite::memory:").await
}

/// Valid product fields with sensible defaults.
///
/// # Defaults
/// * `brand`: "Genérica"
/// * `category`: Hogar
/// * `price`: 15000.0
/// * `stock`: 7
pub fn sample_fields(name: &str) -> ProductFields {
    ProductFields {
        name: name.to_string(),
        brand: "Genérica".to_string(),
        category: Category::Home,
        price: 15000.0,
        stock: 7,
        description: format!("{name} de prueba"),
        image_url: "https://example.com/producto.png".to_string(),
    }
}

/// A form holding [`sample_fields`] as text.
pub fn sample_form(name: &str) -> ProductForm {
    ProductForm::from_fields(&sample_fields(name))
}

/// A stored product with custom listing attributes.
pub fn product(id: &str, name: &str, category: Category, price: f64, stock: i64) -> Product {
    Product::new(
        ProductId::new(id),
        ProductFields {
            category,
            price,
            stock,
            ..sample_fields(name)
        },
    )
}

/// Delegates to an inner gateway and counts every call.
pub struct CountingGateway<G> {
    inner: G,
    calls: AtomicUsize,
}

impl<G: ProductGateway> CountingGateway<G> {
    pub const fn new(inner: G) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of gateway operations issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The wrapped gateway, for setup that should not be counted.
    pub const fn inner(&self) -> &G {
        &self.inner
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<G: ProductGateway> ProductGateway for CountingGateway<G> {
    async fn list_all(&self) -> Result<Vec<Product>> {
        self.tick();
        self.inner.list_all().await
    }

    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>> {
        self.tick();
        self.inner.get_by_id(id).await
    }

    async fn create(&self, fields: &ProductFields) -> Result<ProductId> {
        self.tick();
        self.inner.create(fields).await
    }

    async fn update_by_id(&self, id: &ProductId, fields: &ProductFields) -> Result<()> {
        self.tick();
        self.inner.update_by_id(id, fields).await
    }

    async fn delete_by_id(&self, id: &ProductId) -> Result<()> {
        self.tick();
        self.inner.delete_by_id(id).await
    }
}

/// A gateway whose every operation fails with a store error.
pub struct FailingGateway;

#[async_trait]
impl ProductGateway for FailingGateway {
    async fn list_all(&self) -> Result<Vec<Product>> {
        Err(Error::store("list_all", None, "store unavailable"))
    }

    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>> {
        Err(Error::store("get_by_id", Some(id.as_str()), "store unavailable"))
    }

    async fn create(&self, _fields: &ProductFields) -> Result<ProductId> {
        Err(Error::store("create", None, "store unavailable"))
    }

    async fn update_by_id(&self, id: &ProductId, _fields: &ProductFields) -> Result<()> {
        Err(Error::store("update_by_id", Some(id.as_str()), "store unavailable"))
    }

    async fn delete_by_id(&self, id: &ProductId) -> Result<()> {
        Err(Error::store("delete_by_id", Some(id.as_str()), "store unavailable"))
    }
}
