//! SQL-backed `products` collection through `SeaORM`.
//!
//! Identifiers are random UUIDs generated on insert. Rows are returned ordered by
//! identifier, matching the natural order of a document collection.

use crate::{
    config::database::create_connection,
    core::{
        gateway::ProductGateway,
        product::{Category, Product, ProductFields, ProductId},
    },
    entities::{Product as ProductEntity, product},
    errors::{Error, Result},
};
use async_trait::async_trait;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

/// Gateway over a `SeaORM` connection.
#[derive(Debug, Clone)]
pub struct SqlGateway {
    db: DatabaseConnection,
}

impl SqlGateway {
    /// Wraps an existing connection whose tables already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects to `database_url`, creating the table when needed.
    ///
    /// # Errors
    /// Returns an error if the connection or table creation fails.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Ok(Self::new(create_connection(database_url).await?))
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn into_product(operation: &'static str, model: product::Model) -> Result<Product> {
    let category = Category::from_label(&model.category).ok_or_else(|| {
        Error::store(
            operation,
            Some(model.id.as_str()),
            format!("unknown category '{}'", model.category),
        )
    })?;
    Ok(Product::new(
        ProductId::new(model.id),
        ProductFields {
            name: model.name,
            brand: model.brand,
            category,
            price: model.price,
            stock: model.stock,
            description: model.description,
            image_url: model.image_url,
        },
    ))
}

fn active_model(id: &str, fields: &ProductFields) -> product::ActiveModel {
    product::ActiveModel {
        id: Set(id.to_string()),
        name: Set(fields.name.clone()),
        brand: Set(fields.brand.clone()),
        category: Set(fields.category.label().to_string()),
        price: Set(fields.price),
        stock: Set(fields.stock),
        description: Set(fields.description.clone()),
        image_url: Set(fields.image_url.clone()),
    }
}

#[async_trait]
impl ProductGateway for SqlGateway {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Product>> {
        let models = ProductEntity::find()
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await
            .inspect_err(|e| error!("Failed to list products: {e}"))?;

        let products = models
            .into_iter()
            .map(|m| into_product("list_all", m))
            .collect::<Result<Vec<_>>>()
            .inspect_err(|e| error!("Failed to read products: {e}"))?;
        debug!("Listed {} products", products.len());
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>> {
        let found = ProductEntity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(Error::from)
            .and_then(|model| model.map(|m| into_product("get_by_id", m)).transpose())
            .inspect_err(|e| error!(product_id = %id, "Failed to fetch product: {e}"))?;

        if found.is_none() {
            warn!(product_id = %id, "Product not found");
        }
        Ok(found)
    }

    #[instrument(skip(self, fields), fields(name = %fields.name))]
    async fn create(&self, fields: &ProductFields) -> Result<ProductId> {
        let id = Uuid::new_v4().to_string();
        ProductEntity::insert(active_model(&id, fields))
            .exec_without_returning(&self.db)
            .await
            .inspect_err(|e| error!(product_id = %id, "Failed to create product: {e}"))?;
        debug!(product_id = %id, "Product inserted");
        Ok(ProductId::new(id))
    }

    #[instrument(skip(self, fields))]
    async fn update_by_id(&self, id: &ProductId, fields: &ProductFields) -> Result<()> {
        let result = ProductEntity::update_many()
            .set(active_model(id.as_str(), fields))
            .filter(product::Column::Id.eq(id.as_str()))
            .exec(&self.db)
            .await
            .map_err(Error::from)
            .and_then(|result| {
                if result.rows_affected == 0 {
                    Err(Error::store(
                        "update_by_id",
                        Some(id.as_str()),
                        "record does not exist",
                    ))
                } else {
                    Ok(())
                }
            });
        result.inspect_err(|e| error!(product_id = %id, "Failed to update product: {e}"))
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: &ProductId) -> Result<()> {
        let result = ProductEntity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .inspect_err(|e| error!(product_id = %id, "Failed to delete product: {e}"))?;
        if result.rows_affected == 0 {
            debug!(product_id = %id, "Delete matched no rows");
        }
        Ok(())
    }
}
