//! Product entity - one row per document of the `products` collection.
//!
//! The primary key is the store-assigned string identifier, so rows map one to one
//! onto documents of a remote document store.

use sea_orm::entity::prelude::*;

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Store-assigned identifier (UUID v4 text)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Brand
    pub brand: String,
    /// Category label, one of the fixed set
    pub category: String,
    /// Unit price
    pub price: f64,
    /// Units on hand
    pub stock: i64,
    /// Free-text description
    pub description: String,
    /// Image location
    pub image_url: String,
}

/// Products have no relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
