//! Entity module - SeaORM entity definitions backing the SQL store.

pub mod product;

pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
