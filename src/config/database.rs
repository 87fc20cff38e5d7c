//! Database connection and table creation for the SQL store.
//!
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust models.

use crate::entities::Product;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info, instrument};

/// Default location of the local `SQLite` catalog.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/inventario.sqlite?mode=rwc";

/// Connects to `database_url` and makes sure the `products` table exists.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    let db = Database::connect(database_url).await?;
    create_tables(&db).await?;
    info!("Database ready");
    Ok(db)
}

/// Creates the `products` table if it does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut product_table = schema.create_table_from_entity(Product);
    product_table.if_not_exists();

    db.execute(builder.build(&product_table)).await?;
    Ok(())
}
