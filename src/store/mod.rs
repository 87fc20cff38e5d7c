//! Store backends implementing [`ProductGateway`].

/// Firestore REST backend
pub mod firestore;
/// `SeaORM` SQL backend
pub mod sql;

use crate::{
    config::store::{Backend, StoreSettings},
    core::gateway::ProductGateway,
    errors::Result,
};
use tracing::{info, instrument};

pub use firestore::FirestoreGateway;
pub use sql::SqlGateway;

/// Builds the gateway selected by `settings`.
///
/// # Errors
/// Returns a configuration error when the Firestore backend lacks a project id, or a
/// database error when the SQL store cannot be opened.
#[instrument(skip(settings), fields(backend = ?settings.backend))]
pub async fn connect(settings: &StoreSettings) -> Result<Box<dyn ProductGateway>> {
    match settings.backend {
        Backend::Firestore => {
            let gateway = FirestoreGateway::from_settings(settings)?;
            if settings.api_key.is_none() {
                info!("No FIRESTORE_API_KEY set; sending unauthenticated requests");
            }
            Ok(Box::new(gateway))
        }
        Backend::Sql => Ok(Box::new(SqlGateway::connect(&settings.database_url).await?)),
    }
}
