//! Unified error types for the catalog.
//!
//! Store failures (transport, auth, write rejections) surface as [`Error::Store`],
//! [`Error::Http`] or [`Error::Database`] depending on the backend that produced them.
//! Absence of a record is never an error; gateways return `Option` for that.

use crate::core::validation::ValidationErrors;
use thiserror::Error;

/// All errors produced by the catalog library and binary.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description of the problem
        message: String,
    },

    /// The store rejected an operation or returned something unusable
    #[error("Store error during {operation} (id: {}): {message}", id.as_deref().unwrap_or("-"))]
    Store {
        /// Gateway operation that failed (`list_all`, `create`, ...)
        operation: &'static str,
        /// Record identifier involved, if any
        id: Option<String>,
        /// Description of the failure
        message: String,
    },

    /// SQL backend failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Transport failure talking to the document store
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local field validation failed; nothing was sent to the store
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// I/O error (configuration files, terminal prompts)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing page text failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// A label did not match any known value
    #[error("Unknown {kind} '{value}'")]
    UnknownLabel {
        /// What was being parsed (category, sort key, ...)
        kind: &'static str,
        /// The rejected input
        value: String,
    },
}

impl Error {
    /// Builds a [`Error::Store`] for the given operation and record.
    pub fn store(operation: &'static str, id: Option<&str>, message: impl Into<String>) -> Self {
        Self::Store {
            operation,
            id: id.map(ToOwned::to_owned),
            message: message.into(),
        }
    }

    /// True for failures coming from the store boundary.
    #[must_use]
    pub const fn is_store_failure(&self) -> bool {
        matches!(self, Self::Store { .. } | Self::Database(_) | Self::Http(_))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
