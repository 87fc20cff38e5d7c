//! Store connection settings.
//!
//! Settings come from an optional `inventario.toml` and are then overridden by
//! environment variables (usually loaded from `.env`). The API key is only ever read
//! from the environment and is redacted from `Debug` output.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{fmt, path::Path};
use tracing::debug;

/// Default Firestore REST endpoint.
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Which store implementation backs the catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Remote Firestore database over its REST API
    #[default]
    Firestore,
    /// Local SQL database through `SeaORM`
    Sql,
}

impl std::str::FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(Self::Firestore),
            "sql" | "sqlite" => Ok(Self::Sql),
            other => Err(Error::UnknownLabel {
                kind: "store backend",
                value: other.to_string(),
            }),
        }
    }
}

/// Everything needed to construct a gateway.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Backend selection
    pub backend: Backend,
    /// Firestore project identifier
    pub project_id: Option<String>,
    /// Firestore REST base URL (override for emulators)
    pub base_url: String,
    /// Firestore web API key; environment only
    #[serde(skip)]
    pub api_key: Option<String>,
    /// SQL connection string for the `sql` backend
    pub database_url: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            project_id: None,
            base_url: DEFAULT_FIRESTORE_BASE_URL.to_string(),
            api_key: None,
            database_url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

impl fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSettings")
            .field("backend", &self.backend)
            .field("project_id", &self.project_id)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("database_url", &self.database_url)
            .finish()
    }
}

impl StoreSettings {
    /// The Firestore project id, required by the Firestore backend.
    ///
    /// # Errors
    /// Returns a configuration error when no project id was configured.
    pub fn require_project_id(&self) -> Result<&str> {
        self.project_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| Error::Config {
                message: "FIRESTORE_PROJECT_ID is required for the firestore backend".to_string(),
            })
    }

    /// Applies environment overrides. `lookup` returns the value of a variable.
    ///
    /// # Errors
    /// Returns an error when `STORE_BACKEND` names an unknown backend.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = lookup("STORE_BACKEND") {
            self.backend = v.parse()?;
        }
        if let Some(v) = lookup("FIRESTORE_PROJECT_ID") {
            self.project_id = Some(v);
        }
        if let Some(v) = lookup("FIRESTORE_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("FIRESTORE_API_KEY") {
            self.api_key = Some(v);
        }
        if let Some(v) = lookup("DATABASE_URL") {
            self.database_url = v;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    store: StoreSettings,
}

/// Parses the TOML settings file contents.
///
/// # Errors
/// Returns a configuration error on invalid TOML or unknown values.
pub fn parse_settings(contents: &str) -> Result<StoreSettings> {
    toml::from_str::<SettingsFile>(contents)
        .map(|file| file.store)
        .map_err(|e| Error::Config {
            message: format!("Failed to parse settings file: {e}"),
        })
}

/// Loads settings from `path` (when it exists) and the process environment.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed, or if an
/// environment override is invalid.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<StoreSettings> {
    let path = path.as_ref();
    let mut settings = if path.exists() {
        debug!("Loading settings from {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("Failed to read settings file {}: {e}", path.display()),
        })?;
        parse_settings(&contents)?
    } else {
        debug!("No settings file at {}; using defaults", path.display());
        StoreSettings::default()
    };

    settings.apply_overrides(|key| std::env::var(key).ok())?;
    Ok(settings)
}
