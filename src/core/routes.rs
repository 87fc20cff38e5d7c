//! Navigation destinations.

use crate::core::product::ProductId;
use std::fmt;

/// Every page the catalog can show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// Welcome page with the featured carousel
    Home,
    /// Searchable product list
    Catalog,
    /// A single product
    Detail(ProductId),
    /// New product form
    Create,
    /// Edit form for an existing product
    Edit(ProductId),
    /// Fallback for unknown paths
    NotFound,
}

impl Route {
    /// Resolves a path. Unknown paths resolve to [`Route::NotFound`].
    #[must_use]
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self::Home;
        }
        let Some(rest) = path.strip_prefix('/') else {
            return Self::NotFound;
        };
        let rest = rest.trim_end_matches('/');
        let segments: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };
        match segments.as_slice() {
            [] => Self::Home,
            ["productos"] => Self::Catalog,
            ["crear"] => Self::Create,
            ["producto", id] if !id.is_empty() => Self::Detail(ProductId::new(*id)),
            ["editar", id] if !id.is_empty() => Self::Edit(ProductId::new(*id)),
            _ => Self::NotFound,
        }
    }

    /// Path that resolves back to this route. `NotFound` has no canonical path.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Catalog => "/productos".to_string(),
            Self::Create => "/crear".to_string(),
            Self::Detail(id) => format!("/producto/{id}"),
            Self::Edit(id) => format!("/editar/{id}"),
            Self::NotFound => "/404".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
