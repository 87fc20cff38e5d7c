//! Product domain types.
//!
//! A [`Product`] is a persisted record: a store-assigned [`ProductId`] plus its
//! [`ProductFields`]. Data that has not been persisted yet is handled as bare
//! `ProductFields`, so an identifier can never be present before creation.

use crate::errors::Error;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Opaque identifier assigned by the store when a product is created.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wraps a store-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrowed view of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The fixed set of catalog categories. Stored and displayed by label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// "Tecnología"
    #[serde(rename = "Tecnología")]
    Technology,
    /// "Videojuegos"
    #[serde(rename = "Videojuegos")]
    VideoGames,
    /// "Hogar"
    #[serde(rename = "Hogar")]
    Home,
    /// "Oficina"
    #[serde(rename = "Oficina")]
    Office,
    /// "Accesorios"
    #[serde(rename = "Accesorios")]
    Accessories,
}

impl Category {
    /// Every category, in the order forms offer them.
    pub const ALL: [Self; 5] = [
        Self::Technology,
        Self::VideoGames,
        Self::Home,
        Self::Office,
        Self::Accessories,
    ];

    /// The stored label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Technology => "Tecnología",
            Self::VideoGames => "Videojuegos",
            Self::Home => "Hogar",
            Self::Office => "Oficina",
            Self::Accessories => "Accesorios",
        }
    }

    /// Exact label lookup. No trimming, no case folding.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| Error::UnknownLabel {
            kind: "category",
            value: s.to_string(),
        })
    }
}

/// Every field of a product except its identity. Numbers are real numbers here,
/// never text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    /// Display name, never empty
    pub name: String,
    /// Manufacturer or brand
    pub brand: String,
    /// One of the fixed categories
    pub category: Category,
    /// Unit price, strictly positive
    pub price: f64,
    /// Units on hand, never negative
    pub stock: i64,
    /// Free-text description
    pub description: String,
    /// Image location; not validated beyond being present
    pub image_url: String,
}

/// A persisted product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier
    pub id: ProductId,
    /// The record's data
    #[serde(flatten)]
    pub fields: ProductFields,
}

impl Product {
    /// Attaches an identifier to a set of fields.
    #[must_use]
    pub const fn new(id: ProductId, fields: ProductFields) -> Self {
        Self { id, fields }
    }

    /// Shorthand for the product name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.fields.name
    }
}
