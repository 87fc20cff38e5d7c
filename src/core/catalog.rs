//! Catalog list pipeline - search, category filter and sort over fetched products.
//!
//! [`derive_view`] is a pure function of the fetched collection and the
//! [`ListCriteria`]. [`CatalogView`] owns both and calls it after every mutation, so
//! the visible list is always consistent with the current criteria.

use crate::{
    core::{
        collate::compare_text,
        product::{Category, Product},
    },
    errors::Error,
};
use std::{cmp::Ordering, fmt, str::FromStr};

/// How many products the home page carousel shows.
pub const MAX_CAROUSEL_PRODUCTS: usize = 7;

/// Field the catalog is sorted by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Product name, Spanish-aware text order
    #[default]
    Name,
    /// Unit price, numeric order
    Price,
    /// Units on hand, numeric order
    Stock,
}

impl SortKey {
    /// Short form used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Stock => "stock",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "stock" => Ok(Self::Stock),
            other => Err(Error::UnknownLabel {
                kind: "sort key",
                value: other.to_string(),
            }),
        }
    }
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// Short form used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Ascending),
            "desc" => Ok(Self::Descending),
            other => Err(Error::UnknownLabel {
                kind: "sort direction",
                value: other.to_string(),
            }),
        }
    }
}

/// The user-controlled inputs of the pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListCriteria {
    /// Case-insensitive name substring; empty matches everything
    pub search_term: String,
    /// Exact category to keep; `None` keeps all
    pub category: Option<Category>,
    /// Field to sort by
    pub sort_key: SortKey,
    /// Direction to sort in
    pub sort_direction: SortDirection,
}

/// Filters and sorts `source` according to `criteria`.
///
/// The sort is stable: records comparing equal keep their fetch order in both
/// directions. The result is a fresh copy; `source` is untouched.
#[must_use]
pub fn derive_view(source: &[Product], criteria: &ListCriteria) -> Vec<Product> {
    let needle = criteria.search_term.to_lowercase();

    let mut view: Vec<Product> = source
        .iter()
        .filter(|p| needle.is_empty() || p.fields.name.to_lowercase().contains(&needle))
        .filter(|p| criteria.category.is_none_or(|c| p.fields.category == c))
        .cloned()
        .collect();

    view.sort_by(|a, b| {
        criteria
            .sort_direction
            .apply(compare_by_key(a, b, criteria.sort_key))
    });
    view
}

fn compare_by_key(a: &Product, b: &Product, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => compare_text(&a.fields.name, &b.fields.name),
        SortKey::Price => a.fields.price.total_cmp(&b.fields.price),
        SortKey::Stock => a.fields.stock.cmp(&b.fields.stock),
    }
}

/// Categories present in `source`, in first-seen order, without duplicates.
#[must_use]
pub fn distinct_categories(source: &[Product]) -> Vec<Category> {
    let mut seen = Vec::new();
    for product in source {
        if !seen.contains(&product.fields.category) {
            seen.push(product.fields.category);
        }
    }
    seen
}

/// Products featured on the home page: the first [`MAX_CAROUSEL_PRODUCTS`] of the fetch.
#[must_use]
pub fn featured(source: &[Product]) -> &[Product] {
    &source[..source.len().min(MAX_CAROUSEL_PRODUCTS)]
}

/// State of the catalog list page.
#[derive(Clone, Debug, Default)]
pub struct CatalogView {
    source: Vec<Product>,
    categories: Vec<Category>,
    criteria: ListCriteria,
    visible: Vec<Product>,
}

impl CatalogView {
    /// Builds the page state from a fresh fetch with default criteria.
    #[must_use]
    pub fn new(source: Vec<Product>) -> Self {
        let mut view = Self::default();
        view.set_source(source);
        view
    }

    /// Replaces the fetched collection and recomputes the category list.
    pub fn set_source(&mut self, source: Vec<Product>) {
        self.categories = distinct_categories(&source);
        self.source = source;
        self.recompute();
    }

    /// Sets the name search term.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.criteria.search_term = term.into();
        self.recompute();
    }

    /// Selects a category, or all categories with `None`.
    pub fn select_category(&mut self, category: Option<Category>) {
        self.criteria.category = category;
        self.recompute();
    }

    /// Changes the sort field.
    pub fn set_sort_key(&mut self, key: SortKey) {
        self.criteria.sort_key = key;
        self.recompute();
    }

    /// Changes the sort direction.
    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.criteria.sort_direction = direction;
        self.recompute();
    }

    /// Replaces every criterion at once.
    pub fn set_criteria(&mut self, criteria: ListCriteria) {
        self.criteria = criteria;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visible = derive_view(&self.source, &self.criteria);
    }

    /// The filtered, sorted products.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.visible
    }

    /// The collection as fetched.
    #[must_use]
    pub fn source(&self) -> &[Product] {
        &self.source
    }

    /// Categories offered by the filter.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Current criteria.
    #[must_use]
    pub const fn criteria(&self) -> &ListCriteria {
        &self.criteria
    }

    /// True when the criteria filtered everything out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}
