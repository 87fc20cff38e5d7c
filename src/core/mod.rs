//! Core catalog logic - framework-agnostic products, list pipeline, flows and routes.

/// List pipeline: search, category filter, sort, carousel
pub mod catalog;
/// Spanish-aware text ordering
pub mod collate;
/// Single product page
pub mod detail;
/// Create, edit and delete flows
pub mod flows;
/// Price formatting
pub mod format;
/// The store boundary
pub mod gateway;
/// Product domain types
pub mod product;
/// Navigation destinations
pub mod routes;
/// Form input and field rules
pub mod validation;
