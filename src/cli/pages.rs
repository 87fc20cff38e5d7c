//! Text rendering of each page. Pure functions from state to `String`.
//!
//! Renderers that build text with `writeln!` return [`Result`] so a formatting
//! failure reaches the caller instead of being dropped.

use crate::{
    core::{
        catalog::{CatalogView, featured},
        detail::StockStatus,
        format::format_currency,
        product::{Category, Product, ProductFields, ProductId},
        routes::Route,
        validation::{Field, ProductForm, ValidationErrors},
    },
    errors::Result,
};
use std::fmt::Write;

/// Home page: welcome text and the featured carousel.
///
/// # Errors
/// Returns an error if the page text cannot be written.
pub fn home(products: &[Product]) -> Result<String> {
    let mut out = String::from("🏠 Inventario\n\n");
    let featured = featured(products);
    if featured.is_empty() {
        out.push_str("No products yet. Add one with `inventario create`.\n");
        return Ok(out);
    }

    out.push_str("Featured products:\n");
    for product in featured {
        writeln!(
            &mut out,
            "  • {} ({}) {}  {}",
            product.fields.name,
            product.fields.brand,
            format_currency(product.fields.price),
            Route::Detail(product.id.clone())
        )?;
    }
    writeln!(&mut out, "\nSee every product at {}", Route::Catalog)?;
    Ok(out)
}

/// Catalog page: active criteria, category filter options and the visible rows.
///
/// # Errors
/// Returns an error if the page text cannot be written.
pub fn catalog(view: &CatalogView) -> Result<String> {
    let criteria = view.criteria();
    let mut out = String::from("📦 Products\n");

    let categories = view
        .categories()
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(&mut out, "Categories: {categories}")?;

    let mut filters = Vec::new();
    if !criteria.search_term.is_empty() {
        filters.push(format!("name contains \"{}\"", criteria.search_term));
    }
    if let Some(category) = criteria.category {
        filters.push(format!("category = {category}"));
    }
    if !filters.is_empty() {
        writeln!(&mut out, "Filters: {}", filters.join(", "))?;
    }
    writeln!(
        &mut out,
        "Sorted by {} ({})\n",
        criteria.sort_key, criteria.sort_direction
    )?;

    if view.is_empty() {
        out.push_str("No products found for these filters.\n");
        return Ok(out);
    }
    for product in view.products() {
        writeln!(&mut out, "{}", catalog_row(product))?;
    }
    writeln!(&mut out, "\n{} of {} products", view.products().len(), view.source().len())?;
    Ok(out)
}

fn catalog_row(product: &Product) -> String {
    let fields = &product.fields;
    format!(
        "  {:<28} {:<12} {:>14}  {:<12} {}",
        fields.name,
        fields.category,
        format_currency(fields.price),
        StockStatus::from_stock(fields.stock),
        Route::Detail(product.id.clone())
    )
}

/// Detail page for a product, with its edit and delete actions.
///
/// # Errors
/// Returns an error if the page text cannot be written.
pub fn detail(product: &Product) -> Result<String> {
    let fields = &product.fields;
    let mut out = String::new();
    writeln!(&mut out, "{}", fields.name)?;
    writeln!(&mut out, "{}", "=".repeat(fields.name.chars().count()))?;
    writeln!(&mut out, "Brand:       {}", fields.brand)?;
    writeln!(&mut out, "Category:    {}", fields.category)?;
    writeln!(&mut out, "Price:       {}", format_currency(fields.price))?;
    writeln!(&mut out, "Stock:       {}", StockStatus::from_stock(fields.stock))?;
    writeln!(&mut out, "Image:       {}", fields.image_url)?;
    writeln!(&mut out, "\n{}\n", fields.description)?;
    writeln!(&mut out, "Edit:   inventario edit {}", product.id)?;
    writeln!(&mut out, "Delete: inventario delete {}", product.id)?;
    Ok(out)
}

/// A product form with inline field errors.
///
/// # Errors
/// Returns an error if the page text cannot be written.
pub fn form(title: &str, form: &ProductForm, errors: Option<&ValidationErrors>) -> Result<String> {
    let mut out = format!("📝 {title}\n");
    for field in Field::ALL {
        let value = form.field(field);
        let shown = if value.is_empty() { "-" } else { value };
        writeln!(&mut out, "  {:<12} {shown}", format!("{}:", field.label()))?;
        if let Some(message) = errors.and_then(|e| e.get(field)) {
            writeln!(&mut out, "    ⚠ {message}")?;
        }
    }
    if field_is_blank(form, Field::Category) {
        let options = Category::ALL
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join(" | ");
        writeln!(&mut out, "  Categories: {options}")?;
    }
    Ok(out)
}

fn field_is_blank(form: &ProductForm, field: Field) -> bool {
    form.field(field).trim().is_empty()
}

/// Summary of the values an edit is about to write.
#[must_use]
pub fn edit_summary(id: &ProductId, fields: &ProductFields) -> String {
    format!(
        "Product {id} will be saved as:\n  {} ({}) - {}, {} - {}\n",
        fields.name,
        fields.brand,
        fields.category,
        format_currency(fields.price),
        StockStatus::from_stock(fields.stock)
    )
}

/// Feedback for a form that failed validation.
///
/// # Errors
/// Returns an error if the message text cannot be written.
pub fn validation_failed(errors: &ValidationErrors) -> Result<String> {
    let mut out = String::from("❌ The form has errors:\n");
    for (field, message) in errors.iter() {
        writeln!(&mut out, "  - {}: {message}", field.label())?;
    }
    Ok(out)
}

/// Page for an unknown path.
#[must_use]
pub fn page_not_found(path: &str) -> String {
    format!(
        "404 - there is no page at '{path}'.\nGo back to the home page: {}\n",
        Route::Home
    )
}

/// Message for a product id with no record behind it.
#[must_use]
pub fn product_not_found(id: &ProductId) -> String {
    format!("❌ Product '{id}' was not found. It may have been deleted.\n")
}
