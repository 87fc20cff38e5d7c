//! Form input and field validation.
//!
//! Forms hold raw text exactly as typed. [`ProductForm::validate`] applies the field
//! rules and either produces typed [`ProductFields`] or one message per failing field.
//! Validation is purely local and runs before any gateway call.

use crate::core::product::{Category, ProductFields};
use std::fmt;

/// Form fields, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Product name
    Name,
    /// Brand
    Brand,
    /// Category label
    Category,
    /// Unit price
    Price,
    /// Units on hand
    Stock,
    /// Description
    Description,
    /// Image URL
    ImageUrl,
}

impl Field {
    /// Every field, in display order.
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Brand,
        Self::Category,
        Self::Price,
        Self::Stock,
        Self::Description,
        Self::ImageUrl,
    ];

    /// Human-readable label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Brand => "Brand",
            Self::Category => "Category",
            Self::Price => "Price",
            Self::Stock => "Stock",
            Self::Description => "Description",
            Self::ImageUrl => "Image URL",
        }
    }

    /// Wire / form name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Brand => "brand",
            Self::Category => "category",
            Self::Price => "price",
            Self::Stock => "stock",
            Self::Description => "description",
            Self::ImageUrl => "imageUrl",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field validation failures, ordered by field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(Field, String)>,
}

impl ValidationErrors {
    fn push(&mut self, field: Field, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    /// Message for a single field, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| message.as_str())
    }

    /// True when `field` failed validation.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Iterates over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when every field passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Raw form input for creating or editing a product.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductForm {
    /// Name as typed
    pub name: String,
    /// Brand as typed
    pub brand: String,
    /// Category label as selected; empty when nothing is selected
    pub category: String,
    /// Price as typed
    pub price: String,
    /// Stock as typed
    pub stock: String,
    /// Description as typed
    pub description: String,
    /// Image URL as typed
    pub image_url: String,
}

impl ProductForm {
    /// Prefills a form from an existing record.
    #[must_use]
    pub fn from_fields(fields: &ProductFields) -> Self {
        Self {
            name: fields.name.clone(),
            brand: fields.brand.clone(),
            category: fields.category.label().to_string(),
            price: fields.price.to_string(),
            stock: fields.stock.to_string(),
            description: fields.description.clone(),
            image_url: fields.image_url.clone(),
        }
    }

    /// The text of one field.
    #[must_use]
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Brand => &self.brand,
            Field::Category => &self.category,
            Field::Price => &self.price,
            Field::Stock => &self.stock,
            Field::Description => &self.description,
            Field::ImageUrl => &self.image_url,
        }
    }

    /// Mutable access to the text of one field.
    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Brand => &mut self.brand,
            Field::Category => &mut self.category,
            Field::Price => &mut self.price,
            Field::Stock => &mut self.stock,
            Field::Description => &mut self.description,
            Field::ImageUrl => &mut self.image_url,
        }
    }

    /// Applies every field rule.
    ///
    /// Text fields are trimmed before being stored. Numbers are parsed from text.
    ///
    /// # Errors
    /// Returns every failing field with its message.
    pub fn validate(&self) -> Result<ProductFields, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = required_text(&mut errors, Field::Name, &self.name, "Name is required");
        let brand = required_text(&mut errors, Field::Brand, &self.brand, "Brand is required");

        let category = if self.category.trim().is_empty() {
            errors.push(Field::Category, "Category is required");
            None
        } else {
            let category = Category::from_label(&self.category);
            if category.is_none() {
                errors.push(
                    Field::Category,
                    format!("Category must be one of: {}", category_list()),
                );
            }
            category
        };

        let price = parse_price(&mut errors, &self.price);
        let stock = parse_stock(&mut errors, &self.stock);

        let description = required_text(
            &mut errors,
            Field::Description,
            &self.description,
            "Description is required",
        );
        let image_url = required_text(
            &mut errors,
            Field::ImageUrl,
            &self.image_url,
            "Image URL is required",
        );

        match (category, price, stock) {
            (Some(category), Some(price), Some(stock)) if errors.is_empty() => Ok(ProductFields {
                name,
                brand,
                category,
                price,
                stock,
                description,
                image_url,
            }),
            _ => Err(errors),
        }
    }
}

fn required_text(
    errors: &mut ValidationErrors,
    field: Field,
    value: &str,
    message: &str,
) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, message);
    }
    trimmed.to_string()
}

fn parse_price(errors: &mut ValidationErrors, raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push(Field::Price, "Price is required");
        return None;
    }
    // `f64::from_str` accepts "NaN" and "inf"
    match raw.parse::<f64>() {
        Ok(price) if !price.is_finite() => {
            errors.push(Field::Price, "Price must be a number");
            None
        }
        Ok(price) if price <= 0.0 => {
            errors.push(Field::Price, "Price must be greater than zero");
            None
        }
        Ok(price) => Some(price),
        Err(_) => {
            errors.push(Field::Price, "Price must be a number");
            None
        }
    }
}

fn parse_stock(errors: &mut ValidationErrors, raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push(Field::Stock, "Stock is required");
        return None;
    }
    match raw.parse::<i64>() {
        Ok(stock) if stock < 0 => {
            errors.push(Field::Stock, "Stock cannot be negative");
            None
        }
        Ok(stock) => Some(stock),
        Err(_) => {
            errors.push(Field::Stock, "Stock must be a whole number");
            None
        }
    }
}

fn category_list() -> String {
    Category::ALL
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ")
}
