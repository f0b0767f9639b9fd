use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{
    BRAND_MAX_LEN, CATEGORY_MAX_LEN, DESCRIPTION_MAX_LEN, NAME_MAX_LEN, UpdateProduct,
};

const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;
const CATEGORY_MAX_LEN_VALIDATOR: u64 = CATEGORY_MAX_LEN as u64;
const BRAND_MAX_LEN_VALIDATOR: u64 = BRAND_MAX_LEN as u64;
const DESCRIPTION_MAX_LEN_VALIDATOR: u64 = DESCRIPTION_MAX_LEN as u64;

/// Maximum allowed length for the hint passed to the description generator.
const BASIC_INFO_MAX_LEN: u64 = 500;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product payloads.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// A required text field is empty after sanitization.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// Sanitized product creation request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub brand: String,
    pub stock_quantity: i32,
    /// Free-text hint for the generator, also used as fallback description.
    pub basic_info: Option<String>,
    pub auto_generate_description: bool,
}

impl NewProduct {
    /// Description used when generation is disabled or fails.
    pub fn fallback_description(&self) -> String {
        match self.basic_info.as_deref() {
            Some(info) => info.to_string(),
            None => format!("{} {} - {}", self.brand, self.name, self.category),
        }
    }
}

fn default_auto_generate() -> bool {
    true
}

/// JSON payload accepted by `POST /products`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    pub price: Decimal,
    #[validate(length(min = 1, max = CATEGORY_MAX_LEN_VALIDATOR))]
    pub category: String,
    #[validate(length(min = 1, max = BRAND_MAX_LEN_VALIDATOR))]
    pub brand: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock_quantity: i32,
    #[validate(length(max = BASIC_INFO_MAX_LEN))]
    pub basic_info: Option<String>,
    #[serde(default = "default_auto_generate")]
    pub auto_generate_description: bool,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a creation request.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        self.validate()?;

        Ok(NewProduct {
            name: sanitize_required("name", &self.name)?,
            price: self.price,
            category: sanitize_required("category", &self.category)?,
            brand: sanitize_required("brand", &self.brand)?,
            stock_quantity: self.stock_quantity,
            basic_info: self
                .basic_info
                .as_deref()
                .map(sanitize_multiline_text)
                .filter(|value| !value.is_empty()),
            auto_generate_description: self.auto_generate_description,
        })
    }
}

/// JSON payload accepted by `PUT /products/{id}`. Absent fields are left untouched,
/// so an empty payload yields an empty patch.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: Option<String>,
    pub price: Option<Decimal>,
    #[validate(length(min = 1, max = CATEGORY_MAX_LEN_VALIDATOR))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = BRAND_MAX_LEN_VALIDATOR))]
    pub brand: Option<String>,
    #[validate(range(min = 0))]
    pub stock_quantity: Option<i32>,
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    pub description: Option<String>,
}

impl EditProductForm {
    /// Validates and sanitizes the payload into a domain `UpdateProduct`.
    pub fn into_update_product(self) -> ProductFormResult<UpdateProduct> {
        self.validate()?;

        let mut updates = UpdateProduct::new();

        if let Some(name) = self.name {
            updates = updates.name(sanitize_required("name", &name)?);
        }

        if let Some(price) = self.price {
            updates = updates.price(price);
        }

        if let Some(category) = self.category {
            updates = updates.category(sanitize_required("category", &category)?);
        }

        if let Some(brand) = self.brand {
            updates = updates.brand(sanitize_required("brand", &brand)?);
        }

        if let Some(stock_quantity) = self.stock_quantity {
            updates = updates.stock_quantity(stock_quantity);
        }

        if let Some(description) = self.description {
            updates = updates.description(sanitize_multiline_text(&description));
        }

        Ok(updates)
    }
}

/// JSON payload accepted by `PATCH /products/{id}/stock`.
#[derive(Debug, Deserialize)]
pub struct StockForm {
    pub new_stock: i32,
}

fn sanitize_required(field: &'static str, input: &str) -> ProductFormResult<String> {
    let sanitized = sanitize_inline_text(input);
    if sanitized.is_empty() {
        return Err(ProductFormError::Empty { field });
    }
    Ok(sanitized)
}

/// Trims the ends and drops control characters. Inner spacing is kept as typed.
fn sanitize_inline_text(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|ch| *ch == '\t' || !ch.is_control())
        .collect()
}

fn sanitize_multiline_text(input: &str) -> String {
    let mut lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    while matches!(lines.first(), Some(line) if line.is_empty()) {
        lines.remove(0);
    }

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    let mut result = Vec::with_capacity(lines.len());
    let mut previous_empty = false;
    for line in lines {
        let is_empty = line.is_empty();
        if is_empty && previous_empty {
            continue;
        }
        previous_empty = is_empty;
        result.push(line);
    }

    result.join("\n")
}
