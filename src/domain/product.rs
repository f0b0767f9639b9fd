use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum allowed length for a product name.
pub const NAME_MAX_LEN: usize = 255;
/// Maximum allowed length for a product description.
pub const DESCRIPTION_MAX_LEN: usize = 2000;
/// Maximum allowed length for a category label.
pub const CATEGORY_MAX_LEN: usize = 100;
/// Maximum allowed length for a brand label.
pub const BRAND_MAX_LEN: usize = 100;
/// Number of fractional digits kept for prices.
pub const PRICE_SCALE: u32 = 2;
/// Prices are stored as DECIMAL(10,2), leaving eight integer digits.
const PRICE_INTEGER_DIGITS: u32 = 8;

/// Result type returned by product entity operations.
pub type ProductResult<T> = Result<T, ProductError>;

/// Business rule violations raised by the product entity.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProductError {
    /// A required text field is empty after trimming.
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },
    /// A text field exceeds its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    /// Prices must be strictly positive.
    #[error("price must be greater than 0")]
    NonPositivePrice,
    /// Prices carry at most two decimal places.
    #[error("price must have at most 2 decimal places")]
    PricePrecision,
    /// The price does not fit the storage column.
    #[error("price must be lower than 100000000")]
    PriceTooLarge,
    /// Stock cannot go below zero.
    #[error("stock quantity cannot be negative")]
    NegativeStock,
}

/// Domain representation of a catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Storage identifier, absent until the product is first saved.
    pub id: Option<i32>,
    /// Unique, trimmed product name.
    pub name: String,
    /// Free-form description, possibly generated by the AI service.
    pub description: String,
    /// Unit price with two decimal places.
    pub price: Decimal,
    /// Trimmed category label.
    pub category: String,
    /// Trimmed brand label.
    pub brand: String,
    /// Units currently in stock.
    pub stock_quantity: i32,
    /// Soft-delete flag; inactive products are hidden from listings.
    pub is_active: bool,
    /// Timestamp assigned by storage on insert.
    pub created_at: Option<NaiveDateTime>,
    /// Timestamp refreshed by storage on every save.
    pub updated_at: Option<NaiveDateTime>,
}

impl Product {
    /// Build a new, unsaved product, validating and trimming every field.
    pub fn new(name: &str, price: Decimal, category: &str, brand: &str) -> ProductResult<Self> {
        Ok(Self {
            id: None,
            name: required_text("name", name, NAME_MAX_LEN)?,
            description: String::new(),
            price: validated_price(price)?,
            category: required_text("category", category, CATEGORY_MAX_LEN)?,
            brand: required_text("brand", brand, BRAND_MAX_LEN)?,
            stock_quantity: 0,
            is_active: true,
            created_at: None,
            updated_at: None,
        })
    }

    /// Attach a description to the product.
    pub fn with_description(mut self, description: &str) -> ProductResult<Self> {
        self.set_description(description)?;
        Ok(self)
    }

    /// Set the initial stock of the product.
    pub fn with_stock(mut self, quantity: i32) -> ProductResult<Self> {
        self.update_stock(quantity)?;
        Ok(self)
    }

    pub fn rename(&mut self, name: &str) -> ProductResult<()> {
        self.name = required_text("name", name, NAME_MAX_LEN)?;
        Ok(())
    }

    pub fn set_price(&mut self, price: Decimal) -> ProductResult<()> {
        self.price = validated_price(price)?;
        Ok(())
    }

    pub fn set_category(&mut self, category: &str) -> ProductResult<()> {
        self.category = required_text("category", category, CATEGORY_MAX_LEN)?;
        Ok(())
    }

    pub fn set_brand(&mut self, brand: &str) -> ProductResult<()> {
        self.brand = required_text("brand", brand, BRAND_MAX_LEN)?;
        Ok(())
    }

    /// Replace the description. Empty descriptions are allowed.
    pub fn set_description(&mut self, description: &str) -> ProductResult<()> {
        let trimmed = description.trim();
        if trimmed.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(ProductError::TooLong {
                field: "description",
                max: DESCRIPTION_MAX_LEN,
            });
        }
        self.description = trimmed.to_string();
        Ok(())
    }

    /// Set the stock level, rejecting negative quantities.
    pub fn update_stock(&mut self, quantity: i32) -> ProductResult<()> {
        if quantity < 0 {
            return Err(ProductError::NegativeStock);
        }
        self.stock_quantity = quantity;
        Ok(())
    }

    /// A product can be sold when it is active and has stock left.
    pub fn is_available(&self) -> bool {
        self.is_active && self.stock_quantity > 0
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Re-check the entity invariants after in-place mutation.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.category.trim().is_empty()
            && !self.brand.trim().is_empty()
            && self.price > Decimal::ZERO
            && self.stock_quantity >= 0
    }

    /// Apply the fields present in `updates`, leaving the others untouched.
    pub fn apply(&mut self, updates: &UpdateProduct) -> ProductResult<()> {
        if let Some(name) = updates.name.as_deref() {
            self.rename(name)?;
        }
        if let Some(price) = updates.price {
            self.set_price(price)?;
        }
        if let Some(category) = updates.category.as_deref() {
            self.set_category(category)?;
        }
        if let Some(brand) = updates.brand.as_deref() {
            self.set_brand(brand)?;
        }
        if let Some(quantity) = updates.stock_quantity {
            self.update_stock(quantity)?;
        }
        if let Some(description) = updates.description.as_deref() {
            self.set_description(description)?;
        }
        Ok(())
    }
}

/// Patch data applied when updating an existing product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProduct {
    /// Optional name update.
    pub name: Option<String>,
    /// Optional price update.
    pub price: Option<Decimal>,
    /// Optional category update.
    pub category: Option<String>,
    /// Optional brand update.
    pub brand: Option<String>,
    /// Optional stock update.
    pub stock_quantity: Option<i32>,
    /// Optional description update.
    pub description: Option<String>,
}

impl UpdateProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn stock_quantity(mut self, quantity: i32) -> Self {
        self.stock_quantity = Some(quantity);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the patch carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Query definition used to list products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Optional exact category filter.
    pub category: Option<String>,
    /// Optional case-insensitive search applied to name and description.
    pub search: Option<String>,
}

impl ProductListQuery {
    /// Construct a query that targets every active product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by an exact category match.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Filter the results by a search term applied to the name or description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}

fn required_text(field: &'static str, value: &str, max: usize) -> ProductResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProductError::EmptyField { field });
    }
    if trimmed.chars().count() > max {
        return Err(ProductError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

fn validated_price(price: Decimal) -> ProductResult<Decimal> {
    if price <= Decimal::ZERO {
        return Err(ProductError::NonPositivePrice);
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(ProductError::PricePrecision);
    }
    if price >= Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS)) {
        return Err(ProductError::PriceTooLarge);
    }

    let mut price = price;
    price.rescale(PRICE_SCALE);
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn price(value: &str) -> Decimal {
        Decimal::from_str(value).expect("valid decimal")
    }

    fn sample() -> Product {
        Product::new("iPhone 15", price("999.99"), "Smartphones", "Apple").expect("valid product")
    }

    #[test]
    fn new_product_trims_and_defaults() {
        let product = Product::new("  iPhone 15  ", price("999.99"), "  Smartphones ", " Apple ")
            .expect("valid product");

        assert_eq!(product.id, None);
        assert_eq!(product.name, "iPhone 15");
        assert_eq!(product.category, "Smartphones");
        assert_eq!(product.brand, "Apple");
        assert_eq!(product.description, "");
        assert_eq!(product.stock_quantity, 0);
        assert!(product.is_active);
        assert!(product.created_at.is_none());
    }

    #[test]
    fn new_product_rejects_blank_fields() {
        assert_eq!(
            Product::new("   ", price("1.00"), "Phones", "Apple"),
            Err(ProductError::EmptyField { field: "name" })
        );
        assert_eq!(
            Product::new("Phone", price("1.00"), "", "Apple"),
            Err(ProductError::EmptyField { field: "category" })
        );
        assert_eq!(
            Product::new("Phone", price("1.00"), "Phones", "\t"),
            Err(ProductError::EmptyField { field: "brand" })
        );
    }

    #[test]
    fn new_product_rejects_long_name() {
        let name = "x".repeat(NAME_MAX_LEN + 1);
        assert_eq!(
            Product::new(&name, price("1.00"), "Phones", "Apple"),
            Err(ProductError::TooLong {
                field: "name",
                max: NAME_MAX_LEN
            })
        );
    }

    #[test]
    fn new_product_validates_price() {
        assert_eq!(
            Product::new("Phone", price("0.00"), "Phones", "Apple"),
            Err(ProductError::NonPositivePrice)
        );
        assert_eq!(
            Product::new("Phone", price("-10"), "Phones", "Apple"),
            Err(ProductError::NonPositivePrice)
        );
        assert_eq!(
            Product::new("Phone", price("1.005"), "Phones", "Apple"),
            Err(ProductError::PricePrecision)
        );
        assert_eq!(
            Product::new("Phone", price("100000000"), "Phones", "Apple"),
            Err(ProductError::PriceTooLarge)
        );
    }

    #[test]
    fn price_is_rescaled_to_two_places() {
        let product = Product::new("Phone", price("10.5"), "Phones", "Apple").expect("valid");
        assert_eq!(product.price.to_string(), "10.50");

        let product = Product::new("Phone", price("10.500"), "Phones", "Apple").expect("valid");
        assert_eq!(product.price.to_string(), "10.50");
    }

    #[test]
    fn availability_depends_on_stock_and_state() {
        let mut product = sample();
        assert!(!product.is_available());

        product.update_stock(3).expect("stock update");
        assert!(product.is_available());

        product.deactivate();
        assert!(!product.is_available());

        product.activate();
        product.activate();
        assert!(product.is_active);
        assert!(product.is_available());
    }

    #[test]
    fn update_stock_rejects_negative_values() {
        let mut product = sample().with_stock(5).expect("stock");

        assert_eq!(product.update_stock(-1), Err(ProductError::NegativeStock));
        assert_eq!(product.stock_quantity, 5);

        product.update_stock(0).expect("zero stock");
        assert!(!product.is_available());
    }

    #[test]
    fn is_valid_detects_broken_invariants() {
        let mut product = sample();
        assert!(product.is_valid());

        product.name = "  ".to_string();
        assert!(!product.is_valid());

        let mut product = sample();
        product.price = Decimal::ZERO;
        assert!(!product.is_valid());

        let mut product = sample();
        product.stock_quantity = -2;
        assert!(!product.is_valid());
    }

    #[test]
    fn apply_only_touches_provided_fields() {
        let mut product = sample().with_description("Original").expect("description");
        let updates = UpdateProduct::new().price(price("899")).stock_quantity(7);

        product.apply(&updates).expect("apply");

        assert_eq!(product.name, "iPhone 15");
        assert_eq!(product.description, "Original");
        assert_eq!(product.price.to_string(), "899.00");
        assert_eq!(product.stock_quantity, 7);
    }

    #[test]
    fn apply_rejects_invalid_fields() {
        let mut product = sample();
        let updates = UpdateProduct::new().brand("   ");

        assert_eq!(
            product.apply(&updates),
            Err(ProductError::EmptyField { field: "brand" })
        );
    }

    #[test]
    fn description_length_is_limited() {
        let long = "d".repeat(DESCRIPTION_MAX_LEN + 1);
        assert_eq!(
            sample().with_description(&long),
            Err(ProductError::TooLong {
                field: "description",
                max: DESCRIPTION_MAX_LEN
            })
        );
    }
}
