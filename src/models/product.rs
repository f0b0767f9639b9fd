use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::domain::product::{PRICE_SCALE, Product as DomainProduct};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub category: String,
    pub brand: String,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price_cents: i64,
    pub category: &'a str,
    pub brand: &'a str,
    pub stock_quantity: i32,
    pub is_active: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price_cents: i64,
    pub category: &'a str,
    pub brand: &'a str,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: Some(value.id),
            name: value.name,
            description: value.description,
            price: Decimal::new(value.price_cents, PRICE_SCALE),
            category: value.category,
            brand: value.brand,
            stock_quantity: value.stock_quantity,
            is_active: value.is_active,
            created_at: Some(value.created_at),
            updated_at: Some(value.updated_at),
        }
    }
}

impl<'a> From<&'a DomainProduct> for NewProduct<'a> {
    fn from(value: &'a DomainProduct) -> Self {
        Self {
            name: value.name.as_str(),
            description: value.description.as_str(),
            price_cents: price_to_cents(value.price),
            category: value.category.as_str(),
            brand: value.brand.as_str(),
            stock_quantity: value.stock_quantity,
            is_active: value.is_active,
        }
    }
}

impl<'a> UpdateProduct<'a> {
    /// Build the changeset for an existing row, stamping it with `updated_at`.
    pub fn new(value: &'a DomainProduct, updated_at: NaiveDateTime) -> Self {
        Self {
            name: value.name.as_str(),
            description: value.description.as_str(),
            price_cents: price_to_cents(value.price),
            category: value.category.as_str(),
            brand: value.brand.as_str(),
            stock_quantity: value.stock_quantity,
            is_active: value.is_active,
            updated_at,
        }
    }
}

/// Convert a decimal price into integer minor units.
///
/// Domain prices are validated to two decimal places and eight integer
/// digits, so the rescaled mantissa always fits in an `i64`.
pub fn price_to_cents(price: Decimal) -> i64 {
    let mut price = price;
    price.rescale(PRICE_SCALE);
    i64::try_from(price.mantissa()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn price_round_trips_through_cents() {
        let price = Decimal::from_str("999.99").expect("decimal");
        assert_eq!(price_to_cents(price), 99_999);
        assert_eq!(Decimal::new(99_999, PRICE_SCALE), price);

        let whole = Decimal::from_str("12").expect("decimal");
        assert_eq!(price_to_cents(whole), 1_200);
    }
}
