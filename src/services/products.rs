use serde::{Deserialize, Serialize};

use crate::ai::{AiService, DEFAULT_SUGGESTION_COUNT};
use crate::domain::product::{DESCRIPTION_MAX_LEN, Product};
use crate::forms::products::{AddProductForm, EditProductForm, NewProduct};
use crate::repository::{ProductReader, ProductWriter, RepositoryError};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the product listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Restrict the listing to products that are active and in stock.
    #[serde(default)]
    pub available_only: bool,
}

/// Query parameters accepted by the category suggestions endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SuggestionsQuery {
    pub count: Option<i32>,
}

/// JSON representation of a product, including its computed availability.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub is_available: bool,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let is_available = product.is_available();
        Self {
            product,
            is_available,
        }
    }
}

/// AI-generated product ideas for a category.
#[derive(Debug, Serialize)]
pub struct CategorySuggestions {
    pub category: String,
    pub suggestions: String,
}

/// Creates a product, asking the AI service for a description when requested.
///
/// Description generation never fails the creation: any AI error, or a text
/// too long to store, falls back to the payload's `basic_info` or to a
/// `"{brand} {name} - {category}"` template.
pub fn create_product<R, A>(repo: &R, ai: &A, form: AddProductForm) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
    A: AiService + ?Sized,
{
    let input = form.into_new_product()?;

    if repo.find_by_name(&input.name)?.is_some() {
        return Err(ServiceError::Duplicate(input.name));
    }

    let description = describe(ai, &input);

    let product = Product::new(&input.name, input.price, &input.category, &input.brand)?
        .with_stock(input.stock_quantity)?
        .with_description(&description)?;

    if !product.is_valid() {
        return Err(ServiceError::Validation("Product data is invalid".to_string()));
    }

    let created = repo
        .save(&product)
        .map_err(|err| write_error(err, &product))?;

    log::info!(
        "Created product {} ({})",
        created.id.unwrap_or_default(),
        created.name
    );

    Ok(created)
}

fn describe<A>(ai: &A, input: &NewProduct) -> String
where
    A: AiService + ?Sized,
{
    if !input.auto_generate_description {
        return input.fallback_description();
    }

    match ai.generate_product_description(
        &input.name,
        &input.category,
        &input.brand,
        input.basic_info.as_deref(),
    ) {
        Ok(text) if text.chars().count() <= DESCRIPTION_MAX_LEN => text,
        Ok(_) => {
            log::warn!(
                "Generated description for '{}' is too long, using fallback",
                input.name
            );
            input.fallback_description()
        }
        Err(err) => {
            log::warn!(
                "Description generation for '{}' failed, using fallback: {err}",
                input.name
            );
            input.fallback_description()
        }
    }
}

pub fn get_product_by_id<R>(repo: &R, product_id: i32) -> ServiceResult<Option<Product>>
where
    R: ProductReader + ?Sized,
{
    Ok(repo.find_by_id(product_id)?)
}

/// Lists every active product.
pub fn get_all_products<R>(repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    Ok(repo.get_all_active()?)
}

pub fn get_products_by_category<R>(repo: &R, category: &str) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    Ok(repo.get_by_category(category)?)
}

/// Case-insensitive substring search over active product names and descriptions.
pub fn search_products<R>(repo: &R, term: &str) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    Ok(repo.search_by_name_or_description(term)?)
}

/// Lists active products that still have stock.
pub fn get_available_products<R>(repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    let products = repo.get_all_active()?;
    Ok(products
        .into_iter()
        .filter(Product::is_available)
        .collect())
}

/// Applies the fields present in `form` to an existing product.
pub fn update_product<R>(repo: &R, product_id: i32, form: EditProductForm) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let updates = form.into_update_product()?;

    let mut product = fetch_product(repo, product_id)?;
    product.apply(&updates)?;

    if !product.is_valid() {
        return Err(ServiceError::Validation(
            "Updated product data is invalid".to_string(),
        ));
    }

    repo.save(&product)
        .map_err(|err| write_error(err, &product))
}

pub fn update_stock<R>(repo: &R, product_id: i32, new_stock: i32) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let mut product = fetch_product(repo, product_id)?;
    product.update_stock(new_stock)?;

    repo.save(&product)
        .map_err(|err| write_error(err, &product))
}

/// Soft-deletes a product; it disappears from every listing but keeps its row.
pub fn deactivate_product<R>(repo: &R, product_id: i32) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let mut product = fetch_product(repo, product_id)?;
    product.deactivate();

    repo.save(&product)
        .map_err(|err| write_error(err, &product))
}

pub fn activate_product<R>(repo: &R, product_id: i32) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let mut product = fetch_product(repo, product_id)?;
    product.activate();

    repo.save(&product)
        .map_err(|err| write_error(err, &product))
}

/// Permanently removes a product.
pub fn delete_product<R>(repo: &R, product_id: i32) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    if repo.delete(product_id)? {
        log::info!("Deleted product {product_id}");
        Ok(())
    } else {
        Err(ServiceError::NotFound(product_id))
    }
}

/// Rewrites the stored description through the AI service.
///
/// Unlike creation there is no fallback: any AI failure is reported to the
/// caller as a validation error.
pub fn improve_product_description<R, A>(
    repo: &R,
    ai: &A,
    product_id: i32,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
    A: AiService + ?Sized,
{
    let mut product = fetch_product(repo, product_id)?;

    if product.description.trim().is_empty() {
        return Err(ServiceError::Validation(
            "Product has no description to improve".to_string(),
        ));
    }

    let improved = ai
        .improve_product_description(&product.description)
        .map_err(|err| {
            ServiceError::Validation(format!("Failed to improve description: {err}"))
        })?;

    product.set_description(&improved).map_err(|err| {
        ServiceError::Validation(format!("Failed to improve description: {err}"))
    })?;

    repo.save(&product)
        .map_err(|err| write_error(err, &product))
}

/// Asks the AI service for product ideas in `category`.
pub fn get_category_suggestions<A>(
    ai: &A,
    category: &str,
    count: Option<i32>,
) -> ServiceResult<CategorySuggestions>
where
    A: AiService + ?Sized,
{
    let count = count.unwrap_or(DEFAULT_SUGGESTION_COUNT);
    let suggestions = ai.generate_product_suggestions(category, count)?;

    Ok(CategorySuggestions {
        category: category.to_string(),
        suggestions,
    })
}

fn fetch_product<R>(repo: &R, product_id: i32) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    repo.find_by_id(product_id)?
        .ok_or(ServiceError::NotFound(product_id))
}

/// Translate storage failures of a write into the caller-facing errors.
fn write_error(err: RepositoryError, product: &Product) -> ServiceError {
    match err {
        RepositoryError::Duplicate(_) => ServiceError::Duplicate(product.name.clone()),
        RepositoryError::NotFound => ServiceError::NotFound(product.id.unwrap_or_default()),
        other => ServiceError::Repository(other),
    }
}
