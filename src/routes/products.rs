use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, delete, get, patch, post, put, web};
use serde::Serialize;

use crate::ai::{AiError, AiService};
use crate::domain::product::Product;
use crate::forms::products::{AddProductForm, EditProductForm, StockForm};
use crate::repository::DieselRepository;
use crate::routes::{MessageResponse, error_response, internal_error, run_blocking};
use crate::services::products::{self, ProductView, ProductsQuery, SuggestionsQuery};
use crate::services::ServiceError;

/// Body returned after a stock change.
#[derive(Debug, Serialize)]
pub struct StockUpdateResponse {
    pub message: String,
    pub new_stock: i32,
}

fn product_list(items: Vec<Product>) -> HttpResponse {
    let views: Vec<ProductView> = items.into_iter().map(ProductView::from).collect();
    HttpResponse::Ok().json(views)
}

fn message(text: &str) -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        message: text.to_string(),
    })
}

#[post("/products")]
pub async fn create_product(
    repo: web::Data<DieselRepository>,
    ai: web::Data<dyn AiService>,
    web::Json(form): web::Json<AddProductForm>,
) -> impl Responder {
    let result =
        run_blocking(move || products::create_product(repo.get_ref(), ai.get_ref(), form)).await;

    match result {
        Ok(product) => HttpResponse::Created().json(ProductView::from(product)),
        Err(err @ (ServiceError::Validation(_) | ServiceError::Duplicate(_))) => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        Err(err) => internal_error("create product", &err),
    }
}

#[get("/products")]
pub async fn list_products(
    params: web::Query<ProductsQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let available_only = params.available_only;
    let result = run_blocking(move || {
        if available_only {
            products::get_available_products(repo.get_ref())
        } else {
            products::get_all_products(repo.get_ref())
        }
    })
    .await;

    match result {
        Ok(items) => product_list(items),
        Err(err) => internal_error("list products", &err),
    }
}

#[get("/products/category/{category}")]
pub async fn products_by_category(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let category = path.into_inner();
    let result =
        run_blocking(move || products::get_products_by_category(repo.get_ref(), &category)).await;

    match result {
        Ok(items) => product_list(items),
        Err(err) => internal_error("list products by category", &err),
    }
}

#[get("/products/search/{term}")]
pub async fn search_products(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let term = path.into_inner();
    let result = run_blocking(move || products::search_products(repo.get_ref(), &term)).await;

    match result {
        Ok(items) => product_list(items),
        Err(err) => internal_error("search products", &err),
    }
}

#[get("/products/suggestions/{category}")]
pub async fn category_suggestions(
    path: web::Path<String>,
    params: web::Query<SuggestionsQuery>,
    ai: web::Data<dyn AiService>,
) -> impl Responder {
    let category = path.into_inner();
    let count = params.count;
    let result = run_blocking(move || {
        products::get_category_suggestions(ai.get_ref(), &category, count)
    })
    .await;

    match result {
        Ok(suggestions) => HttpResponse::Ok().json(suggestions),
        Err(ServiceError::Ai(AiError::Validation(detail))) => {
            error_response(StatusCode::BAD_REQUEST, detail)
        }
        Err(ServiceError::Ai(err @ AiError::Generation { .. })) => {
            log::error!("Failed to generate suggestions: {err}");
            error_response(StatusCode::BAD_GATEWAY, "AI service is unavailable")
        }
        Err(err) => internal_error("generate suggestions", &err),
    }
}

#[get("/products/{product_id}")]
pub async fn get_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();
    let result =
        run_blocking(move || products::get_product_by_id(repo.get_ref(), product_id)).await;

    match result {
        Ok(Some(product)) => HttpResponse::Ok().json(ProductView::from(product)),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Product not found"),
        Err(err) => internal_error("fetch product", &err),
    }
}

#[put("/products/{product_id}")]
pub async fn update_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<EditProductForm>,
) -> impl Responder {
    let product_id = path.into_inner();
    let result =
        run_blocking(move || products::update_product(repo.get_ref(), product_id, form)).await;

    match result {
        Ok(product) => HttpResponse::Ok().json(ProductView::from(product)),
        Err(
            err @ (ServiceError::Validation(_)
            | ServiceError::Duplicate(_)
            | ServiceError::NotFound(_)),
        ) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
        Err(err) => internal_error("update product", &err),
    }
}

#[patch("/products/{product_id}/stock")]
pub async fn update_stock(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<StockForm>,
) -> impl Responder {
    let product_id = path.into_inner();
    let result = run_blocking(move || {
        products::update_stock(repo.get_ref(), product_id, form.new_stock)
    })
    .await;

    match result {
        Ok(product) => HttpResponse::Ok().json(StockUpdateResponse {
            message: "Stock updated successfully".to_string(),
            new_stock: product.stock_quantity,
        }),
        Err(err @ (ServiceError::Validation(_) | ServiceError::NotFound(_))) => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        Err(err) => internal_error("update stock", &err),
    }
}

#[patch("/products/{product_id}/deactivate")]
pub async fn deactivate_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();
    let result =
        run_blocking(move || products::deactivate_product(repo.get_ref(), product_id)).await;

    match result {
        Ok(_) => message("Product deactivated successfully"),
        Err(err @ ServiceError::NotFound(_)) => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        Err(err) => internal_error("deactivate product", &err),
    }
}

#[patch("/products/{product_id}/activate")]
pub async fn activate_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();
    let result = run_blocking(move || products::activate_product(repo.get_ref(), product_id)).await;

    match result {
        Ok(_) => message("Product activated successfully"),
        Err(err @ ServiceError::NotFound(_)) => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        Err(err) => internal_error("activate product", &err),
    }
}

#[delete("/products/{product_id}")]
pub async fn delete_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();
    let result = run_blocking(move || products::delete_product(repo.get_ref(), product_id)).await;

    match result {
        Ok(()) => message("Product deleted successfully"),
        Err(ServiceError::NotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, "Product not found")
        }
        Err(err) => internal_error("delete product", &err),
    }
}

#[post("/products/{product_id}/improve-description")]
pub async fn improve_description(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    ai: web::Data<dyn AiService>,
) -> impl Responder {
    let product_id = path.into_inner();
    let result = run_blocking(move || {
        products::improve_product_description(repo.get_ref(), ai.get_ref(), product_id)
    })
    .await;

    match result {
        Ok(product) => HttpResponse::Ok().json(ProductView::from(product)),
        Err(err @ (ServiceError::Validation(_) | ServiceError::NotFound(_))) => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        Err(err) => internal_error("improve description", &err),
    }
}
