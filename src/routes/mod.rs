use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, error, web};
use serde::Serialize;

use crate::services::{ServiceError, ServiceResult};

pub mod main;
pub mod products;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Body of responses that only carry a confirmation.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Register every endpoint of the catalog API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let detail = err.to_string();
        error::InternalError::from_response(err, error_response(StatusCode::BAD_REQUEST, detail))
            .into()
    });
    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        let detail = err.to_string();
        error::InternalError::from_response(err, error_response(StatusCode::BAD_REQUEST, detail))
            .into()
    });

    cfg.app_data(json_config)
        .app_data(query_config)
        .service(main::root)
        .service(main::health)
        .service(main::ai_status)
        .service(products::create_product)
        .service(products::list_products)
        .service(products::products_by_category)
        .service(products::search_products)
        .service(products::category_suggestions)
        .service(products::get_product)
        .service(products::update_product)
        .service(products::update_stock)
        .service(products::deactivate_product)
        .service(products::activate_product)
        .service(products::delete_product)
        .service(products::improve_description);
}

/// CORS policy for browser clients served from `origins`.
pub fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

/// Run a blocking service call on the actix blocking thread pool.
pub(crate) async fn run_blocking<T, F>(task: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(task)
        .await
        .unwrap_or_else(|err| Err(ServiceError::Internal(err.to_string())))
}

pub(crate) fn error_response(status: StatusCode, detail: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        detail: detail.into(),
    })
}

/// Log an unclassified failure and hide its details from the client.
pub(crate) fn internal_error(action: &str, err: &ServiceError) -> HttpResponse {
    log::error!("Failed to {action}: {err}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
