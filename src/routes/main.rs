use actix_web::{HttpResponse, Responder, get, web};

use crate::ai::AiService;
use crate::routes::MessageResponse;
use crate::services::main as main_service;

#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(MessageResponse {
        message: "Product Catalog API is running".to_string(),
    })
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(main_service::health())
}

#[get("/ai-status")]
pub async fn ai_status(ai: web::Data<dyn AiService>) -> impl Responder {
    HttpResponse::Ok().json(main_service::ai_status(ai.get_ref()))
}
