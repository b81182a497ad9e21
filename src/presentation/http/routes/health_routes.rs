use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};

use crate::presentation::http::dto::{ApiResponse, HealthResponseDto, MessageResponseDto};

const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

pub fn health_routes() -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
}

async fn root_handler() -> impl IntoResponse {
    let message = MessageResponseDto {
        message: format!("{} case study service", SERVICE_NAME),
    };
    (StatusCode::OK, Json(ApiResponse::success(message)))
}

async fn health_handler() -> impl IntoResponse {
    let health = HealthResponseDto {
        service: SERVICE_NAME.to_string(),
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(ApiResponse::success(health)))
}
