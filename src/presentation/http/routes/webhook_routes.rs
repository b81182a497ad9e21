use axum::{Router, routing::get};
use std::sync::Arc;

use crate::presentation::http::handlers::WebhookHandler;

pub fn webhook_routes(webhook_handler: Arc<WebhookHandler>) -> Router {
    Router::new()
        .route(
            "/webhooks/marker",
            get(WebhookHandler::liveness).post(WebhookHandler::handle),
        )
        .with_state(webhook_handler)
}
