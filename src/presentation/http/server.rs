use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::presentation::http::{
    handlers::{CaseStudyHandler, WebhookHandler},
    routes::{case_study_routes, health_routes, webhook_routes},
};

/// Assembles every route behind the shared CORS, body-limit and trace layers.
pub fn build_router(
    case_study_handler: Arc<CaseStudyHandler>,
    webhook_handler: Arc<WebhookHandler>,
    max_body_bytes: usize,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health_routes())
        .merge(case_study_routes(case_study_handler))
        .merge(webhook_routes(webhook_handler))
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(
            TraceLayer::new_for_http()
                .on_request(
                    |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                        tracing::info!("Received request: {} {}", request.method(), request.uri());
                    },
                )
                .on_response(
                    |response: &axum::http::Response<axum::body::Body>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            "Response: {} (took {} ms)",
                            response.status(),
                            latency.as_millis()
                        );
                    },
                )
                .on_failure(
                    |error: ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::error!(
                            "Request failed: {:?} (took {} ms)",
                            error,
                            latency.as_millis()
                        );
                    },
                ),
        )
}

pub struct HttpServer {
    case_study_handler: Arc<CaseStudyHandler>,
    webhook_handler: Arc<WebhookHandler>,
    max_body_bytes: usize,
    port: u16,
}

impl HttpServer {
    pub fn new(
        case_study_handler: Arc<CaseStudyHandler>,
        webhook_handler: Arc<WebhookHandler>,
        max_body_bytes: usize,
        port: u16,
    ) -> Self {
        Self {
            case_study_handler,
            webhook_handler,
            max_body_bytes,
            port,
        }
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = build_router(
            self.case_study_handler,
            self.webhook_handler,
            self.max_body_bytes,
        );

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        axum::serve(listener, app).await?;
        Ok(())
    }
}
