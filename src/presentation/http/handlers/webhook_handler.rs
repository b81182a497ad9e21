use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

use crate::application::use_cases::{
    ExtractionWebhookRequest, HandleExtractionWebhookError, HandleExtractionWebhookUseCase,
};
use crate::presentation::http::dto::{MarkerWebhookDto, MessageResponseDto, WebhookResponseDto};

const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Receives extraction callbacks. Bodies are plain `{message}` / `{error}`
/// objects rather than the `ApiResponse` envelope.
pub struct WebhookHandler {
    webhook_use_case: Arc<HandleExtractionWebhookUseCase>,
}

impl WebhookHandler {
    pub fn new(webhook_use_case: Arc<HandleExtractionWebhookUseCase>) -> Self {
        Self { webhook_use_case }
    }

    pub async fn handle(
        State(handler): State<Arc<WebhookHandler>>,
        headers: HeaderMap,
        payload: Result<Json<MarkerWebhookDto>, JsonRejection>,
    ) -> impl IntoResponse {
        let header_secret = headers
            .get(WEBHOOK_SECRET_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let dto = match payload {
            Ok(Json(dto)) => dto,
            Err(rejection) => {
                // Secret failures outrank body failures
                if header_secret.is_some() {
                    if let Err(error) = handler
                        .webhook_use_case
                        .authorize(header_secret.as_deref())
                    {
                        return error_response(StatusCode::UNAUTHORIZED, &error);
                    }
                }
                tracing::warn!(error = %rejection, "Unreadable webhook body");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid webhook payload" })),
                )
                    .into_response();
            }
        };

        let webhook_secret = dto.webhook_secret.or(header_secret);

        let request = ExtractionWebhookRequest {
            request_id: dto.request_id,
            request_check_url: dto.request_check_url,
            webhook_secret,
        };

        match handler.webhook_use_case.execute(request).await {
            Ok(response) => (
                StatusCode::OK,
                Json(WebhookResponseDto::from(response)),
            )
                .into_response(),
            Err(error) => {
                let status = match &error {
                    HandleExtractionWebhookError::Unauthorized => StatusCode::UNAUTHORIZED,
                    HandleExtractionWebhookError::MissingField(_) => StatusCode::BAD_REQUEST,
                    HandleExtractionWebhookError::FileNotFound(_)
                    | HandleExtractionWebhookError::CaseStudyNotFound(_) => StatusCode::NOT_FOUND,
                    HandleExtractionWebhookError::ExtractorError(_)
                    | HandleExtractionWebhookError::RepositoryError(_) => {
                        tracing::error!(error = %error, "Webhook processing failed");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                error_response(status, &error)
            }
        }
    }

    pub async fn liveness() -> impl IntoResponse {
        (
            StatusCode::OK,
            Json(MessageResponseDto {
                message: "Marker webhook endpoint is ready".to_string(),
            }),
        )
    }
}

fn error_response(status: StatusCode, error: &HandleExtractionWebhookError) -> Response {
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}
