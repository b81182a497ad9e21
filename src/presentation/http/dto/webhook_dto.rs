use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::ExtractionWebhookResponse;

/// Completion callback posted by the extractor. Every field is optional so
/// missing ones surface as a 400 from the use case rather than a parse error.
#[derive(Debug, Default, Deserialize)]
pub struct MarkerWebhookDto {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub request_check_url: Option<String>,
    #[serde(default)]
    pub webhook_secret: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebhookResponseDto {
    pub message: String,
    pub file_id: Uuid,
    pub images_stored: usize,
    pub images_failed: usize,
}

impl From<ExtractionWebhookResponse> for WebhookResponseDto {
    fn from(response: ExtractionWebhookResponse) -> Self {
        Self {
            message: response.message().to_string(),
            file_id: response.file_id,
            images_stored: response.images_stored,
            images_failed: response.images_failed,
        }
    }
}
