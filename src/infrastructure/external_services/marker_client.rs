use async_trait::async_trait;
use reqwest::{Client, multipart};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractionOptions, ExtractionResult,
    ExtractionSubmission,
};
use crate::application::ports::source_fetcher::SourceDocument;

const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Clone)]
pub struct MarkerConfig {
    pub api_url: String,
    pub api_key: String,
    /// Where the extractor should deliver its completion callback.
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct SubmissionResponse {
    request_id: Option<String>,
    request_check_url: Option<String>,
    success: Option<bool>,
    error: Option<String>,
}

/// Client for the hosted Marker conversion API.
#[derive(Debug, Clone)]
pub struct MarkerClient {
    client: Client,
    config: MarkerConfig,
    api_origin: url::Origin,
}

impl MarkerClient {
    pub fn new(config: MarkerConfig) -> Result<Self, DocumentExtractionError> {
        let api_origin = Url::parse(&config.api_url)
            .map_err(|e| {
                DocumentExtractionError::InvalidResponse(format!("Invalid extractor URL: {}", e))
            })?
            .origin();
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DocumentExtractionError::SubmissionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config,
            api_origin,
        })
    }

    fn build_form(
        &self,
        document: SourceDocument,
        options: &ExtractionOptions,
    ) -> Result<multipart::Form, DocumentExtractionError> {
        let mime = document
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream");
        let part = multipart::Part::bytes(document.data)
            .file_name(document.file_name)
            .mime_str(mime)
            .map_err(|e| DocumentExtractionError::SubmissionFailed(e.to_string()))?;

        let mut form = multipart::Form::new().part("file", part);
        for (name, value) in options.form_fields() {
            form = form.text(name, value);
        }
        if let Some(webhook_url) = &self.config.webhook_url {
            form = form.text("webhook_url", webhook_url.clone());
        }
        Ok(form)
    }
}

#[async_trait]
impl DocumentExtractor for MarkerClient {
    async fn submit(
        &self,
        document: SourceDocument,
        options: &ExtractionOptions,
    ) -> Result<ExtractionSubmission, DocumentExtractionError> {
        let file_name = document.file_name.clone();
        let form = self.build_form(document, options)?;

        let response = self
            .client
            .post(&self.config.api_url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| DocumentExtractionError::SubmissionFailed(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocumentExtractionError::SubmissionFailed(format!(
                "{} responded {}: {}",
                file_name, status, body
            )));
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DocumentExtractionError::InvalidResponse(e.to_string()))?;
        let parsed: SubmissionResponse = serde_json::from_value(raw.clone())
            .map_err(|e| DocumentExtractionError::InvalidResponse(e.to_string()))?;

        if parsed.success == Some(false) {
            return Err(DocumentExtractionError::Rejected(
                parsed
                    .error
                    .unwrap_or_else(|| "Extractor rejected the document".to_string()),
            ));
        }

        let request_id = parsed
            .request_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                DocumentExtractionError::InvalidResponse("Response has no request_id".to_string())
            })?;

        tracing::debug!(request_id = %request_id, file_name = %file_name, "Document accepted by extractor");

        Ok(ExtractionSubmission {
            request_id,
            request_check_url: parsed.request_check_url,
            raw,
        })
    }

    async fn fetch_result(
        &self,
        request_check_url: &str,
    ) -> Result<ExtractionResult, DocumentExtractionError> {
        // The check URL arrives in an inbound webhook; never send the key elsewhere
        let check_url = Url::parse(request_check_url).map_err(|e| {
            DocumentExtractionError::ResultFetchFailed(format!("Invalid check URL: {}", e))
        })?;
        if check_url.origin() != self.api_origin {
            return Err(DocumentExtractionError::ResultFetchFailed(format!(
                "Check URL {} is not on the extractor host",
                request_check_url
            )));
        }

        let response = self
            .client
            .get(check_url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(|e| DocumentExtractionError::ResultFetchFailed(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocumentExtractionError::ResultFetchFailed(format!(
                "extractor responded {}: {}",
                status, body
            )));
        }

        response
            .json::<ExtractionResult>()
            .await
            .map_err(|e| DocumentExtractionError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, webhook_url: Option<&str>) -> MarkerClient {
        MarkerClient::new(MarkerConfig {
            api_url: format!("{}/api/v1/marker", server.uri()),
            api_key: "marker-key".to_string(),
            webhook_url: webhook_url.map(str::to_string),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn document() -> SourceDocument {
        SourceDocument {
            file_name: "brief.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            data: b"%PDF-1.7".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_submit_sends_form_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/marker"))
            .and(header("X-Api-Key", "marker-key"))
            .and(body_string_contains("name=\"output_format\""))
            .and(body_string_contains("name=\"webhook_url\""))
            .and(body_string_contains("filename=\"brief.pdf\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "error": null,
                "request_id": "req-123",
                "request_check_url": format!("{}/api/v1/marker/req-123", server.uri())
            })))
            .expect(1)
            .mount(&server)
            .await;

        let submission = client(&server, Some("https://casedeck.example.com/webhooks/marker"))
            .submit(document(), &ExtractionOptions::default())
            .await
            .unwrap();

        assert_eq!(submission.request_id, "req-123");
        assert_eq!(submission.raw["success"], json!(true));
        assert!(submission.request_check_url.unwrap().ends_with("/req-123"));
    }

    #[tokio::test]
    async fn test_submit_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "Unsupported file type"
            })))
            .mount(&server)
            .await;

        let result = client(&server, None)
            .submit(document(), &ExtractionOptions::default())
            .await;
        assert!(matches!(
            result,
            Err(DocumentExtractionError::Rejected(msg)) if msg == "Unsupported file type"
        ));
    }

    #[tokio::test]
    async fn test_submit_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let result = client(&server, None)
            .submit(document(), &ExtractionOptions::default())
            .await;
        assert!(matches!(result, Err(DocumentExtractionError::SubmissionFailed(_))));
    }

    #[tokio::test]
    async fn test_fetch_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/marker/req-123"))
            .and(header("X-Api-Key", "marker-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "output_format": "markdown",
                "markdown": "# Brief",
                "status": "complete",
                "success": true,
                "images": {"fig.png": "aGk="},
                "page_count": 2
            })))
            .mount(&server)
            .await;

        let result = client(&server, None)
            .fetch_result(&format!("{}/api/v1/marker/req-123", server.uri()))
            .await
            .unwrap();

        assert_eq!(result.markdown.as_deref(), Some("# Brief"));
        assert_eq!(result.page_count, Some(2));
        assert!(!result.is_pending());
    }

    #[tokio::test]
    async fn test_fetch_result_refuses_foreign_host() {
        let server = MockServer::start().await;

        let result = client(&server, None)
            .fetch_result("https://attacker.example.com/steal")
            .await;
        assert!(matches!(result, Err(DocumentExtractionError::ResultFetchFailed(_))));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
