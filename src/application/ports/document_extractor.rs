use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::application::ports::source_fetcher::SourceDocument;

#[derive(Debug, Error)]
pub enum DocumentExtractionError {
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),
    #[error("Submission rejected by extractor: {0}")]
    Rejected(String),
    #[error("Result fetch failed: {0}")]
    ResultFetchFailed(String),
    #[error("Invalid extractor response: {0}")]
    InvalidResponse(String),
}

/// Fixed conversion options sent with every submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOptions {
    pub langs: &'static str,
    pub force_ocr: bool,
    pub paginate: bool,
    pub output_format: &'static str,
    pub use_llm: bool,
    pub strip_existing_ocr: bool,
    pub disable_image_extraction: bool,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            langs: "English",
            force_ocr: false,
            paginate: false,
            output_format: "markdown",
            use_llm: false,
            strip_existing_ocr: false,
            disable_image_extraction: false,
        }
    }
}

impl ExtractionOptions {
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("langs", self.langs.to_string()),
            ("force_ocr", self.force_ocr.to_string()),
            ("paginate", self.paginate.to_string()),
            ("output_format", self.output_format.to_string()),
            ("use_llm", self.use_llm.to_string()),
            ("strip_existing_ocr", self.strip_existing_ocr.to_string()),
            (
                "disable_image_extraction",
                self.disable_image_extraction.to_string(),
            ),
        ]
    }
}

/// Accepted extraction job. `raw` is the untouched response body.
#[derive(Debug, Clone)]
pub struct ExtractionSubmission {
    pub request_id: String,
    pub request_check_url: Option<String>,
    pub raw: serde_json::Value,
}

/// Job result as served from the extractor's check URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub output_format: Option<String>,
    #[serde(default)]
    pub markdown: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub images: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub page_count: Option<i64>,
}

impl ExtractionResult {
    pub fn is_pending(&self) -> bool {
        matches!(self.status.as_deref(), Some("processing"))
    }

    /// Error recorded against the file: the extractor's message, or a generic
    /// one when it reports failure without saying why.
    pub fn error_message(&self) -> Option<String> {
        match (&self.error, self.success) {
            (Some(error), _) if !error.trim().is_empty() => Some(error.clone()),
            (_, Some(false)) => Some("Extraction failed without an error message".to_string()),
            _ if matches!(self.status.as_deref(), Some("failed")) => {
                Some("Extraction failed without an error message".to_string())
            }
            _ => None,
        }
    }
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn submit(
        &self,
        document: SourceDocument,
        options: &ExtractionOptions,
    ) -> Result<ExtractionSubmission, DocumentExtractionError>;

    async fn fetch_result(
        &self,
        request_check_url: &str,
    ) -> Result<ExtractionResult, DocumentExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_options_form_fields() {
        let fields = ExtractionOptions::default().form_fields();
        assert!(fields.contains(&("langs", "English".to_string())));
        assert!(fields.contains(&("force_ocr", "false".to_string())));
        assert!(fields.contains(&("paginate", "false".to_string())));
        assert!(fields.contains(&("output_format", "markdown".to_string())));
        assert!(fields.contains(&("use_llm", "false".to_string())));
        assert!(fields.contains(&("strip_existing_ocr", "false".to_string())));
        assert!(fields.contains(&("disable_image_extraction", "false".to_string())));
        assert_eq!(fields.len(), 7);
    }

    #[test]
    fn test_result_parses_full_payload() {
        let result: ExtractionResult = serde_json::from_value(json!({
            "output_format": "markdown",
            "markdown": "# Title",
            "status": "complete",
            "success": true,
            "images": {"_page_0_Picture_1.jpeg": "aGVsbG8="},
            "metadata": {"pages": 1},
            "error": null,
            "page_count": 1
        }))
        .unwrap();

        assert_eq!(result.markdown.as_deref(), Some("# Title"));
        assert_eq!(result.images.as_ref().map(|i| i.len()), Some(1));
        assert_eq!(result.page_count, Some(1));
        assert!(!result.is_pending());
        assert_eq!(result.error_message(), None);
    }

    #[test]
    fn test_result_tolerates_missing_fields() {
        let result: ExtractionResult =
            serde_json::from_value(json!({"status": "processing"})).unwrap();
        assert!(result.is_pending());
        assert!(result.images.is_none());
    }

    #[test]
    fn test_error_message() {
        let explicit = ExtractionResult {
            success: Some(false),
            error: Some("Unsupported file type".to_string()),
            ..Default::default()
        };
        assert_eq!(
            explicit.error_message().as_deref(),
            Some("Unsupported file type")
        );

        let implicit = ExtractionResult {
            success: Some(false),
            ..Default::default()
        };
        assert!(implicit.error_message().is_some());

        let failed_status = ExtractionResult {
            status: Some("failed".to_string()),
            ..Default::default()
        };
        assert!(failed_status.error_message().is_some());
    }
}
