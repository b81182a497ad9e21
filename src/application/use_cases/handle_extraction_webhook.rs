use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::document_extractor::{DocumentExtractionError, ExtractionResult};
use crate::application::ports::object_storage::ObjectStorageError;
use crate::application::ports::{DocumentExtractor, ObjectStorage};
use crate::application::services::settle_all;
use crate::domain::entities::{CaseStudyImage, ExtractionOutcome};
use crate::domain::repositories::{
    CaseStudyRepository, FileRepository, ImageRepository, RepositoryError,
};
use crate::domain::value_objects::{FileMetadata, WebhookSecret};

static UNSAFE_PATH_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid regex"));

#[derive(Debug, Error)]
pub enum HandleExtractionWebhookError {
    #[error("Invalid webhook secret")]
    Unauthorized,
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("No file found for request {0}")]
    FileNotFound(String),
    #[error("Case study not found for file {0}")]
    CaseStudyNotFound(Uuid),
    #[error("Extractor error: {0}")]
    ExtractorError(#[from] DocumentExtractionError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Why a single extracted image was skipped. Never fatal for the webhook.
#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("Could not decode image {file_name}: {source}")]
    Decode {
        file_name: String,
        source: base64::DecodeError,
    },
    #[error(transparent)]
    Upload(#[from] ObjectStorageError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, Default)]
pub struct ExtractionWebhookRequest {
    pub request_id: Option<String>,
    pub request_check_url: Option<String>,
    pub webhook_secret: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookDisposition {
    /// The file moved to complete on this delivery.
    Completed,
    /// The extractor has not finished yet; nothing changed.
    StillProcessing,
    /// The file was already complete; only missing images were stored.
    AlreadyComplete,
}

#[derive(Debug, Clone)]
pub struct ExtractionWebhookResponse {
    pub file_id: Uuid,
    pub disposition: WebhookDisposition,
    pub images_stored: usize,
    pub images_failed: usize,
}

impl ExtractionWebhookResponse {
    pub fn message(&self) -> &'static str {
        match self.disposition {
            WebhookDisposition::Completed => "Webhook processed successfully",
            WebhookDisposition::StillProcessing => "Extraction still processing",
            WebhookDisposition::AlreadyComplete => "File already processed",
        }
    }
}

pub struct HandleExtractionWebhookUseCase {
    webhook_secret: WebhookSecret,
    case_study_repository: Arc<dyn CaseStudyRepository>,
    file_repository: Arc<dyn FileRepository>,
    image_repository: Arc<dyn ImageRepository>,
    document_extractor: Arc<dyn DocumentExtractor>,
    object_storage: Arc<dyn ObjectStorage>,
}

impl HandleExtractionWebhookUseCase {
    pub fn new(
        webhook_secret: WebhookSecret,
        case_study_repository: Arc<dyn CaseStudyRepository>,
        file_repository: Arc<dyn FileRepository>,
        image_repository: Arc<dyn ImageRepository>,
        document_extractor: Arc<dyn DocumentExtractor>,
        object_storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            webhook_secret,
            case_study_repository,
            file_repository,
            image_repository,
            document_extractor,
            object_storage,
        }
    }

    /// Checks a presented secret without touching any state.
    pub fn authorize(&self, provided: Option<&str>) -> Result<(), HandleExtractionWebhookError> {
        if self.webhook_secret.verify(provided) {
            Ok(())
        } else {
            tracing::warn!("Rejected extraction webhook with invalid secret");
            Err(HandleExtractionWebhookError::Unauthorized)
        }
    }

    pub async fn execute(
        &self,
        request: ExtractionWebhookRequest,
    ) -> Result<ExtractionWebhookResponse, HandleExtractionWebhookError> {
        self.authorize(request.webhook_secret.as_deref())?;

        let request_id = required(request.request_id, "request_id")?;
        let request_check_url = required(request.request_check_url, "request_check_url")?;

        let mut file = self
            .file_repository
            .find_by_request_id(&request_id)
            .await?
            .ok_or_else(|| HandleExtractionWebhookError::FileNotFound(request_id.clone()))?;

        // Resolved before anything is written so a missing parent commits nothing
        let case_study = self
            .case_study_repository
            .find_by_id(file.case_study_id())
            .await?
            .ok_or(HandleExtractionWebhookError::CaseStudyNotFound(file.id()))?;

        let result = self
            .document_extractor
            .fetch_result(&request_check_url)
            .await?;

        let disposition = if !file.is_processing() {
            tracing::info!(
                request_id = %request_id,
                file_id = %file.id(),
                "Webhook replay for completed file, checking images"
            );
            WebhookDisposition::AlreadyComplete
        } else if result.is_pending() {
            tracing::debug!(request_id = %request_id, "Extraction result still pending");
            return Ok(ExtractionWebhookResponse {
                file_id: file.id(),
                disposition: WebhookDisposition::StillProcessing,
                images_stored: 0,
                images_failed: 0,
            });
        } else {
            if let Err(message) = file.complete(outcome_from_result(&result)) {
                tracing::warn!(request_id = %request_id, "{}", message);
            }

            // A concurrent delivery may have completed the row first
            if self.file_repository.save_completion(&file).await? {
                if let Some(error) = file.error() {
                    tracing::warn!(
                        request_id = %request_id,
                        file_id = %file.id(),
                        error = %error,
                        "Extraction completed with an error"
                    );
                }
                WebhookDisposition::Completed
            } else {
                tracing::info!(
                    request_id = %request_id,
                    file_id = %file.id(),
                    "File completed by a concurrent delivery"
                );
                WebhookDisposition::AlreadyComplete
            }
        };

        let (images_stored, images_failed) = match result.images {
            Some(images) if !images.is_empty() => {
                let missing = self.missing_images(file.id(), images).await?;
                self.store_images(case_study.user_id(), file.id(), missing)
                    .await
            }
            _ => (0, 0),
        };

        tracing::info!(
            request_id = %request_id,
            file_id = %file.id(),
            images_stored,
            images_failed,
            "Extraction webhook processed"
        );

        Ok(ExtractionWebhookResponse {
            file_id: file.id(),
            disposition,
            images_stored,
            images_failed,
        })
    }

    /// Drops images already recorded for the file, so a replay only uploads
    /// what an earlier delivery lost.
    async fn missing_images(
        &self,
        file_id: Uuid,
        images: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Vec<(String, String)>, HandleExtractionWebhookError> {
        let recorded: HashSet<String> = self
            .image_repository
            .find_by_file_ids(&[file_id])
            .await?
            .into_iter()
            .map(|image| image.file_name().to_string())
            .collect();

        Ok(images
            .into_iter()
            .filter(|(name, _)| !recorded.contains(name))
            .collect())
    }

    async fn store_images(
        &self,
        user_id: &str,
        file_id: Uuid,
        images: impl IntoIterator<Item = (String, String)>,
    ) -> (usize, usize) {
        let outcomes = settle_all(
            images
                .into_iter()
                .map(|(name, encoded)| self.store_image(user_id, file_id, name, encoded)),
        )
        .await;

        let mut stored = 0;
        let mut failed = 0;
        for outcome in outcomes {
            match outcome.into_result() {
                Ok(()) => stored += 1,
                Err(error) => {
                    tracing::warn!(file_id = %file_id, error = %error, "Image skipped");
                    failed += 1;
                }
            }
        }
        (stored, failed)
    }

    async fn store_image(
        &self,
        user_id: &str,
        file_id: Uuid,
        file_name: String,
        encoded: String,
    ) -> Result<(), ImageStoreError> {
        let data = decode_image(&encoded).map_err(|source| ImageStoreError::Decode {
            file_name: file_name.clone(),
            source,
        })?;
        let path = storage_path(user_id, file_id, &file_name);

        let stored = self
            .object_storage
            .upload(&path, data, image_content_type(&file_name))
            .await?;

        let image = CaseStudyImage::new(file_id, file_name, stored.path, stored.public_url);
        if !self.image_repository.insert_if_absent(&image).await? {
            tracing::debug!(file_id = %file_id, file_name = %image.file_name(), "Image already recorded");
        }
        Ok(())
    }
}

fn required(
    value: Option<String>,
    field: &'static str,
) -> Result<String, HandleExtractionWebhookError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(HandleExtractionWebhookError::MissingField(field))
}

fn outcome_from_result(result: &ExtractionResult) -> ExtractionOutcome {
    let mut metadata = result
        .metadata
        .clone()
        .map(FileMetadata::from_value)
        .unwrap_or_default();
    if let Some(page_count) = result.page_count {
        metadata.set_page_count(page_count);
    }

    ExtractionOutcome {
        markdown: result.markdown.clone(),
        metadata: (!metadata.is_empty()).then_some(metadata),
        error: result.error_message(),
    }
}

/// Accepts bare base64 or a `data:<mime>;base64,` URI.
fn decode_image(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded,
    };
    STANDARD.decode(payload.trim())
}

/// Object path for an extracted image. Names that had to be rewritten get a
/// short digest of the original name so distinct images never share a path.
fn storage_path(user_id: &str, file_id: Uuid, file_name: &str) -> String {
    let sanitized = UNSAFE_PATH_CHARS.replace_all(file_name, "_");
    let sanitized = sanitized.trim_start_matches('.');

    let object_name = if sanitized == file_name {
        sanitized.to_string()
    } else {
        let digest = Sha256::digest(file_name.as_bytes());
        let tag: String = digest[..4].iter().map(|b| format!("{:02x}", b)).collect();
        match sanitized.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
                format!("{}-{}.{}", stem, tag, ext)
            }
            _ if sanitized.is_empty() => format!("image-{}", tag),
            _ => format!("{}-{}", sanitized, tag),
        }
    };

    format!(
        "{}/{}/{}",
        UNSAFE_PATH_CHARS.replace_all(user_id, "_"),
        file_id,
        object_name
    )
}

fn image_content_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeExtractor, FakeStorage, InMemoryStore};
    use std::collections::BTreeMap;
    use std::sync::atomic::Ordering;

    const SECRET: &str = "whsec_test";

    struct Harness {
        store: Arc<InMemoryStore>,
        extractor: Arc<FakeExtractor>,
        storage: Arc<FakeStorage>,
        use_case: HandleExtractionWebhookUseCase,
    }

    fn harness(result: ExtractionResult) -> Harness {
        let store = InMemoryStore::new();
        let extractor = Arc::new(FakeExtractor::with_result(result));
        let storage = Arc::new(FakeStorage::default());
        let use_case = HandleExtractionWebhookUseCase::new(
            WebhookSecret::new(SECRET).unwrap(),
            store.clone(),
            store.clone(),
            store.clone(),
            extractor.clone(),
            storage.clone(),
        );
        Harness {
            store,
            extractor,
            storage,
            use_case,
        }
    }

    fn completed_result(images: &[&str]) -> ExtractionResult {
        let images: BTreeMap<String, String> = images
            .iter()
            .map(|name| (name.to_string(), STANDARD.encode(b"\x89PNG fake")))
            .collect();
        ExtractionResult {
            output_format: Some("markdown".to_string()),
            markdown: Some("# Acme\n\nWe shipped.".to_string()),
            status: Some("complete".to_string()),
            success: Some(true),
            images: Some(images),
            metadata: Some(serde_json::json!({"languages": ["English"]})),
            error: None,
            page_count: Some(3),
        }
    }

    fn webhook(request_id: &str) -> ExtractionWebhookRequest {
        ExtractionWebhookRequest {
            request_id: Some(request_id.to_string()),
            request_check_url: Some(format!("https://extract.example.com/check/{request_id}")),
            webhook_secret: Some(SECRET.to_string()),
        }
    }

    #[tokio::test]
    async fn test_completes_file_and_stores_images() {
        let h = harness(completed_result(&["_page_0_Picture_1.png", "diagram.jpeg"]));
        let case_study = h.store.seed_case_study("user_1", "Acme");
        let file = h.store.seed_file(case_study.id(), "req-1");

        let response = h.use_case.execute(webhook("req-1")).await.unwrap();

        assert_eq!(response.disposition, WebhookDisposition::Completed);
        assert_eq!(response.file_id, file.id());
        assert_eq!(response.images_stored, 2);
        assert_eq!(response.images_failed, 0);

        let stored = h.store.files_snapshot().remove(0);
        assert!(stored.status().is_complete());
        assert_eq!(stored.markdown(), Some("# Acme\n\nWe shipped."));
        assert_eq!(stored.metadata().and_then(|m| m.page_count()), Some(3));
        assert!(!stored.is_failed());

        let uploaded = h.storage.uploaded.lock().unwrap();
        assert!(uploaded.contains(&format!("user_1/{}/_page_0_Picture_1.png", file.id())));
    }

    #[tokio::test]
    async fn test_one_failed_upload_persists_the_other_image() {
        let h = harness(completed_result(&["good.png", "fail.png"]));
        let case_study = h.store.seed_case_study("user_1", "Acme");
        h.store.seed_file(case_study.id(), "req-1");

        let response = h.use_case.execute(webhook("req-1")).await.unwrap();

        assert_eq!(response.images_stored, 1);
        assert_eq!(response.images_failed, 1);
        assert_eq!(h.store.image_count(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_image_is_skipped() {
        let mut result = completed_result(&["good.png"]);
        if let Some(images) = result.images.as_mut() {
            images.insert("broken.png".to_string(), "%%not base64%%".to_string());
        }
        let h = harness(result);
        let case_study = h.store.seed_case_study("user_1", "Acme");
        h.store.seed_file(case_study.id(), "req-1");

        let response = h.use_case.execute(webhook("req-1")).await.unwrap();
        assert_eq!(response.images_stored, 1);
        assert_eq!(response.images_failed, 1);
    }

    #[tokio::test]
    async fn test_replay_is_a_no_op() {
        let h = harness(completed_result(&["a.png", "b.png"]));
        let case_study = h.store.seed_case_study("user_1", "Acme");
        h.store.seed_file(case_study.id(), "req-1");

        h.use_case.execute(webhook("req-1")).await.unwrap();
        let first = h.store.files_snapshot();
        let uploads = h.storage.uploaded.lock().unwrap().len();

        let replay = h.use_case.execute(webhook("req-1")).await.unwrap();

        assert_eq!(replay.disposition, WebhookDisposition::AlreadyComplete);
        assert_eq!(replay.images_stored, 0);
        assert_eq!(h.store.image_count(), 2);
        assert_eq!(h.store.files_snapshot(), first);
        assert_eq!(h.storage.uploaded.lock().unwrap().len(), uploads);
    }

    #[tokio::test]
    async fn test_replay_stores_images_lost_by_first_delivery() {
        let h = harness(completed_result(&["a.png", "b.png"]));
        let case_study = h.store.seed_case_study("user_1", "Acme");
        h.store.seed_file(case_study.id(), "req-1");

        h.storage.offline.store(true, Ordering::SeqCst);
        let first = h.use_case.execute(webhook("req-1")).await.unwrap();
        assert_eq!(first.disposition, WebhookDisposition::Completed);
        assert_eq!(first.images_failed, 2);
        assert!(h.store.files_snapshot()[0].status().is_complete());
        assert_eq!(h.store.image_count(), 0);

        h.storage.offline.store(false, Ordering::SeqCst);
        let replay = h.use_case.execute(webhook("req-1")).await.unwrap();

        assert_eq!(replay.disposition, WebhookDisposition::AlreadyComplete);
        assert_eq!(replay.images_stored, 2);
        assert_eq!(h.store.image_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_case_study_commits_nothing() {
        let h = harness(completed_result(&["a.png"]));
        let orphan = h.store.seed_file(Uuid::new_v4(), "req-1");

        let result = h.use_case.execute(webhook("req-1")).await;

        assert!(matches!(
            result,
            Err(HandleExtractionWebhookError::CaseStudyNotFound(id)) if id == orphan.id()
        ));
        assert!(h.store.files_snapshot()[0].is_processing());
        assert_eq!(h.store.image_count(), 0);
        assert_eq!(h.extractor.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_secret_mismatch_mutates_nothing() {
        let h = harness(completed_result(&["a.png"]));
        let case_study = h.store.seed_case_study("user_1", "Acme");
        h.store.seed_file(case_study.id(), "req-1");

        for secret in [None, Some("wrong".to_string())] {
            let mut request = webhook("req-1");
            request.webhook_secret = secret;
            let result = h.use_case.execute(request).await;
            assert!(matches!(result, Err(HandleExtractionWebhookError::Unauthorized)));
        }

        assert!(h.store.files_snapshot()[0].is_processing());
        assert_eq!(h.extractor.fetch_count(), 0);
        assert_eq!(h.store.image_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected() {
        let h = harness(ExtractionResult::default());

        let mut request = webhook("req-1");
        request.request_id = Some("  ".to_string());
        assert!(matches!(
            h.use_case.execute(request).await,
            Err(HandleExtractionWebhookError::MissingField("request_id"))
        ));

        let mut request = webhook("req-1");
        request.request_check_url = None;
        assert!(matches!(
            h.use_case.execute(request).await,
            Err(HandleExtractionWebhookError::MissingField("request_check_url"))
        ));
    }

    #[tokio::test]
    async fn test_unknown_request_id() {
        let h = harness(completed_result(&[]));
        let result = h.use_case.execute(webhook("req-missing")).await;
        assert!(matches!(
            result,
            Err(HandleExtractionWebhookError::FileNotFound(id)) if id == "req-missing"
        ));
    }

    #[tokio::test]
    async fn test_pending_result_leaves_file_processing() {
        let h = harness(ExtractionResult {
            status: Some("processing".to_string()),
            ..Default::default()
        });
        let case_study = h.store.seed_case_study("user_1", "Acme");
        h.store.seed_file(case_study.id(), "req-1");

        let response = h.use_case.execute(webhook("req-1")).await.unwrap();
        assert_eq!(response.disposition, WebhookDisposition::StillProcessing);
        assert!(h.store.files_snapshot()[0].is_processing());
    }

    #[tokio::test]
    async fn test_failed_extraction_completes_with_error() {
        let h = harness(ExtractionResult {
            status: Some("complete".to_string()),
            success: Some(false),
            ..Default::default()
        });
        let case_study = h.store.seed_case_study("user_1", "Acme");
        h.store.seed_file(case_study.id(), "req-1");

        h.use_case.execute(webhook("req-1")).await.unwrap();

        let file = h.store.files_snapshot().remove(0);
        assert!(file.status().is_complete());
        assert!(file.is_failed());
    }

    #[tokio::test]
    async fn test_extractor_failure_leaves_file_processing() {
        let h = harness(ExtractionResult::default());
        *h.extractor.result.lock().unwrap() = Err("502 Bad Gateway".to_string());
        let case_study = h.store.seed_case_study("user_1", "Acme");
        h.store.seed_file(case_study.id(), "req-1");

        let result = h.use_case.execute(webhook("req-1")).await;
        assert!(matches!(result, Err(HandleExtractionWebhookError::ExtractorError(_))));
        assert!(h.store.files_snapshot()[0].is_processing());
    }

    #[test]
    fn test_storage_path_is_sanitized() {
        let file_id = Uuid::nil();
        let prefix = format!("user_1/{}/", file_id);

        assert_eq!(
            storage_path("user_1", file_id, "figure_1.png"),
            format!("{prefix}figure_1.png")
        );

        let rewritten = storage_path("user_1", file_id, "../etc/pass wd.png");
        let object = rewritten.strip_prefix(&prefix).unwrap();
        assert!(object.starts_with("_etc_pass_wd-"));
        assert!(object.ends_with(".png"));
        assert!(!object.contains('/'));

        let dots = storage_path("user_1", file_id, "...");
        assert!(dots.strip_prefix(&prefix).unwrap().starts_with("image-"));
    }

    #[test]
    fn test_rewritten_names_do_not_collide() {
        let file_id = Uuid::nil();
        let spaced = storage_path("user_1", file_id, "a b.png");
        let underscored = storage_path("user_1", file_id, "a_b.png");

        assert_ne!(spaced, underscored);
        assert_eq!(underscored, format!("user_1/{}/a_b.png", file_id));
        assert_eq!(spaced, storage_path("user_1", file_id, "a b.png"));
    }

    #[test]
    fn test_decode_image_accepts_data_uri() {
        let encoded = STANDARD.encode(b"png");
        assert_eq!(decode_image(&encoded).unwrap(), b"png");
        assert_eq!(
            decode_image(&format!("data:image/png;base64,{encoded}")).unwrap(),
            b"png"
        );
    }

    #[test]
    fn test_image_content_type() {
        assert_eq!(image_content_type("a.JPEG"), "image/jpeg");
        assert_eq!(image_content_type("a.png"), "image/png");
        assert_eq!(image_content_type("noext"), "application/octet-stream");
    }
}
