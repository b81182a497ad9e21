use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::application::ports::document_extractor::{DocumentExtractionError, ExtractionOptions};
use crate::application::ports::source_fetcher::SourceFetchError;
use crate::application::ports::{DocumentExtractor, SourceFetcher};
use crate::application::services::{Settled, settle_all};
use crate::domain::entities::{CaseStudy, CaseStudyFile, User};
use crate::domain::repositories::{
    CaseStudyRepository, FileRepository, RepositoryError, UserRepository,
};
use crate::domain::value_objects::{FileHash, FileMetadata};

#[derive(Debug, Error)]
pub enum CreateCaseStudyError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Why one file of a new case study could not be submitted. Never fatal for
/// the case study itself.
#[derive(Debug, Error)]
pub enum FileIngestError {
    #[error(transparent)]
    Fetch(#[from] SourceFetchError),
    #[error(transparent)]
    Submit(#[from] DocumentExtractionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Identity claims of the caller, as carried by the session token.
#[derive(Debug, Clone)]
pub struct CaseStudyOwner {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateCaseStudyRequest {
    pub owner: CaseStudyOwner,
    pub title: String,
    pub client_name: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub file_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileSubmissionOutcome {
    Submitted {
        file_url: String,
        file_id: Uuid,
        request_id: String,
    },
    Failed {
        file_url: String,
        error: String,
    },
}

impl FileSubmissionOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, FileSubmissionOutcome::Submitted { .. })
    }
}

#[derive(Debug, Clone)]
pub struct CreateCaseStudyResponse {
    pub case_study: CaseStudy,
    pub files: Vec<FileSubmissionOutcome>,
}

pub struct CreateCaseStudyUseCase {
    user_repository: Arc<dyn UserRepository>,
    case_study_repository: Arc<dyn CaseStudyRepository>,
    file_repository: Arc<dyn FileRepository>,
    source_fetcher: Arc<dyn SourceFetcher>,
    document_extractor: Arc<dyn DocumentExtractor>,
}

impl CreateCaseStudyUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        case_study_repository: Arc<dyn CaseStudyRepository>,
        file_repository: Arc<dyn FileRepository>,
        source_fetcher: Arc<dyn SourceFetcher>,
        document_extractor: Arc<dyn DocumentExtractor>,
    ) -> Self {
        Self {
            user_repository,
            case_study_repository,
            file_repository,
            source_fetcher,
            document_extractor,
        }
    }

    pub async fn execute(
        &self,
        request: CreateCaseStudyRequest,
    ) -> Result<CreateCaseStudyResponse, CreateCaseStudyError> {
        // Validate input before touching the database
        let case_study = CaseStudy::new(
            request.owner.user_id.clone(),
            request.title,
            request.client_name,
            request.industry,
            request.description,
        )
        .map_err(CreateCaseStudyError::ValidationError)?;

        for file_url in &request.file_urls {
            validate_source_url(file_url)?;
        }

        let owner = User::new(request.owner.user_id, request.owner.name, request.owner.email);
        self.user_repository.upsert(&owner).await?;
        self.case_study_repository.save(&case_study).await?;

        tracing::info!(
            case_study_id = %case_study.id(),
            files = request.file_urls.len(),
            "Case study created, submitting files for extraction"
        );

        let options = ExtractionOptions::default();
        let outcomes = settle_all(
            request
                .file_urls
                .iter()
                .map(|file_url| self.ingest_file(case_study.id(), file_url, &options)),
        )
        .await;

        let files = request
            .file_urls
            .into_iter()
            .zip(outcomes)
            .map(|(file_url, outcome)| match outcome {
                Settled::Fulfilled(file) => FileSubmissionOutcome::Submitted {
                    file_url,
                    file_id: file.id(),
                    request_id: file.request_id().to_string(),
                },
                Settled::Rejected(error) => {
                    tracing::warn!(
                        case_study_id = %case_study.id(),
                        file_url = %file_url,
                        error = %error,
                        "File submission failed"
                    );
                    FileSubmissionOutcome::Failed {
                        file_url,
                        error: error.to_string(),
                    }
                }
            })
            .collect();

        Ok(CreateCaseStudyResponse { case_study, files })
    }

    async fn ingest_file(
        &self,
        case_study_id: Uuid,
        file_url: &str,
        options: &ExtractionOptions,
    ) -> Result<CaseStudyFile, FileIngestError> {
        let document = self.source_fetcher.fetch(file_url).await?;

        let file_hash = FileHash::from_bytes(&document.data);
        let content_type = document.content_type.clone();

        let submission = self.document_extractor.submit(document, options).await?;

        let mut metadata = FileMetadata::from_value(submission.raw);
        metadata.set_source_hash(&file_hash);
        if let Some(content_type) = content_type {
            metadata.set_property("content_type", serde_json::Value::String(content_type));
        }

        let file = CaseStudyFile::new(
            case_study_id,
            submission.request_id,
            file_url.to_string(),
            Some(metadata),
        );
        self.file_repository.save(&file).await?;

        tracing::debug!(
            case_study_id = %case_study_id,
            request_id = %file.request_id(),
            "File submitted"
        );
        Ok(file)
    }
}

fn validate_source_url(file_url: &str) -> Result<(), CreateCaseStudyError> {
    let parsed = Url::parse(file_url).map_err(|e| {
        CreateCaseStudyError::ValidationError(format!("Invalid file URL '{}': {}", file_url, e))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(CreateCaseStudyError::ValidationError(format!(
            "Unsupported URL scheme '{}' in {}",
            scheme, file_url
        ))),
    }
}
