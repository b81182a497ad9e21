use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{FileMetadata, ProcessingStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStudyFile {
    id: Uuid,
    case_study_id: Uuid,
    request_id: String,
    file_url: String,
    markdown: Option<String>,
    metadata: Option<FileMetadata>,
    status: ProcessingStatus,
    error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Outcome of an extraction job as applied to a file.
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    pub markdown: Option<String>,
    pub metadata: Option<FileMetadata>,
    pub error: Option<String>,
}

impl CaseStudyFile {
    pub fn new(
        case_study_id: Uuid,
        request_id: String,
        file_url: String,
        metadata: Option<FileMetadata>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            case_study_id,
            request_id,
            file_url,
            markdown: None,
            metadata,
            status: ProcessingStatus::Processing,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        case_study_id: Uuid,
        request_id: String,
        file_url: String,
        markdown: Option<String>,
        metadata: Option<FileMetadata>,
        status: ProcessingStatus,
        error: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            case_study_id,
            request_id,
            file_url,
            markdown,
            metadata,
            status,
            error,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn case_study_id(&self) -> Uuid {
        self.case_study_id
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn file_url(&self) -> &str {
        &self.file_url
    }

    pub fn markdown(&self) -> Option<&str> {
        self.markdown.as_deref()
    }

    pub fn metadata(&self) -> Option<&FileMetadata> {
        self.metadata.as_ref()
    }

    pub fn status(&self) -> ProcessingStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_processing(&self) -> bool {
        self.status.is_processing()
    }

    /// Complete, but the extractor reported an error.
    pub fn is_failed(&self) -> bool {
        self.status.is_complete() && self.error.is_some()
    }

    /// Applies the extractor's result. Only a processing file may complete;
    /// a complete file is never rewritten.
    pub fn complete(&mut self, outcome: ExtractionOutcome) -> Result<(), String> {
        if !self.status.can_transition_to(&ProcessingStatus::Complete) {
            return Err(format!(
                "File {} is already {}",
                self.id, self.status
            ));
        }

        self.status = ProcessingStatus::Complete;
        self.markdown = outcome.markdown;
        self.metadata = outcome.metadata;
        self.error = outcome.error;
        self.updated_at = Utc::now();
        Ok(())
    }
}
