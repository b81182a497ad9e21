use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::entities::CaseStudyFile;
use crate::domain::repositories::RepositoryError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStatusCounts {
    pub processing: i64,
    pub complete: i64,
    pub failed: i64,
}

impl FileStatusCounts {
    pub fn total(&self) -> i64 {
        self.processing + self.complete
    }
}

#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn save(&self, file: &CaseStudyFile) -> Result<(), RepositoryError>;
    async fn find_by_request_id(
        &self,
        request_id: &str,
    ) -> Result<Option<CaseStudyFile>, RepositoryError>;
    /// Oldest first.
    async fn find_by_case_study(
        &self,
        case_study_id: Uuid,
    ) -> Result<Vec<CaseStudyFile>, RepositoryError>;
    /// Persists a completed file only if the stored row is still processing.
    /// Returns whether the row transitioned.
    async fn save_completion(&self, file: &CaseStudyFile) -> Result<bool, RepositoryError>;
    async fn status_counts(
        &self,
        case_study_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, FileStatusCounts>, RepositoryError>;
}
