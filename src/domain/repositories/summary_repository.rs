use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::CaseStudySummary;
use crate::domain::repositories::RepositoryError;

#[async_trait]
pub trait SummaryRepository: Send + Sync {
    async fn save(&self, summary: &CaseStudySummary) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CaseStudySummary>, RepositoryError>;
    /// Newest first.
    async fn find_by_case_study(
        &self,
        case_study_id: Uuid,
    ) -> Result<Vec<CaseStudySummary>, RepositoryError>;
    async fn update(&self, summary: &CaseStudySummary) -> Result<(), RepositoryError>;
}
