use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::CaseStudy;
use crate::domain::repositories::RepositoryError;

#[async_trait]
pub trait CaseStudyRepository: Send + Sync {
    async fn save(&self, case_study: &CaseStudy) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CaseStudy>, RepositoryError>;
    async fn find_by_owner(
        &self,
        user_id: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<CaseStudy>, RepositoryError>;
    async fn count_by_owner(&self, user_id: &str) -> Result<i64, RepositoryError>;
    async fn update(&self, case_study: &CaseStudy) -> Result<(), RepositoryError>;
    /// Deleting cascades to files, images and summaries.
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
}
