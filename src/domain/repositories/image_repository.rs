use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::CaseStudyImage;
use crate::domain::repositories::RepositoryError;

#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Returns false when an image with the same (file id, file name) exists.
    async fn insert_if_absent(&self, image: &CaseStudyImage) -> Result<bool, RepositoryError>;
    async fn find_by_file_ids(&self, file_ids: &[Uuid])
    -> Result<Vec<CaseStudyImage>, RepositoryError>;
}
