use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::get_case_study::find_owned;
use crate::application::ports::ObjectStorage;
use crate::domain::repositories::{
    CaseStudyRepository, FileRepository, ImageRepository, RepositoryError,
};

#[derive(Debug, Error)]
pub enum DeleteCaseStudyError {
    #[error("Case study not found: {0}")]
    NotFound(Uuid),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

#[derive(Debug, Clone)]
pub struct DeleteCaseStudyResponse {
    pub case_study_id: Uuid,
    pub images_removed: usize,
}

pub struct DeleteCaseStudyUseCase {
    case_study_repository: Arc<dyn CaseStudyRepository>,
    file_repository: Arc<dyn FileRepository>,
    image_repository: Arc<dyn ImageRepository>,
    object_storage: Arc<dyn ObjectStorage>,
}

impl DeleteCaseStudyUseCase {
    pub fn new(
        case_study_repository: Arc<dyn CaseStudyRepository>,
        file_repository: Arc<dyn FileRepository>,
        image_repository: Arc<dyn ImageRepository>,
        object_storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            case_study_repository,
            file_repository,
            image_repository,
            object_storage,
        }
    }

    pub async fn execute(
        &self,
        user_id: &str,
        case_study_id: Uuid,
    ) -> Result<DeleteCaseStudyResponse, DeleteCaseStudyError> {
        find_owned(self.case_study_repository.as_ref(), user_id, case_study_id)
            .await?
            .ok_or(DeleteCaseStudyError::NotFound(case_study_id))?;

        // Collect object paths before the rows cascade away
        let file_ids: Vec<Uuid> = self
            .file_repository
            .find_by_case_study(case_study_id)
            .await?
            .iter()
            .map(|f| f.id())
            .collect();
        let paths: Vec<String> = if file_ids.is_empty() {
            Vec::new()
        } else {
            self.image_repository
                .find_by_file_ids(&file_ids)
                .await?
                .iter()
                .map(|i| i.storage_path().to_string())
                .collect()
        };

        if !self.case_study_repository.delete(case_study_id).await? {
            return Err(DeleteCaseStudyError::NotFound(case_study_id));
        }

        let mut images_removed = 0;
        if !paths.is_empty() {
            match self.object_storage.remove(&paths).await {
                Ok(()) => images_removed = paths.len(),
                Err(e) => tracing::warn!(
                    case_study_id = %case_study_id,
                    error = %e,
                    "Could not remove stored images"
                ),
            }
        }

        tracing::info!(case_study_id = %case_study_id, images_removed, "Case study deleted");
        Ok(DeleteCaseStudyResponse {
            case_study_id,
            images_removed,
        })
    }
}
