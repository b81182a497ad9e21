use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::CaseStudy;
use crate::domain::repositories::{
    CaseStudyRepository, FileRepository, FileStatusCounts, RepositoryError,
};

#[derive(Debug, Error)]
pub enum ListCaseStudiesError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

#[derive(Debug, Clone)]
pub struct ListCaseStudiesRequest {
    pub user_id: String,
    pub skip: i64,
    pub limit: i64,
}

#[derive(Debug, Clone)]
pub struct CaseStudySummaryRow {
    pub case_study: CaseStudy,
    pub file_counts: FileStatusCounts,
}

#[derive(Debug, Clone)]
pub struct ListCaseStudiesResponse {
    pub case_studies: Vec<CaseStudySummaryRow>,
    pub total_count: i64,
    pub skip: i64,
    pub limit: i64,
}

pub struct ListCaseStudiesUseCase {
    case_study_repository: Arc<dyn CaseStudyRepository>,
    file_repository: Arc<dyn FileRepository>,
}

impl ListCaseStudiesUseCase {
    pub fn new(
        case_study_repository: Arc<dyn CaseStudyRepository>,
        file_repository: Arc<dyn FileRepository>,
    ) -> Self {
        Self {
            case_study_repository,
            file_repository,
        }
    }

    pub async fn execute(
        &self,
        request: ListCaseStudiesRequest,
    ) -> Result<ListCaseStudiesResponse, ListCaseStudiesError> {
        // Validate input
        if request.skip < 0 {
            return Err(ListCaseStudiesError::ValidationError(
                "Skip cannot be negative".to_string(),
            ));
        }

        if request.limit <= 0 || request.limit > 100 {
            return Err(ListCaseStudiesError::ValidationError(
                "Limit must be between 1 and 100".to_string(),
            ));
        }

        let case_studies = self
            .case_study_repository
            .find_by_owner(&request.user_id, request.skip, request.limit)
            .await?;
        let total_count = self
            .case_study_repository
            .count_by_owner(&request.user_id)
            .await?;

        let ids: Vec<Uuid> = case_studies.iter().map(|c| c.id()).collect();
        let mut counts = if ids.is_empty() {
            Default::default()
        } else {
            self.file_repository.status_counts(&ids).await?
        };

        let case_studies = case_studies
            .into_iter()
            .map(|case_study| CaseStudySummaryRow {
                file_counts: counts.remove(&case_study.id()).unwrap_or_default(),
                case_study,
            })
            .collect();

        Ok(ListCaseStudiesResponse {
            case_studies,
            total_count,
            skip: request.skip,
            limit: request.limit,
        })
    }
}
