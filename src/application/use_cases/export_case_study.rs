use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::get_case_study::find_owned;
use crate::application::services::SlideDeck;
use crate::domain::repositories::{CaseStudyRepository, RepositoryError, SummaryRepository};

#[derive(Debug, Error)]
pub enum ExportCaseStudyError {
    #[error("Case study not found: {0}")]
    NotFound(Uuid),
    #[error("Case study {0} has no summary to export")]
    NoSummary(Uuid),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct ExportCaseStudyUseCase {
    case_study_repository: Arc<dyn CaseStudyRepository>,
    summary_repository: Arc<dyn SummaryRepository>,
}

impl ExportCaseStudyUseCase {
    pub fn new(
        case_study_repository: Arc<dyn CaseStudyRepository>,
        summary_repository: Arc<dyn SummaryRepository>,
    ) -> Self {
        Self {
            case_study_repository,
            summary_repository,
        }
    }

    /// Builds a slide deck from the most recent summary.
    pub async fn execute(
        &self,
        user_id: &str,
        case_study_id: Uuid,
    ) -> Result<SlideDeck, ExportCaseStudyError> {
        let case_study = find_owned(self.case_study_repository.as_ref(), user_id, case_study_id)
            .await?
            .ok_or(ExportCaseStudyError::NotFound(case_study_id))?;

        let latest = self
            .summary_repository
            .find_by_case_study(case_study_id)
            .await?
            .into_iter()
            .next()
            .ok_or(ExportCaseStudyError::NoSummary(case_study_id))?;

        Ok(SlideDeck::from_summary(&case_study, latest.summary()))
    }
}
