use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::get_case_study::find_owned;
use crate::domain::entities::CaseStudySummary;
use crate::domain::repositories::{CaseStudyRepository, RepositoryError, SummaryRepository};

#[derive(Debug, Error)]
pub enum UpdateSummaryError {
    #[error("Case study not found: {0}")]
    CaseStudyNotFound(Uuid),
    #[error("Summary not found: {0}")]
    SummaryNotFound(Uuid),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct UpdateSummaryUseCase {
    case_study_repository: Arc<dyn CaseStudyRepository>,
    summary_repository: Arc<dyn SummaryRepository>,
}

impl UpdateSummaryUseCase {
    pub fn new(
        case_study_repository: Arc<dyn CaseStudyRepository>,
        summary_repository: Arc<dyn SummaryRepository>,
    ) -> Self {
        Self {
            case_study_repository,
            summary_repository,
        }
    }

    pub async fn execute(
        &self,
        user_id: &str,
        case_study_id: Uuid,
        summary_id: Uuid,
        text: String,
    ) -> Result<CaseStudySummary, UpdateSummaryError> {
        find_owned(self.case_study_repository.as_ref(), user_id, case_study_id)
            .await?
            .ok_or(UpdateSummaryError::CaseStudyNotFound(case_study_id))?;

        let mut summary = self
            .summary_repository
            .find_by_id(summary_id)
            .await?
            .filter(|summary| summary.case_study_id() == case_study_id)
            .ok_or(UpdateSummaryError::SummaryNotFound(summary_id))?;

        summary
            .edit(text)
            .map_err(UpdateSummaryError::ValidationError)?;
        self.summary_repository.update(&summary).await?;

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryStore;

    #[tokio::test]
    async fn test_edits_summary_of_owned_case_study() {
        let store = InMemoryStore::new();
        let case_study = store.seed_case_study("user_1", "Acme");
        let summary = CaseStudySummary::new(case_study.id(), "# Draft".to_string());
        store.summaries.lock().unwrap().push(summary.clone());

        let updated = UpdateSummaryUseCase::new(store.clone(), store.clone())
            .execute("user_1", case_study.id(), summary.id(), "# Final".to_string())
            .await
            .unwrap();

        assert_eq!(updated.summary(), "# Final");
        assert_eq!(
            store.summaries.lock().unwrap()[0].summary(),
            "# Final"
        );
    }

    #[tokio::test]
    async fn test_summary_of_another_case_study_is_not_found() {
        let store = InMemoryStore::new();
        let mine = store.seed_case_study("user_1", "Mine");
        let other = store.seed_case_study("user_1", "Other");
        let summary = CaseStudySummary::new(other.id(), "# Other".to_string());
        store.summaries.lock().unwrap().push(summary.clone());

        let result = UpdateSummaryUseCase::new(store.clone(), store.clone())
            .execute("user_1", mine.id(), summary.id(), "# Hijack".to_string())
            .await;
        assert!(matches!(result, Err(UpdateSummaryError::SummaryNotFound(_))));
    }
}
