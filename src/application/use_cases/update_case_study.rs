use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::get_case_study::find_owned;
use crate::domain::entities::{CaseStudy, CaseStudyChanges};
use crate::domain::repositories::{CaseStudyRepository, RepositoryError};

#[derive(Debug, Error)]
pub enum UpdateCaseStudyError {
    #[error("Case study not found: {0}")]
    NotFound(Uuid),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct UpdateCaseStudyUseCase {
    case_study_repository: Arc<dyn CaseStudyRepository>,
}

impl UpdateCaseStudyUseCase {
    pub fn new(case_study_repository: Arc<dyn CaseStudyRepository>) -> Self {
        Self {
            case_study_repository,
        }
    }

    pub async fn execute(
        &self,
        user_id: &str,
        case_study_id: Uuid,
        changes: CaseStudyChanges,
    ) -> Result<CaseStudy, UpdateCaseStudyError> {
        let mut case_study =
            find_owned(self.case_study_repository.as_ref(), user_id, case_study_id)
                .await?
                .ok_or(UpdateCaseStudyError::NotFound(case_study_id))?;

        case_study
            .apply(changes)
            .map_err(UpdateCaseStudyError::ValidationError)?;
        self.case_study_repository.update(&case_study).await?;

        tracing::info!(case_study_id = %case_study_id, "Case study updated");
        Ok(case_study)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryStore;

    #[tokio::test]
    async fn test_updates_and_clears_fields() {
        let store = InMemoryStore::new();
        let case_study = store.seed_case_study("user_1", "Draft");
        let use_case = UpdateCaseStudyUseCase::new(store.clone());

        let updated = use_case
            .execute(
                "user_1",
                case_study.id(),
                CaseStudyChanges {
                    title: Some("Final".to_string()),
                    industry: Some(Some("Retail".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title(), "Final");
        assert_eq!(updated.industry(), Some("Retail"));

        let cleared = use_case
            .execute(
                "user_1",
                case_study.id(),
                CaseStudyChanges {
                    industry: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.industry(), None);
        assert_eq!(cleared.title(), "Final");
    }

    #[tokio::test]
    async fn test_rejects_blank_title_and_foreign_owner() {
        let store = InMemoryStore::new();
        let case_study = store.seed_case_study("user_1", "Draft");
        let use_case = UpdateCaseStudyUseCase::new(store.clone());

        let blank = use_case
            .execute(
                "user_1",
                case_study.id(),
                CaseStudyChanges {
                    title: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(blank, Err(UpdateCaseStudyError::ValidationError(_))));

        let foreign = use_case
            .execute("user_2", case_study.id(), CaseStudyChanges::default())
            .await;
        assert!(matches!(foreign, Err(UpdateCaseStudyError::NotFound(_))));
    }
}
