use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{CaseStudy, CaseStudyFile, CaseStudyImage, CaseStudySummary};
use crate::domain::repositories::{
    CaseStudyRepository, FileRepository, ImageRepository, RepositoryError, SummaryRepository,
};

#[derive(Debug, Error)]
pub enum GetCaseStudyError {
    #[error("Case study not found: {0}")]
    NotFound(Uuid),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileView {
    pub file: CaseStudyFile,
    pub images: Vec<CaseStudyImage>,
}

/// A case study with everything hanging off it, as the editor shows it.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseStudyDetail {
    pub case_study: CaseStudy,
    pub files: Vec<FileView>,
    /// Newest first.
    pub summaries: Vec<CaseStudySummary>,
}

impl CaseStudyDetail {
    pub fn is_processing(&self) -> bool {
        self.files.iter().any(|view| view.file.is_processing())
    }
}

/// Loads a case study only if `user_id` owns it. Someone else's case study is
/// reported exactly like a missing one.
pub(crate) async fn find_owned(
    repository: &dyn CaseStudyRepository,
    user_id: &str,
    case_study_id: Uuid,
) -> Result<Option<CaseStudy>, RepositoryError> {
    Ok(repository
        .find_by_id(case_study_id)
        .await?
        .filter(|case_study| case_study.is_owned_by(user_id)))
}

pub struct GetCaseStudyUseCase {
    case_study_repository: Arc<dyn CaseStudyRepository>,
    file_repository: Arc<dyn FileRepository>,
    image_repository: Arc<dyn ImageRepository>,
    summary_repository: Arc<dyn SummaryRepository>,
}

impl GetCaseStudyUseCase {
    pub fn new(
        case_study_repository: Arc<dyn CaseStudyRepository>,
        file_repository: Arc<dyn FileRepository>,
        image_repository: Arc<dyn ImageRepository>,
        summary_repository: Arc<dyn SummaryRepository>,
    ) -> Self {
        Self {
            case_study_repository,
            file_repository,
            image_repository,
            summary_repository,
        }
    }

    pub async fn execute(
        &self,
        user_id: &str,
        case_study_id: Uuid,
    ) -> Result<CaseStudyDetail, GetCaseStudyError> {
        let case_study = find_owned(self.case_study_repository.as_ref(), user_id, case_study_id)
            .await?
            .ok_or(GetCaseStudyError::NotFound(case_study_id))?;

        let files = self.file_repository.find_by_case_study(case_study_id).await?;
        let file_ids: Vec<Uuid> = files.iter().map(|f| f.id()).collect();
        let mut images = if file_ids.is_empty() {
            Vec::new()
        } else {
            self.image_repository.find_by_file_ids(&file_ids).await?
        };

        let files = files
            .into_iter()
            .map(|file| {
                let (own, rest): (Vec<_>, Vec<_>) = images
                    .drain(..)
                    .partition(|image| image.file_id() == file.id());
                images = rest;
                FileView { file, images: own }
            })
            .collect();

        let summaries = self
            .summary_repository
            .find_by_case_study(case_study_id)
            .await?;

        Ok(CaseStudyDetail {
            case_study,
            files,
            summaries,
        })
    }
}
