use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::get_case_study::find_owned;
use crate::application::ports::LanguageModel;
use crate::application::ports::language_model::{GenerationRequest, LanguageModelError};
use crate::domain::entities::CaseStudySummary;
use crate::domain::repositories::{
    CaseStudyRepository, FileRepository, RepositoryError, SummaryRepository,
};

pub const SUMMARY_SYSTEM_PROMPT: &str = "\
You are an expert business writer who turns raw project documents into client case studies.
Using only the facts in the provided content, write a case study in markdown with these sections:

# <A concise, compelling title>
## Challenge
What problem the client faced and why it mattered.
## Approach
How the team analysed the problem and planned the work.
## Solution
What was built or changed, with concrete details.
## Outcomes
Measurable results and business impact. Use numbers from the content when available.
## Executive Summary
Two or three sentences a senior stakeholder can read on their own.
## Key Points
A short bulleted list of the most important takeaways.

Do not invent figures, names or quotes that are not present in the content.";

const DOCUMENT_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Error)]
pub enum SummarizeCaseStudyError {
    #[error("Case study not found: {0}")]
    NotFound(Uuid),
    #[error("Files are still being processed")]
    StillProcessing,
    #[error("No extracted content available to summarize")]
    NoContent,
    #[error("Language model error: {0}")]
    ModelError(#[from] LanguageModelError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct SummarizeCaseStudyUseCase {
    case_study_repository: Arc<dyn CaseStudyRepository>,
    file_repository: Arc<dyn FileRepository>,
    summary_repository: Arc<dyn SummaryRepository>,
    language_model: Arc<dyn LanguageModel>,
}

impl SummarizeCaseStudyUseCase {
    pub fn new(
        case_study_repository: Arc<dyn CaseStudyRepository>,
        file_repository: Arc<dyn FileRepository>,
        summary_repository: Arc<dyn SummaryRepository>,
        language_model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            case_study_repository,
            file_repository,
            summary_repository,
            language_model,
        }
    }

    /// Summarizes extracted markdown and stores the model's text verbatim.
    pub async fn summarize_markdown(
        &self,
        case_study_id: Uuid,
        markdown: &str,
    ) -> Result<CaseStudySummary, SummarizeCaseStudyError> {
        if markdown.trim().is_empty() {
            return Err(SummarizeCaseStudyError::NoContent);
        }

        tracing::info!(
            case_study_id = %case_study_id,
            model = self.language_model.model_name(),
            chars = markdown.len(),
            "Requesting case study summary"
        );

        let text = self
            .language_model
            .generate(GenerationRequest {
                system_prompt: SUMMARY_SYSTEM_PROMPT.to_string(),
                content: markdown.to_string(),
            })
            .await?;

        let summary = CaseStudySummary::new(case_study_id, text);
        self.summary_repository.save(&summary).await?;
        Ok(summary)
    }

    /// Summarizes everything extracted so far for a case study the caller owns.
    pub async fn execute(
        &self,
        user_id: &str,
        case_study_id: Uuid,
    ) -> Result<CaseStudySummary, SummarizeCaseStudyError> {
        find_owned(self.case_study_repository.as_ref(), user_id, case_study_id)
            .await?
            .ok_or(SummarizeCaseStudyError::NotFound(case_study_id))?;

        let files = self.file_repository.find_by_case_study(case_study_id).await?;
        if files.iter().any(|f| f.is_processing()) {
            return Err(SummarizeCaseStudyError::StillProcessing);
        }

        let documents: Vec<&str> = files
            .iter()
            .filter(|f| !f.is_failed())
            .filter_map(|f| f.markdown())
            .filter(|markdown| !markdown.trim().is_empty())
            .collect();
        if documents.is_empty() {
            return Err(SummarizeCaseStudyError::NoContent);
        }

        self.summarize_markdown(case_study_id, &documents.join(DOCUMENT_SEPARATOR))
            .await
    }
}
