pub mod create_case_study;
pub mod delete_case_study;
pub mod export_case_study;
pub mod get_case_study;
pub mod handle_extraction_webhook;
pub mod list_case_studies;
pub mod summarize_case_study;
pub mod update_case_study;
pub mod update_summary;

pub use create_case_study::{
    CaseStudyOwner, CreateCaseStudyError, CreateCaseStudyRequest, CreateCaseStudyResponse,
    CreateCaseStudyUseCase, FileIngestError, FileSubmissionOutcome,
};
pub use delete_case_study::{DeleteCaseStudyError, DeleteCaseStudyResponse, DeleteCaseStudyUseCase};
pub use export_case_study::{ExportCaseStudyError, ExportCaseStudyUseCase};
pub use get_case_study::{CaseStudyDetail, FileView, GetCaseStudyError, GetCaseStudyUseCase};
pub use handle_extraction_webhook::{
    ExtractionWebhookRequest, ExtractionWebhookResponse, HandleExtractionWebhookError,
    HandleExtractionWebhookUseCase, ImageStoreError, WebhookDisposition,
};
pub use list_case_studies::{
    CaseStudySummaryRow, ListCaseStudiesError, ListCaseStudiesRequest, ListCaseStudiesResponse,
    ListCaseStudiesUseCase,
};
pub use summarize_case_study::{
    SUMMARY_SYSTEM_PROMPT, SummarizeCaseStudyError, SummarizeCaseStudyUseCase,
};
pub use update_case_study::{UpdateCaseStudyError, UpdateCaseStudyUseCase};
pub use update_summary::{UpdateSummaryError, UpdateSummaryUseCase};
