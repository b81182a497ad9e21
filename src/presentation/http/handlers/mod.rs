pub mod case_study_handler;
pub mod webhook_handler;

pub use case_study_handler::CaseStudyHandler;
pub use webhook_handler::WebhookHandler;
