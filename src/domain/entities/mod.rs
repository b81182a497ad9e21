pub mod case_study;
pub mod case_study_file;
pub mod case_study_image;
pub mod case_study_summary;
pub mod user;

pub use case_study::{CaseStudy, CaseStudyChanges};
pub use case_study_file::{CaseStudyFile, ExtractionOutcome};
pub use case_study_image::CaseStudyImage;
pub use case_study_summary::CaseStudySummary;
pub use user::User;
