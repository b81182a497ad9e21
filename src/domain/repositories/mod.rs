pub mod case_study_repository;
pub mod error;
pub mod file_repository;
pub mod image_repository;
pub mod summary_repository;
pub mod user_repository;

pub use case_study_repository::CaseStudyRepository;
pub use error::RepositoryError;
pub use file_repository::{FileRepository, FileStatusCounts};
pub use image_repository::ImageRepository;
pub use summary_repository::SummaryRepository;
pub use user_repository::UserRepository;
