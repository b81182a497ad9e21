pub mod postgres_case_study_repository;
pub mod postgres_file_repository;
pub mod postgres_image_repository;
pub mod postgres_summary_repository;
pub mod postgres_user_repository;

pub use postgres_case_study_repository::PostgresCaseStudyRepository;
pub use postgres_file_repository::PostgresFileRepository;
pub use postgres_image_repository::PostgresImageRepository;
pub use postgres_summary_repository::PostgresSummaryRepository;
pub use postgres_user_repository::PostgresUserRepository;
