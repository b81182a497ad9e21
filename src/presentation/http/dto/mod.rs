pub mod case_study_dto;
pub mod export_dto;
pub mod response_dto;
pub mod webhook_dto;

pub use case_study_dto::*;
pub use export_dto::*;
pub use response_dto::*;
pub use webhook_dto::*;
