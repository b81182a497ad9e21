pub mod case_study_file_model;
pub mod case_study_model;
pub mod image_model;
pub mod summary_model;
pub mod user_model;

pub use case_study_file_model::*;
pub use case_study_model::*;
pub use image_model::*;
pub use summary_model::*;
pub use user_model::*;
