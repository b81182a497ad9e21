pub mod case_study_routes;
pub mod health_routes;
pub mod webhook_routes;

pub use case_study_routes::*;
pub use health_routes::*;
pub use webhook_routes::*;
