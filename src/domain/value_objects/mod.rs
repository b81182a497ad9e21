pub mod file_hash;
pub mod file_metadata;
pub mod processing_status;
pub mod webhook_secret;

pub use file_hash::FileHash;
pub use file_metadata::FileMetadata;
pub use processing_status::ProcessingStatus;
pub use webhook_secret::WebhookSecret;
