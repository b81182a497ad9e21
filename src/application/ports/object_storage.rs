use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStorageError {
    #[error("Invalid object path: {0}")]
    InvalidPath(String),
    #[error("Upload failed for {path}: {reason}")]
    UploadFailed { path: String, reason: String },
    #[error("Delete failed: {0}")]
    DeleteFailed(String),
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub path: String,
    pub public_url: String,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, ObjectStorageError>;

    async fn remove(&self, paths: &[String]) -> Result<(), ObjectStorageError>;
}
