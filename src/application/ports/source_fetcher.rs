use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceFetchError {
    #[error("Invalid source URL: {0}")]
    InvalidUrl(String),
    #[error("Download failed for {url}: {reason}")]
    DownloadFailed { url: String, reason: String },
    #[error("Downloaded file is empty: {0}")]
    EmptyFile(String),
}

/// A document downloaded from its external host, ready for submission.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<SourceDocument, SourceFetchError>;
}
