use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::application::ports::source_fetcher::{SourceDocument, SourceFetchError, SourceFetcher};

const FALLBACK_FILE_NAME: &str = "document";

/// Downloads source documents from wherever the user's uploader put them.
pub struct HttpSourceFetcher {
    client: Client,
}

impl HttpSourceFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self, SourceFetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SourceFetchError::DownloadFailed {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

fn file_name_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            url::form_urlencoded::parse(format!("n={}", segment.replace('+', "%2B")).as_bytes())
                .next()
                .map(|(_, value)| value.into_owned())
                .unwrap_or_else(|| segment.to_string())
        })
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

#[async_trait]
impl SourceFetcher for HttpSourceFetcher {
    async fn fetch(&self, url: &str) -> Result<SourceDocument, SourceFetchError> {
        let parsed = Url::parse(url).map_err(|e| SourceFetchError::InvalidUrl(e.to_string()))?;
        let download_failed = |reason: String| SourceFetchError::DownloadFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(parsed.clone())
            .send()
            .await
            .map_err(|e| download_failed(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_failed(format!("server responded {}", status)));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string());

        let data = response
            .bytes()
            .await
            .map_err(|e| download_failed(e.without_url().to_string()))?;
        if data.is_empty() {
            return Err(SourceFetchError::EmptyFile(url.to_string()));
        }

        Ok(SourceDocument {
            file_name: file_name_from_url(&parsed),
            content_type,
            data: data.to_vec(),
        })
    }
}
