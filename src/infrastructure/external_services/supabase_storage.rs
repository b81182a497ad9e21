use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::application::ports::object_storage::{ObjectStorage, ObjectStorageError, StoredObject};

#[derive(Debug, Clone)]
pub struct SupabaseStorageConfig {
    pub url: String,
    pub service_key: String,
    pub bucket: String,
    pub timeout_secs: u64,
}

/// Object storage backed by a public Supabase Storage bucket.
pub struct SupabaseStorage {
    client: Client,
    config: SupabaseStorageConfig,
}

impl SupabaseStorage {
    pub fn new(config: SupabaseStorageConfig) -> Result<Self, ObjectStorageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ObjectStorageError::UploadFailed {
                path: String::new(),
                reason: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url(),
            self.config.bucket,
            path
        )
    }
}

fn validate_path(path: &str) -> Result<(), ObjectStorageError> {
    if path.is_empty()
        || path.starts_with('/')
        || path.split('/').any(|segment| segment.is_empty() || segment == "..")
    {
        return Err(ObjectStorageError::InvalidPath(path.to_string()));
    }
    Ok(())
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, ObjectStorageError> {
        validate_path(path)?;

        let response = self
            .client
            .post(format!(
                "{}/storage/v1/object/{}/{}",
                self.base_url(),
                self.config.bucket,
                path
            ))
            .bearer_auth(&self.config.service_key)
            .header("apikey", &self.config.service_key)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| ObjectStorageError::UploadFailed {
                path: path.to_string(),
                reason: e.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ObjectStorageError::UploadFailed {
                path: path.to_string(),
                reason: format!("{}: {}", status, body),
            });
        }

        Ok(StoredObject {
            path: path.to_string(),
            public_url: self.public_url(path),
        })
    }

    async fn remove(&self, paths: &[String]) -> Result<(), ObjectStorageError> {
        if paths.is_empty() {
            return Ok(());
        }

        let response = self
            .client
            .delete(format!(
                "{}/storage/v1/object/{}",
                self.base_url(),
                self.config.bucket
            ))
            .bearer_auth(&self.config.service_key)
            .header("apikey", &self.config.service_key)
            .json(&json!({ "prefixes": paths }))
            .send()
            .await
            .map_err(|e| ObjectStorageError::DeleteFailed(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ObjectStorageError::DeleteFailed(format!("{}: {}", status, body)));
        }
        Ok(())
    }
}
