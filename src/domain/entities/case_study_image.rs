use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStudyImage {
    id: Uuid,
    file_id: Uuid,
    file_name: String,
    storage_path: String,
    url: String,
    created_at: DateTime<Utc>,
}

impl CaseStudyImage {
    pub fn new(file_id: Uuid, file_name: String, storage_path: String, url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_id,
            file_name,
            storage_path,
            url,
            created_at: Utc::now(),
        }
    }

    pub fn restore(
        id: Uuid,
        file_id: Uuid,
        file_name: String,
        storage_path: String,
        url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            file_id,
            file_name,
            storage_path,
            url,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_id(&self) -> Uuid {
        self.file_id
    }

    /// Name the extractor gave the image; unique per file.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn storage_path(&self) -> &str {
        &self.storage_path
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
