use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::CaseStudyFile;
use crate::domain::value_objects::{FileMetadata, ProcessingStatus};
use crate::infrastructure::database::schema::case_study_files;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = case_study_files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CaseStudyFileModel {
    pub id: Uuid,
    pub case_study_id: Uuid,
    pub request_id: String,
    pub file_url: String,
    pub markdown: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub status: String,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = case_study_files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewCaseStudyFileModel {
    pub id: Uuid,
    pub case_study_id: Uuid,
    pub request_id: String,
    pub file_url: String,
    pub markdown: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub status: String,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns written when the extractor's result lands.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = case_study_files)]
#[diesel(treat_none_as_null = true)]
pub struct FileCompletionChangeset {
    pub markdown: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub status: String,
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CaseStudyFile> for NewCaseStudyFileModel {
    fn from(file: &CaseStudyFile) -> Self {
        Self {
            id: file.id(),
            case_study_id: file.case_study_id(),
            request_id: file.request_id().to_string(),
            file_url: file.file_url().to_string(),
            markdown: file.markdown().map(str::to_string),
            metadata: file.metadata().cloned().map(Into::into),
            status: file.status().as_str().to_string(),
            error: file.error().map(str::to_string),
            created_at: file.created_at(),
            updated_at: file.updated_at(),
        }
    }
}

impl From<&CaseStudyFile> for FileCompletionChangeset {
    fn from(file: &CaseStudyFile) -> Self {
        Self {
            markdown: file.markdown().map(str::to_string),
            metadata: file.metadata().cloned().map(Into::into),
            status: file.status().as_str().to_string(),
            error: file.error().map(str::to_string),
            updated_at: file.updated_at(),
        }
    }
}

impl TryFrom<CaseStudyFileModel> for CaseStudyFile {
    type Error = String;

    fn try_from(model: CaseStudyFileModel) -> Result<Self, Self::Error> {
        let status = ProcessingStatus::from_string(&model.status)?;

        Ok(CaseStudyFile::restore(
            model.id,
            model.case_study_id,
            model.request_id,
            model.file_url,
            model.markdown,
            model.metadata.map(FileMetadata::from_value),
            status,
            model.error,
            model.created_at,
            model.updated_at,
        ))
    }
}
