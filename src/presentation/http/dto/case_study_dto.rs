use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::application::use_cases::{
    CaseStudyDetail, CaseStudySummaryRow, CreateCaseStudyResponse, DeleteCaseStudyResponse,
    FileSubmissionOutcome, FileView,
};
use crate::domain::entities::{CaseStudy, CaseStudyChanges, CaseStudyImage, CaseStudySummary};
use crate::domain::repositories::FileStatusCounts;
use crate::presentation::http::dto::PaginationMetaDto;

#[derive(Debug, Deserialize)]
pub struct CreateCaseStudyDto {
    pub title: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_urls: Vec<String>,
}

/// Absent fields stay untouched; `null` clears an optional field.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCaseStudyDto {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub client_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub industry: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl From<UpdateCaseStudyDto> for CaseStudyChanges {
    fn from(dto: UpdateCaseStudyDto) -> Self {
        Self {
            title: dto.title,
            client_name: dto.client_name,
            industry: dto.industry,
            description: dto.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateSummaryDto {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct CaseStudyResponseDto {
    pub id: Uuid,
    pub title: String,
    pub client_name: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&CaseStudy> for CaseStudyResponseDto {
    fn from(case_study: &CaseStudy) -> Self {
        Self {
            id: case_study.id(),
            title: case_study.title().to_string(),
            client_name: case_study.client_name().map(str::to_string),
            industry: case_study.industry().map(str::to_string),
            description: case_study.description().map(str::to_string),
            created_at: case_study.created_at().to_rfc3339(),
            updated_at: case_study.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateCaseStudyResponseDto {
    pub case_study: CaseStudyResponseDto,
    pub files: Vec<FileSubmissionOutcome>,
}

impl From<CreateCaseStudyResponse> for CreateCaseStudyResponseDto {
    fn from(response: CreateCaseStudyResponse) -> Self {
        Self {
            case_study: CaseStudyResponseDto::from(&response.case_study),
            files: response.files,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteCaseStudyResponseDto {
    pub case_study_id: Uuid,
    pub images_removed: usize,
}

impl From<DeleteCaseStudyResponse> for DeleteCaseStudyResponseDto {
    fn from(response: DeleteCaseStudyResponse) -> Self {
        Self {
            case_study_id: response.case_study_id,
            images_removed: response.images_removed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileCountsDto {
    pub processing: i64,
    pub complete: i64,
    pub failed: i64,
    pub total: i64,
}

impl From<FileStatusCounts> for FileCountsDto {
    fn from(counts: FileStatusCounts) -> Self {
        Self {
            processing: counts.processing,
            complete: counts.complete,
            failed: counts.failed,
            total: counts.total(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CaseStudyListItemDto {
    #[serde(flatten)]
    pub case_study: CaseStudyResponseDto,
    pub file_counts: FileCountsDto,
}

impl From<CaseStudySummaryRow> for CaseStudyListItemDto {
    fn from(row: CaseStudySummaryRow) -> Self {
        Self {
            case_study: CaseStudyResponseDto::from(&row.case_study),
            file_counts: FileCountsDto::from(row.file_counts),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CaseStudyListResponseDto {
    pub case_studies: Vec<CaseStudyListItemDto>,
    pub meta: PaginationMetaDto,
}

#[derive(Debug, Serialize)]
pub struct ImageDto {
    pub id: Uuid,
    pub file_name: String,
    pub url: String,
}

impl From<&CaseStudyImage> for ImageDto {
    fn from(image: &CaseStudyImage) -> Self {
        Self {
            id: image.id(),
            file_name: image.file_name().to_string(),
            url: image.url().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileDto {
    pub id: Uuid,
    pub request_id: String,
    pub file_url: String,
    pub status: String,
    pub failed: bool,
    pub error: Option<String>,
    pub markdown: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub images: Vec<ImageDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&FileView> for FileDto {
    fn from(view: &FileView) -> Self {
        let file = &view.file;
        Self {
            id: file.id(),
            request_id: file.request_id().to_string(),
            file_url: file.file_url().to_string(),
            status: file.status().to_string(),
            failed: file.is_failed(),
            error: file.error().map(str::to_string),
            markdown: file.markdown().map(str::to_string),
            metadata: file.metadata().cloned().map(Into::into),
            images: view.images.iter().map(ImageDto::from).collect(),
            created_at: file.created_at().to_rfc3339(),
            updated_at: file.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryDto {
    pub id: Uuid,
    pub case_study_id: Uuid,
    pub summary: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&CaseStudySummary> for SummaryDto {
    fn from(summary: &CaseStudySummary) -> Self {
        Self {
            id: summary.id(),
            case_study_id: summary.case_study_id(),
            summary: summary.summary().to_string(),
            created_at: summary.created_at().to_rfc3339(),
            updated_at: summary.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CaseStudyDetailDto {
    #[serde(flatten)]
    pub case_study: CaseStudyResponseDto,
    pub processing: bool,
    pub files: Vec<FileDto>,
    pub summaries: Vec<SummaryDto>,
}

impl From<&CaseStudyDetail> for CaseStudyDetailDto {
    fn from(detail: &CaseStudyDetail) -> Self {
        Self {
            case_study: CaseStudyResponseDto::from(&detail.case_study),
            processing: detail.is_processing(),
            files: detail.files.iter().map(FileDto::from).collect(),
            summaries: detail.summaries.iter().map(SummaryDto::from).collect(),
        }
    }
}

/// Compact per-file status pushed on the status stream.
#[derive(Debug, Serialize)]
pub struct FileStatusDto {
    pub id: Uuid,
    pub file_url: String,
    pub status: String,
    pub failed: bool,
    pub error: Option<String>,
    pub image_count: usize,
}

#[derive(Debug, Serialize)]
pub struct StatusEventDto {
    pub case_study_id: Uuid,
    pub processing: bool,
    pub files: Vec<FileStatusDto>,
}

impl From<&CaseStudyDetail> for StatusEventDto {
    fn from(detail: &CaseStudyDetail) -> Self {
        Self {
            case_study_id: detail.case_study.id(),
            processing: detail.is_processing(),
            files: detail
                .files
                .iter()
                .map(|view| FileStatusDto {
                    id: view.file.id(),
                    file_url: view.file.file_url().to_string(),
                    status: view.file.status().to_string(),
                    failed: view.file.is_failed(),
                    error: view.file.error().map(str::to_string),
                    image_count: view.images.len(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_dto_distinguishes_absent_and_null() {
        let dto: UpdateCaseStudyDto =
            serde_json::from_str(r#"{"industry": null, "client_name": "Acme"}"#).unwrap();
        let changes = CaseStudyChanges::from(dto);

        assert_eq!(changes.title, None);
        assert_eq!(changes.industry, Some(None));
        assert_eq!(changes.client_name, Some(Some("Acme".to_string())));
        assert_eq!(changes.description, None);
    }
}
