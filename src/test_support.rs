//! In-memory fakes for repositories and external collaborators.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractionOptions, ExtractionResult,
    ExtractionSubmission,
};
use crate::application::ports::language_model::{
    GenerationRequest, LanguageModel, LanguageModelError,
};
use crate::application::ports::object_storage::{ObjectStorage, ObjectStorageError, StoredObject};
use crate::application::ports::source_fetcher::{SourceDocument, SourceFetchError, SourceFetcher};
use crate::domain::entities::{CaseStudy, CaseStudyFile, CaseStudyImage, CaseStudySummary, User};
use crate::domain::repositories::{
    CaseStudyRepository, FileRepository, FileStatusCounts, ImageRepository, RepositoryError,
    SummaryRepository, UserRepository,
};

/// One store backing every repository trait, with the same cascade rules as
/// the database schema.
#[derive(Default)]
pub struct InMemoryStore {
    pub users: Mutex<Vec<User>>,
    pub case_studies: Mutex<Vec<CaseStudy>>,
    pub files: Mutex<Vec<CaseStudyFile>>,
    pub images: Mutex<Vec<CaseStudyImage>>,
    pub summaries: Mutex<Vec<CaseStudySummary>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn image_count(&self) -> usize {
        self.images.lock().unwrap().len()
    }

    pub fn case_study_count(&self) -> usize {
        self.case_studies.lock().unwrap().len()
    }

    pub fn summary_count(&self) -> usize {
        self.summaries.lock().unwrap().len()
    }

    pub fn files_snapshot(&self) -> Vec<CaseStudyFile> {
        self.files.lock().unwrap().clone()
    }

    pub fn seed_case_study(&self, user_id: &str, title: &str) -> CaseStudy {
        let case_study = CaseStudy::new(
            user_id.to_string(),
            title.to_string(),
            None,
            None,
            None,
        )
        .unwrap();
        self.case_studies.lock().unwrap().push(case_study.clone());
        case_study
    }

    pub fn seed_file(&self, case_study_id: Uuid, request_id: &str) -> CaseStudyFile {
        let file = CaseStudyFile::new(
            case_study_id,
            request_id.to_string(),
            format!("https://files.example.com/{request_id}.pdf"),
            None,
        );
        self.files.lock().unwrap().push(file.clone());
        file
    }

    pub fn replace_file(&self, file: CaseStudyFile) {
        let mut files = self.files.lock().unwrap();
        if let Some(existing) = files.iter_mut().find(|f| f.id() == file.id()) {
            *existing = file;
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn upsert(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if let Some(existing) = users.iter_mut().find(|u| u.id() == user.id()) {
            let name = user.name().or(existing.name()).map(str::to_string);
            let email = user.email().or(existing.email()).map(str::to_string);
            *existing = User::restore(
                existing.id().to_string(),
                name,
                email,
                existing.created_at(),
                user.updated_at(),
            );
        } else {
            users.push(user.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id() == id).cloned())
    }
}

#[async_trait]
impl CaseStudyRepository for InMemoryStore {
    async fn save(&self, case_study: &CaseStudy) -> Result<(), RepositoryError> {
        let users = self.users.lock().unwrap();
        if !users.iter().any(|u| u.id() == case_study.user_id()) {
            return Err(RepositoryError::DatabaseError(
                "foreign key violation: users".to_string(),
            ));
        }
        self.case_studies.lock().unwrap().push(case_study.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CaseStudy>, RepositoryError> {
        Ok(self
            .case_studies
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id() == id)
            .cloned())
    }

    async fn find_by_owner(
        &self,
        user_id: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<CaseStudy>, RepositoryError> {
        let mut owned: Vec<CaseStudy> = self
            .case_studies
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_owned_by(user_id))
            .cloned()
            .collect();
        owned.sort_by_key(|c| std::cmp::Reverse(c.created_at()));
        Ok(owned
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_by_owner(&self, user_id: &str) -> Result<i64, RepositoryError> {
        Ok(self
            .case_studies
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_owned_by(user_id))
            .count() as i64)
    }

    async fn update(&self, case_study: &CaseStudy) -> Result<(), RepositoryError> {
        let mut case_studies = self.case_studies.lock().unwrap();
        match case_studies.iter_mut().find(|c| c.id() == case_study.id()) {
            Some(existing) => {
                *existing = case_study.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(case_study.id().to_string())),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut case_studies = self.case_studies.lock().unwrap();
        let before = case_studies.len();
        case_studies.retain(|c| c.id() != id);
        if case_studies.len() == before {
            return Ok(false);
        }

        let mut files = self.files.lock().unwrap();
        let removed_files: Vec<Uuid> = files
            .iter()
            .filter(|f| f.case_study_id() == id)
            .map(|f| f.id())
            .collect();
        files.retain(|f| f.case_study_id() != id);
        self.images
            .lock()
            .unwrap()
            .retain(|i| !removed_files.contains(&i.file_id()));
        self.summaries
            .lock()
            .unwrap()
            .retain(|s| s.case_study_id() != id);
        Ok(true)
    }
}

#[async_trait]
impl FileRepository for InMemoryStore {
    async fn save(&self, file: &CaseStudyFile) -> Result<(), RepositoryError> {
        let mut files = self.files.lock().unwrap();
        if files.iter().any(|f| f.request_id() == file.request_id()) {
            return Err(RepositoryError::Conflict(file.request_id().to_string()));
        }
        files.push(file.clone());
        Ok(())
    }

    async fn find_by_request_id(
        &self,
        request_id: &str,
    ) -> Result<Option<CaseStudyFile>, RepositoryError> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.request_id() == request_id)
            .cloned())
    }

    async fn find_by_case_study(
        &self,
        case_study_id: Uuid,
    ) -> Result<Vec<CaseStudyFile>, RepositoryError> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.case_study_id() == case_study_id)
            .cloned()
            .collect())
    }

    async fn save_completion(&self, file: &CaseStudyFile) -> Result<bool, RepositoryError> {
        let mut files = self.files.lock().unwrap();
        match files
            .iter_mut()
            .find(|f| f.id() == file.id() && f.is_processing())
        {
            Some(existing) => {
                *existing = file.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn status_counts(
        &self,
        case_study_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, FileStatusCounts>, RepositoryError> {
        let mut counts: HashMap<Uuid, FileStatusCounts> = HashMap::new();
        for file in self.files.lock().unwrap().iter() {
            if !case_study_ids.contains(&file.case_study_id()) {
                continue;
            }
            let entry = counts.entry(file.case_study_id()).or_default();
            if file.is_processing() {
                entry.processing += 1;
            } else {
                entry.complete += 1;
                if file.is_failed() {
                    entry.failed += 1;
                }
            }
        }
        Ok(counts)
    }
}

#[async_trait]
impl ImageRepository for InMemoryStore {
    async fn insert_if_absent(&self, image: &CaseStudyImage) -> Result<bool, RepositoryError> {
        let mut images = self.images.lock().unwrap();
        if images
            .iter()
            .any(|i| i.file_id() == image.file_id() && i.file_name() == image.file_name())
        {
            return Ok(false);
        }
        images.push(image.clone());
        Ok(true)
    }

    async fn find_by_file_ids(
        &self,
        file_ids: &[Uuid],
    ) -> Result<Vec<CaseStudyImage>, RepositoryError> {
        Ok(self
            .images
            .lock()
            .unwrap()
            .iter()
            .filter(|i| file_ids.contains(&i.file_id()))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SummaryRepository for InMemoryStore {
    async fn save(&self, summary: &CaseStudySummary) -> Result<(), RepositoryError> {
        self.summaries.lock().unwrap().push(summary.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CaseStudySummary>, RepositoryError> {
        Ok(self
            .summaries
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id() == id)
            .cloned())
    }

    async fn find_by_case_study(
        &self,
        case_study_id: Uuid,
    ) -> Result<Vec<CaseStudySummary>, RepositoryError> {
        let mut summaries: Vec<CaseStudySummary> = self
            .summaries
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.case_study_id() == case_study_id)
            .cloned()
            .collect();
        summaries.reverse();
        Ok(summaries)
    }

    async fn update(&self, summary: &CaseStudySummary) -> Result<(), RepositoryError> {
        let mut summaries = self.summaries.lock().unwrap();
        match summaries.iter_mut().find(|s| s.id() == summary.id()) {
            Some(existing) => {
                *existing = summary.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(summary.id().to_string())),
        }
    }
}

/// Serves a small PDF for every URL except those containing `fail-download`.
#[derive(Default)]
pub struct FakeFetcher {
    pub fetched: Mutex<Vec<String>>,
}

#[async_trait]
impl SourceFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<SourceDocument, SourceFetchError> {
        self.fetched.lock().unwrap().push(url.to_string());
        if url.contains("fail-download") {
            return Err(SourceFetchError::DownloadFailed {
                url: url.to_string(),
                reason: "connection reset".to_string(),
            });
        }
        let file_name = url.rsplit('/').next().unwrap_or("document.pdf").to_string();
        Ok(SourceDocument {
            file_name,
            content_type: Some("application/pdf".to_string()),
            data: format!("%PDF-1.7 {url}").into_bytes(),
        })
    }
}

/// Accepts every document except those named `reject*`; results are served
/// from `result`.
pub struct FakeExtractor {
    pub submitted: Mutex<Vec<String>>,
    pub fetches: Mutex<usize>,
    pub result: Mutex<Result<ExtractionResult, String>>,
}

impl Default for FakeExtractor {
    fn default() -> Self {
        Self {
            submitted: Mutex::new(Vec::new()),
            fetches: Mutex::new(0),
            result: Mutex::new(Ok(ExtractionResult::default())),
        }
    }
}

impl FakeExtractor {
    pub fn with_result(result: ExtractionResult) -> Self {
        let extractor = Self::default();
        *extractor.result.lock().unwrap() = Ok(result);
        extractor
    }

    pub fn fetch_count(&self) -> usize {
        *self.fetches.lock().unwrap()
    }
}

#[async_trait]
impl DocumentExtractor for FakeExtractor {
    async fn submit(
        &self,
        document: SourceDocument,
        options: &ExtractionOptions,
    ) -> Result<ExtractionSubmission, DocumentExtractionError> {
        assert_eq!(options, &ExtractionOptions::default());
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(document.file_name.clone());
        if document.file_name.starts_with("reject") {
            return Err(DocumentExtractionError::Rejected(
                "Unsupported file type".to_string(),
            ));
        }
        let request_id = format!("req-{}-{}", submitted.len(), document.file_name);
        Ok(ExtractionSubmission {
            request_id: request_id.clone(),
            request_check_url: Some(format!("https://extract.example.com/check/{request_id}")),
            raw: serde_json::json!({"request_id": request_id, "success": true}),
        })
    }

    async fn fetch_result(
        &self,
        _request_check_url: &str,
    ) -> Result<ExtractionResult, DocumentExtractionError> {
        *self.fetches.lock().unwrap() += 1;
        self.result
            .lock()
            .unwrap()
            .clone()
            .map_err(DocumentExtractionError::ResultFetchFailed)
    }
}

/// Fails uploads whose path contains `fail`, or every upload while `offline`.
#[derive(Default)]
pub struct FakeStorage {
    pub uploaded: Mutex<Vec<String>>,
    pub removed: Mutex<Vec<String>>,
    pub offline: AtomicBool,
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn upload(
        &self,
        path: &str,
        _data: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredObject, ObjectStorageError> {
        if self.offline.load(Ordering::SeqCst) || path.contains("fail") {
            return Err(ObjectStorageError::UploadFailed {
                path: path.to_string(),
                reason: "503 Service Unavailable".to_string(),
            });
        }
        self.uploaded.lock().unwrap().push(path.to_string());
        Ok(StoredObject {
            path: path.to_string(),
            public_url: format!("https://storage.example.com/public/{path}"),
        })
    }

    async fn remove(&self, paths: &[String]) -> Result<(), ObjectStorageError> {
        self.removed.lock().unwrap().extend(paths.iter().cloned());
        Ok(())
    }
}

pub struct FakeModel {
    pub response: Result<String, String>,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl FakeModel {
    pub fn replying(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LanguageModelError> {
        self.requests.lock().unwrap().push(request);
        self.response.clone().map_err(LanguageModelError::ApiError)
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
