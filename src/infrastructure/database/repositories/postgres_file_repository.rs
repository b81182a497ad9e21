use async_trait::async_trait;
use diesel::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::entities::CaseStudyFile;
use crate::domain::repositories::{FileRepository, FileStatusCounts, RepositoryError};
use crate::domain::value_objects::ProcessingStatus;
use crate::infrastructure::database::models::{
    CaseStudyFileModel, FileCompletionChangeset, NewCaseStudyFileModel,
};
use crate::infrastructure::database::schema::case_study_files::dsl::*;
use crate::infrastructure::database::{DbPool, with_connection};

pub struct PostgresFileRepository {
    pool: DbPool,
}

impl PostgresFileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_domain(model: CaseStudyFileModel) -> Result<CaseStudyFile, RepositoryError> {
    CaseStudyFile::try_from(model).map_err(RepositoryError::ValidationError)
}

#[async_trait]
impl FileRepository for PostgresFileRepository {
    async fn save(&self, file: &CaseStudyFile) -> Result<(), RepositoryError> {
        let new_file = NewCaseStudyFileModel::from(file);

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(case_study_files)
                .values(&new_file)
                .execute(conn)
        })
        .await?;

        Ok(())
    }

    async fn find_by_request_id(
        &self,
        job_request_id: &str,
    ) -> Result<Option<CaseStudyFile>, RepositoryError> {
        let job_request_id = job_request_id.to_string();

        let model = with_connection(&self.pool, move |conn| {
            case_study_files
                .filter(request_id.eq(job_request_id))
                .select(CaseStudyFileModel::as_select())
                .first(conn)
                .optional()
        })
        .await?;

        model.map(to_domain).transpose()
    }

    async fn find_by_case_study(
        &self,
        parent_id: Uuid,
    ) -> Result<Vec<CaseStudyFile>, RepositoryError> {
        let models = with_connection(&self.pool, move |conn| {
            case_study_files
                .filter(case_study_id.eq(parent_id))
                .order((created_at.asc(), id.asc()))
                .select(CaseStudyFileModel::as_select())
                .load(conn)
        })
        .await?;

        models.into_iter().map(to_domain).collect()
    }

    async fn save_completion(&self, file: &CaseStudyFile) -> Result<bool, RepositoryError> {
        let file_id = file.id();
        let changes = FileCompletionChangeset::from(file);

        // The status guard makes concurrent or replayed deliveries lose the race
        let updated = with_connection(&self.pool, move |conn| {
            diesel::update(
                case_study_files
                    .find(file_id)
                    .filter(status.eq(ProcessingStatus::Processing.as_str())),
            )
            .set(&changes)
            .execute(conn)
        })
        .await?;

        Ok(updated > 0)
    }

    async fn status_counts(
        &self,
        case_study_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, FileStatusCounts>, RepositoryError> {
        let case_study_ids = case_study_ids.to_vec();

        let rows: Vec<(Uuid, String, bool)> = with_connection(&self.pool, move |conn| {
            case_study_files
                .filter(case_study_id.eq_any(case_study_ids))
                .select((case_study_id, status, error.is_not_null()))
                .load(conn)
        })
        .await?;

        let mut counts: HashMap<Uuid, FileStatusCounts> = HashMap::new();
        for (parent_id, file_status, has_error) in rows {
            let entry = counts.entry(parent_id).or_default();
            match ProcessingStatus::from_string(&file_status)
                .map_err(RepositoryError::ValidationError)?
            {
                ProcessingStatus::Processing => entry.processing += 1,
                ProcessingStatus::Complete => {
                    entry.complete += 1;
                    if has_error {
                        entry.failed += 1;
                    }
                }
            }
        }
        Ok(counts)
    }
}
