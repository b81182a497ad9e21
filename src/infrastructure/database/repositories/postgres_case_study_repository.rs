use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::CaseStudy;
use crate::domain::repositories::{CaseStudyRepository, RepositoryError};
use crate::infrastructure::database::models::{
    CaseStudyChangeset, CaseStudyModel, NewCaseStudyModel,
};
use crate::infrastructure::database::schema::case_studies::dsl::*;
use crate::infrastructure::database::{DbPool, with_connection};

pub struct PostgresCaseStudyRepository {
    pool: DbPool,
}

impl PostgresCaseStudyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CaseStudyRepository for PostgresCaseStudyRepository {
    async fn save(&self, case_study: &CaseStudy) -> Result<(), RepositoryError> {
        let new_case_study = NewCaseStudyModel::from(case_study);

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(case_studies)
                .values(&new_case_study)
                .execute(conn)
        })
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, case_study_id: Uuid) -> Result<Option<CaseStudy>, RepositoryError> {
        let model = with_connection(&self.pool, move |conn| {
            case_studies
                .find(case_study_id)
                .select(CaseStudyModel::as_select())
                .first(conn)
                .optional()
        })
        .await?;

        Ok(model.map(CaseStudy::from))
    }

    async fn find_by_owner(
        &self,
        owner: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<CaseStudy>, RepositoryError> {
        let owner = owner.to_string();

        let models = with_connection(&self.pool, move |conn| {
            case_studies
                .filter(user_id.eq(owner))
                .order(created_at.desc())
                .offset(skip)
                .limit(limit)
                .select(CaseStudyModel::as_select())
                .load(conn)
        })
        .await?;

        Ok(models.into_iter().map(CaseStudy::from).collect())
    }

    async fn count_by_owner(&self, owner: &str) -> Result<i64, RepositoryError> {
        let owner = owner.to_string();

        let count = with_connection(&self.pool, move |conn| {
            case_studies
                .filter(user_id.eq(owner))
                .count()
                .get_result(conn)
        })
        .await?;

        Ok(count)
    }

    async fn update(&self, case_study: &CaseStudy) -> Result<(), RepositoryError> {
        let case_study_id = case_study.id();
        let changes = CaseStudyChangeset::from(case_study);

        let updated = with_connection(&self.pool, move |conn| {
            diesel::update(case_studies.find(case_study_id))
                .set(&changes)
                .execute(conn)
        })
        .await?;

        if updated == 0 {
            return Err(RepositoryError::NotFound(case_study_id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, case_study_id: Uuid) -> Result<bool, RepositoryError> {
        let deleted_count = with_connection(&self.pool, move |conn| {
            diesel::delete(case_studies.find(case_study_id)).execute(conn)
        })
        .await?;

        Ok(deleted_count > 0)
    }
}
