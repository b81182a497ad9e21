use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::CaseStudySummary;
use crate::domain::repositories::{RepositoryError, SummaryRepository};
use crate::infrastructure::database::models::{NewSummaryModel, SummaryModel};
use crate::infrastructure::database::schema::case_study_summaries::dsl::*;
use crate::infrastructure::database::{DbPool, with_connection};

pub struct PostgresSummaryRepository {
    pool: DbPool,
}

impl PostgresSummaryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SummaryRepository for PostgresSummaryRepository {
    async fn save(&self, new_summary: &CaseStudySummary) -> Result<(), RepositoryError> {
        let model = NewSummaryModel::from(new_summary);

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(case_study_summaries)
                .values(&model)
                .execute(conn)
        })
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, summary_id: Uuid) -> Result<Option<CaseStudySummary>, RepositoryError> {
        let model = with_connection(&self.pool, move |conn| {
            case_study_summaries
                .find(summary_id)
                .select(SummaryModel::as_select())
                .first(conn)
                .optional()
        })
        .await?;

        Ok(model.map(CaseStudySummary::from))
    }

    async fn find_by_case_study(
        &self,
        parent_id: Uuid,
    ) -> Result<Vec<CaseStudySummary>, RepositoryError> {
        let models = with_connection(&self.pool, move |conn| {
            case_study_summaries
                .filter(case_study_id.eq(parent_id))
                .order(created_at.desc())
                .select(SummaryModel::as_select())
                .load(conn)
        })
        .await?;

        Ok(models.into_iter().map(CaseStudySummary::from).collect())
    }

    async fn update(&self, edited: &CaseStudySummary) -> Result<(), RepositoryError> {
        let summary_id = edited.id();
        let text = edited.summary().to_string();
        let edited_at = edited.updated_at();

        let updated = with_connection(&self.pool, move |conn| {
            diesel::update(case_study_summaries.find(summary_id))
                .set((summary.eq(text), updated_at.eq(edited_at)))
                .execute(conn)
        })
        .await?;

        if updated == 0 {
            return Err(RepositoryError::NotFound(summary_id.to_string()));
        }
        Ok(())
    }
}
