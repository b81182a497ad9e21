use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::CaseStudySummary;
use crate::infrastructure::database::schema::case_study_summaries;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = case_study_summaries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SummaryModel {
    pub id: Uuid,
    pub case_study_id: Uuid,
    pub summary: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = case_study_summaries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSummaryModel {
    pub id: Uuid,
    pub case_study_id: Uuid,
    pub summary: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CaseStudySummary> for NewSummaryModel {
    fn from(summary: &CaseStudySummary) -> Self {
        Self {
            id: summary.id(),
            case_study_id: summary.case_study_id(),
            summary: summary.summary().to_string(),
            created_at: summary.created_at(),
            updated_at: summary.updated_at(),
        }
    }
}

impl From<SummaryModel> for CaseStudySummary {
    fn from(model: SummaryModel) -> Self {
        CaseStudySummary::restore(
            model.id,
            model.case_study_id,
            model.summary,
            model.created_at,
            model.updated_at,
        )
    }
}
