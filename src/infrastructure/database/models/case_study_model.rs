use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::CaseStudy;
use crate::infrastructure::database::schema::case_studies;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = case_studies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CaseStudyModel {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub client_name: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = case_studies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewCaseStudyModel {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub client_name: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable columns. `treat_none_as_null` so cleared fields are written.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = case_studies)]
#[diesel(treat_none_as_null = true)]
pub struct CaseStudyChangeset {
    pub title: String,
    pub client_name: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CaseStudy> for NewCaseStudyModel {
    fn from(case_study: &CaseStudy) -> Self {
        Self {
            id: case_study.id(),
            user_id: case_study.user_id().to_string(),
            title: case_study.title().to_string(),
            client_name: case_study.client_name().map(str::to_string),
            industry: case_study.industry().map(str::to_string),
            description: case_study.description().map(str::to_string),
            created_at: case_study.created_at(),
            updated_at: case_study.updated_at(),
        }
    }
}

impl From<&CaseStudy> for CaseStudyChangeset {
    fn from(case_study: &CaseStudy) -> Self {
        Self {
            title: case_study.title().to_string(),
            client_name: case_study.client_name().map(str::to_string),
            industry: case_study.industry().map(str::to_string),
            description: case_study.description().map(str::to_string),
            updated_at: case_study.updated_at(),
        }
    }
}

impl From<CaseStudyModel> for CaseStudy {
    fn from(model: CaseStudyModel) -> Self {
        CaseStudy::restore(
            model.id,
            model.user_id,
            model.title,
            model.client_name,
            model.industry,
            model.description,
            model.created_at,
            model.updated_at,
        )
    }
}
