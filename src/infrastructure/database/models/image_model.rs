use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::CaseStudyImage;
use crate::infrastructure::database::schema::case_study_images;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = case_study_images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ImageModel {
    pub id: Uuid,
    pub file_id: Uuid,
    pub file_name: String,
    pub storage_path: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = case_study_images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewImageModel {
    pub id: Uuid,
    pub file_id: Uuid,
    pub file_name: String,
    pub storage_path: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl From<&CaseStudyImage> for NewImageModel {
    fn from(image: &CaseStudyImage) -> Self {
        Self {
            id: image.id(),
            file_id: image.file_id(),
            file_name: image.file_name().to_string(),
            storage_path: image.storage_path().to_string(),
            url: image.url().to_string(),
            created_at: image.created_at(),
        }
    }
}

impl From<ImageModel> for CaseStudyImage {
    fn from(model: ImageModel) -> Self {
        CaseStudyImage::restore(
            model.id,
            model.file_id,
            model.file_name,
            model.storage_path,
            model.url,
            model.created_at,
        )
    }
}
