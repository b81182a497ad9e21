use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::CaseStudyImage;
use crate::domain::repositories::{ImageRepository, RepositoryError};
use crate::infrastructure::database::models::{ImageModel, NewImageModel};
use crate::infrastructure::database::schema::case_study_images::dsl::*;
use crate::infrastructure::database::{DbPool, with_connection};

pub struct PostgresImageRepository {
    pool: DbPool,
}

impl PostgresImageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for PostgresImageRepository {
    async fn insert_if_absent(&self, image: &CaseStudyImage) -> Result<bool, RepositoryError> {
        let new_image = NewImageModel::from(image);

        let inserted = with_connection(&self.pool, move |conn| {
            diesel::insert_into(case_study_images)
                .values(&new_image)
                .on_conflict((file_id, file_name))
                .do_nothing()
                .execute(conn)
        })
        .await?;

        Ok(inserted > 0)
    }

    async fn find_by_file_ids(
        &self,
        file_ids: &[Uuid],
    ) -> Result<Vec<CaseStudyImage>, RepositoryError> {
        let file_ids = file_ids.to_vec();

        let models = with_connection(&self.pool, move |conn| {
            case_study_images
                .filter(file_id.eq_any(file_ids))
                .order((created_at.asc(), file_name.asc()))
                .select(ImageModel::as_select())
                .load(conn)
        })
        .await?;

        Ok(models.into_iter().map(CaseStudyImage::from).collect())
    }
}
