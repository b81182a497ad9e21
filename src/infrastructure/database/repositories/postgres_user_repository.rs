use async_trait::async_trait;
use diesel::prelude::*;
use diesel::dsl::sql;
use diesel::sql_types::{Nullable, Text};
use diesel::upsert::excluded;

use crate::domain::entities::User;
use crate::domain::repositories::{RepositoryError, UserRepository};
use crate::infrastructure::database::models::{NewUserModel, UserModel};
use crate::infrastructure::database::schema::users::dsl::*;
use crate::infrastructure::database::{DbPool, with_connection};

pub struct PostgresUserRepository {
    pool: DbPool,
}

impl PostgresUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn upsert(&self, user: &User) -> Result<(), RepositoryError> {
        let new_user = NewUserModel::from(user);

        with_connection(&self.pool, move |conn| {
            // Claims missing from this token never erase what we already know
            diesel::insert_into(users)
                .values(&new_user)
                .on_conflict(id)
                .do_update()
                .set((
                    name.eq(sql::<Nullable<Text>>("COALESCE(excluded.name, users.name)")),
                    email.eq(sql::<Nullable<Text>>("COALESCE(excluded.email, users.email)")),
                    updated_at.eq(excluded(updated_at)),
                ))
                .execute(conn)
        })
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, RepositoryError> {
        let user_id = user_id.to_string();

        let model = with_connection(&self.pool, move |conn| {
            users
                .find(user_id)
                .select(UserModel::as_select())
                .first(conn)
                .optional()
        })
        .await?;

        Ok(model.map(User::from))
    }
}
