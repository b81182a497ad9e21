use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::entities::User;
use crate::infrastructure::database::schema::users;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserModel {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUserModel {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<&User> for NewUserModel {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().map(str::to_string),
            email: user.email().map(str::to_string),
        }
    }
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User::restore(
            model.id,
            model.name,
            model.email,
            model.created_at,
            model.updated_at,
        )
    }
}
