use async_trait::async_trait;

use crate::domain::entities::User;
use crate::domain::repositories::RepositoryError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user, or refreshes name/email of an existing row. Known
    /// values are never overwritten with `None`.
    async fn upsert(&self, user: &User) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepositoryError>;
}
