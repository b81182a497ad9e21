use diesel::{
    PgConnection,
    r2d2::{self, ConnectionManager},
    result::{DatabaseErrorKind, Error as DieselError},
};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;

use crate::domain::repositories::RepositoryError;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/");

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Pool error: {0}")]
    PoolError(String),
    #[error("Migration error: {0}")]
    MigrationError(String),
    #[error("Query error: {0}")]
    QueryError(#[from] DieselError),
    #[error("Blocking task failed: {0}")]
    TaskError(String),
}

impl From<DatabaseError> for RepositoryError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::QueryError(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                info,
            )) => RepositoryError::Conflict(info.message().to_string()),
            DatabaseError::QueryError(DieselError::NotFound) => {
                RepositoryError::NotFound("record not found".to_string())
            }
            other => RepositoryError::DatabaseError(other.to_string()),
        }
    }
}

pub fn create_connection_pool(database_url: &str, max_size: u32) -> Result<DbPool, DatabaseError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    r2d2::Pool::builder()
        .max_size(max_size)
        .min_idle(Some(1))
        .build(manager)
        .map_err(|e| DatabaseError::PoolError(e.to_string()))
}

pub fn get_connection_from_pool(pool: &DbPool) -> Result<DbConnection, DatabaseError> {
    pool.get().map_err(|e| DatabaseError::PoolError(e.to_string()))
}

pub fn run_migrations(pool: &DbPool) -> Result<(), DatabaseError> {
    let mut conn = get_connection_from_pool(pool)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    tracing::info!(applied = applied.len(), "Database migrations up to date");
    Ok(())
}

/// Runs a diesel closure on a pooled connection off the async runtime.
pub async fn with_connection<T, F>(pool: &DbPool, operation: F) -> Result<T, DatabaseError>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> Result<T, DieselError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = get_connection_from_pool(&pool)?;
        operation(&mut conn).map_err(DatabaseError::from)
    })
    .await
    .map_err(|e| DatabaseError::TaskError(e.to_string()))?
}
