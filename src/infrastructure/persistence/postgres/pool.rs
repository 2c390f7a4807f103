use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use crate::domain::auth::errors::RepositoryError;
use crate::infrastructure::config::DatabaseConfig;

/// Opens the connection pool, giving up after `connect_timeout_seconds`
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, RepositoryError> {
  let connect = PgPoolOptions::new()
    .max_connections(config.max_connections)
    .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
    .connect(&config.url);

  let pool = tokio::time::timeout(Duration::from_secs(config.connect_timeout_seconds), connect)
    .await
    .map_err(|_| {
      RepositoryError::ConnectionFailed(format!(
        "Database connection timed out after {} seconds",
        config.connect_timeout_seconds
      ))
    })?
    .map_err(|e| match e {
      sqlx::Error::Io(io) => RepositoryError::ConnectionFailed(io.to_string()),
      other => RepositoryError::from(other),
    })?;

  Ok(pool)
}

/// Applies the bundled schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), RepositoryError> {
  sqlx::migrate!("./migrations")
    .run(pool)
    .await
    .map_err(|e| RepositoryError::DatabaseError(format!("Migration failed: {}", e)))
}
