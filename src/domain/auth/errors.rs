use thiserror::Error;

use super::context::Interrupted;

/// Outcome of every Auth Service operation that did not succeed.
///
/// The first three variants are expected and carry no internal detail.
/// `Storage` is opaque to callers: its `Display` never includes the cause.
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("User already exists")]
  DuplicateEmail,

  #[error("Incorrect email or password")]
  InvalidCredentials,

  #[error("Incorrect or expired session")]
  InvalidSession,

  #[error(transparent)]
  Storage(#[from] StorageError),
}

/// Which backing dependency failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFailure {
  Database,
  Cache,
  Hashing,
  TokenGeneration,
  SessionCollision,
  Cancelled,
  DeadlineExceeded,
}

/// Opaque failure of a backing store or security primitive.
#[derive(Debug, Error)]
#[error("Internal storage error")]
pub struct StorageError {
  kind: StorageFailure,
  detail: String,
}

impl StorageError {
  pub fn new(kind: StorageFailure, detail: impl Into<String>) -> Self {
    Self {
      kind,
      detail: detail.into(),
    }
  }

  pub fn kind(&self) -> StorageFailure {
    self.kind
  }

  /// Internal description, for logs only
  pub fn detail(&self) -> &str {
    &self.detail
  }
}

/// Name of the unique constraint on `users.email`
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Session token already present")]
  Collision,

  #[error("Database error: {0}")]
  DatabaseError(String),

  #[error("Cache error: {0}")]
  Cache(String),
}

impl RepositoryError {
  /// True when an insert collided with an existing account's email.
  ///
  /// Drivers that cannot name the constraint report the server message, which
  /// still mentions it.
  pub fn is_email_conflict(&self) -> bool {
    matches!(self, RepositoryError::DuplicateKey(key) if key.contains(EMAIL_UNIQUE_CONSTRAINT))
  }
}

/// Failures of the hashing and randomness primitives
#[derive(Debug, Error)]
pub enum SecurityError {
  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Entropy source unavailable: {0}")]
  EntropyUnavailable(String),
}

impl From<RepositoryError> for StorageError {
  fn from(error: RepositoryError) -> Self {
    let kind = match error {
      RepositoryError::Collision => StorageFailure::SessionCollision,
      RepositoryError::Cache(_) => StorageFailure::Cache,
      _ => StorageFailure::Database,
    };
    StorageError::new(kind, error.to_string())
  }
}

impl From<SecurityError> for StorageError {
  fn from(error: SecurityError) -> Self {
    let kind = match error {
      SecurityError::HashingFailed(_) => StorageFailure::Hashing,
      SecurityError::EntropyUnavailable(_) => StorageFailure::TokenGeneration,
    };
    StorageError::new(kind, error.to_string())
  }
}

impl From<Interrupted> for StorageError {
  fn from(interrupted: Interrupted) -> Self {
    match interrupted {
      Interrupted::Cancelled => StorageError::new(StorageFailure::Cancelled, "operation cancelled"),
      Interrupted::DeadlineExceeded => {
        StorageError::new(StorageFailure::DeadlineExceeded, "deadline exceeded")
      }
    }
  }
}

// Automatic conversions from external error types

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(
            db_err
              .constraint()
              .unwrap_or_else(|| db_err.message())
              .to_string(),
          )
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<redis::RedisError> for RepositoryError {
  fn from(error: redis::RedisError) -> Self {
    RepositoryError::Cache(error.to_string())
  }
}
