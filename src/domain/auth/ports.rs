use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use super::entities::User;
use super::errors::{RepositoryError, SecurityError};
use super::value_objects::{Email, PageRequest, Password, PasswordHash, SessionToken, UserId};

/// Durable account storage.
///
/// Email uniqueness is enforced by the backend; a conflicting insert must come
/// back as `RepositoryError::DuplicateKey`, never as a generic failure.
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Inserts a new account and returns its id
  async fn create(&self, user: &User) -> Result<UserId, RepositoryError>;

  /// Finds a user by their email address
  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

  /// Records a successful login
  async fn update_last_login(
    &self,
    user_id: UserId,
    at: DateTime<Utc>,
  ) -> Result<(), RepositoryError>;

  /// Every account, unpaginated
  async fn list_all(&self) -> Result<Vec<User>, RepositoryError>;

  /// A window of accounts ordered by creation time
  async fn list_page(&self, page: PageRequest) -> Result<Vec<User>, RepositoryError>;
}

/// Ephemeral token -> user mapping with store-driven expiry.
#[async_trait]
pub trait SessionStore: Send + Sync {
  /// Atomically stores the token if absent. An existing key yields
  /// `RepositoryError::Collision` and is left untouched.
  async fn create(
    &self,
    token: &SessionToken,
    user_id: UserId,
    ttl: Duration,
  ) -> Result<(), RepositoryError>;

  /// `None` for unknown and for expired tokens alike
  async fn get(&self, token: &SessionToken) -> Result<Option<UserId>, RepositoryError>;

  /// Removes the token; absent tokens are not an error
  async fn delete(&self, token: &SessionToken) -> Result<(), RepositoryError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password with a fresh random salt
  async fn hash(&self, password: &Password) -> Result<PasswordHash, SecurityError>;

  /// Constant-time check. Malformed digests verify as `false`.
  async fn verify(&self, password: &Password, hashed_password: &PasswordHash) -> bool;
}

/// Service trait for secure token generation
#[async_trait]
pub trait TokenGenerator: Send + Sync {
  /// Generates a cryptographically secure random token
  async fn generate(&self) -> Result<SessionToken, SecurityError>;
}
