use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use super::value_objects::{Email, PasswordHash, SessionToken, UserId};

/// User entity representing an account in the durable store
#[derive(Debug, Clone)]
pub struct User {
  /// Unique identifier for the user
  pub id: UserId,
  /// User's email address (unique at the storage layer)
  pub email: String,
  /// Argon2id digest of the user's password
  pub password_hash: PasswordHash,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
  /// Timestamp of the last successful login, if any
  pub last_login: Option<DateTime<Utc>>,
}

impl User {
  /// Creates a new user with a fresh random id
  pub fn new(email: Email, password_hash: PasswordHash) -> Self {
    Self {
      id: UserId::new(),
      email: email.into_inner(),
      password_hash,
      created_at: Utc::now(),
      last_login: None,
    }
  }

  /// Creates a user from database fields (for reconstruction)
  pub fn from_db(
    id: UserId,
    email: String,
    password_hash: PasswordHash,
    created_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
  ) -> Self {
    Self {
      id,
      email,
      password_hash,
      created_at,
      last_login,
    }
  }

  /// Public view of the account, without the password digest
  pub fn summary(&self) -> UserSummary {
    UserSummary {
      id: self.id,
      email: self.email.clone(),
      created_at: self.created_at,
      last_login: self.last_login,
    }
  }
}

/// Account data that may cross the process boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
  pub id: UserId,
  pub email: String,
  pub created_at: DateTime<Utc>,
  pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserSummary {
  fn from(user: User) -> Self {
    Self {
      id: user.id,
      email: user.email,
      created_at: user.created_at,
      last_login: user.last_login,
    }
  }
}

/// A session issued by a successful login.
///
/// The store only keeps `token -> user_id` with a TTL; `expires_at` is what
/// the issuing instance computed and is informational for the client.
#[derive(Debug, Clone)]
pub struct Session {
  pub token: SessionToken,
  pub user_id: UserId,
  pub ttl: Duration,
  pub created_at: DateTime<Utc>,
}

impl Session {
  pub fn new(token: SessionToken, user_id: UserId, ttl: Duration) -> Self {
    Self {
      token,
      user_id,
      ttl,
      created_at: Utc::now(),
    }
  }

  pub fn expires_at(&self) -> DateTime<Utc> {
    let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::MAX);
    self
      .created_at
      .checked_add_signed(ttl)
      .unwrap_or(DateTime::<Utc>::MAX_UTC)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_user_creation() {
    let user = User::new(
      Email::new("test@example.com"),
      PasswordHash::from_hash("hashed_password"),
    );

    assert_eq!(user.email, "test@example.com");
    assert!(user.last_login.is_none());
  }

  #[test]
  fn test_summary_has_no_digest() {
    let user = User::new(
      Email::new("test@example.com"),
      PasswordHash::from_hash("$argon2id$secret-digest"),
    );

    let json = serde_json::to_value(user.summary()).unwrap();
    let fields: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();

    assert_eq!(fields.len(), 4);
    assert!(fields.contains(&"id"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"created_at"));
    assert!(fields.contains(&"last_login"));
    assert!(!json.to_string().contains("secret-digest"));
  }

  #[test]
  fn test_session_expiry() {
    let session = Session::new(
      SessionToken::generated("token".to_string()),
      UserId::new(),
      Duration::from_secs(3 * 60 * 60),
    );

    assert_eq!(
      session.expires_at() - session.created_at,
      chrono::Duration::hours(3)
    );
  }
}
