use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::auth::entities::UserSummary;

/// Request for user registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
  /// User's email address
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  /// User's password
  #[validate(length(
    min = 8,
    max = 128,
    message = "Password must be between 8 and 128 characters"
  ))]
  pub password: String,
}

/// Request for user login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
  /// User's email address
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  /// User's password. Anything no account could have is rejected early.
  #[validate(length(min = 8, max = 128, message = "Incorrect email or password"))]
  pub password: String,
}

/// Query string of `GET /list`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersParams {
  pub offset: Option<u64>,
  pub limit: Option<u32>,
}

/// Response after successful user registration
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
  /// Unique identifier of the newly created user
  pub user_id: Uuid,
}

/// Response after successful user login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
  /// Unique identifier of the user
  pub user_id: Uuid,

  /// Session token, presented later as `Authorization: Bearer <token>`
  pub token: String,

  /// Session expiration timestamp
  pub expires_at: DateTime<Utc>,

  /// Session lifetime in seconds
  pub expires_in: u64,
}

/// Response for a valid session
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticateResponse {
  pub user_id: Uuid,
}

/// One row of `GET /list`. Has no password field at all.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
  pub id: Uuid,
  pub email: String,
  pub created_at: DateTime<Utc>,
  pub last_login: Option<DateTime<Utc>>,
}

impl From<UserSummary> for UserResponse {
  fn from(summary: UserSummary) -> Self {
    Self {
      id: summary.id.into_inner(),
      email: summary.email,
      created_at: summary.created_at,
      last_login: summary.last_login,
    }
  }
}

/// Identity of the serving instance
#[derive(Debug, Clone, Serialize)]
pub struct NodeResponse {
  pub node_id: String,
}

/// Standard success response for operations without data
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
  /// Success message
  pub message: String,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional detailed error information
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}
