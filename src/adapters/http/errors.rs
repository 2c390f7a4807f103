use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::auth::errors::AuthError;

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Validation error (400 Bad Request)
  Validation(String),

  /// Authentication error (401 Unauthorized or 409 Conflict)
  Auth(AuthErrorKind),

  /// Route does not exist (404 Not Found)
  NotFound(String),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthErrorKind {
  /// Invalid credentials (401)
  InvalidCredentials,

  /// Session expired or invalid (401)
  InvalidSession,

  /// Missing or malformed bearer header (401)
  InvalidToken,

  /// Email already exists (409)
  DuplicateEmail,
}

impl ApiError {
  /// Stable machine-readable code, also used as the metrics outcome label
  pub fn code(&self) -> &'static str {
    match self {
      ApiError::Validation(_) => "validation_error",
      ApiError::Auth(AuthErrorKind::InvalidCredentials) => "invalid_credentials",
      ApiError::Auth(AuthErrorKind::InvalidSession) => "invalid_session",
      ApiError::Auth(AuthErrorKind::InvalidToken) => "invalid_token",
      ApiError::Auth(AuthErrorKind::DuplicateEmail) => "duplicate_email",
      ApiError::NotFound(_) => "not_found",
      ApiError::Internal(_) => "internal_error",
    }
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::NotFound(path) => write!(f, "Not found: {}", path),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthErrorKind::InvalidSession => StatusCode::UNAUTHORIZED,
        AuthErrorKind::InvalidToken => StatusCode::UNAUTHORIZED,
        AuthErrorKind::DuplicateEmail => StatusCode::CONFLICT,
      },
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let message = match self {
      ApiError::Validation(msg) => msg.clone(),
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => "Incorrect email or password".to_string(),
        AuthErrorKind::InvalidSession => "Incorrect or expired session".to_string(),
        AuthErrorKind::InvalidToken => "Invalid or missing authorization token".to_string(),
        AuthErrorKind::DuplicateEmail => "User already exists".to_string(),
      },
      ApiError::NotFound(path) => format!("No route for {}", path),
      ApiError::Internal(msg) => {
        // The failing operation already logged the cause at error level
        tracing::debug!("Internal error: {}", msg);
        "An internal server error occurred".to_string()
      }
    };

    let error_response = ErrorResponse {
      error: self.code().to_string(),
      message,
      details: None,
    };

    HttpResponse::build(self.status_code())
      .content_type(ContentType::json())
      .json(error_response)
  }
}

/// Convert AuthError to ApiError
impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::DuplicateEmail => ApiError::Auth(AuthErrorKind::DuplicateEmail),
      AuthError::InvalidCredentials => ApiError::Auth(AuthErrorKind::InvalidCredentials),
      AuthError::InvalidSession => ApiError::Auth(AuthErrorKind::InvalidSession),
      AuthError::Storage(err) => ApiError::Internal(format!("storage failure ({:?})", err.kind())),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::errors::{RepositoryError, StorageError};

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::Validation("test".to_string()).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::InvalidCredentials).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::InvalidSession).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::DuplicateEmail).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::NotFound("/nope".to_string()).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_auth_error_conversion() {
    let api_error: ApiError = AuthError::InvalidCredentials.into();
    assert_eq!(api_error.code(), "invalid_credentials");

    let api_error: ApiError = AuthError::DuplicateEmail.into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError = AuthError::InvalidSession.into();
    assert_eq!(api_error.code(), "invalid_session");
  }

  #[actix_web::test]
  async fn test_storage_error_body_is_opaque() {
    let storage: StorageError =
      RepositoryError::ConnectionFailed("postgres://admin:hunter2@db".to_string()).into();
    let api_error: ApiError = AuthError::Storage(storage).into();

    let response = api_error.error_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = actix_web::body::to_bytes(response.into_body())
      .await
      .unwrap();
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.contains("internal_error"));
    assert!(!text.contains("hunter2"));
    assert!(!text.contains("postgres"));
  }
}
