use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::context::OperationContext;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, Password};

/// Command for logging in a user
#[derive(Debug, Clone)]
pub struct LoginUserCommand {
  /// User's email address
  pub email: String,
  /// User's password (plain text)
  pub password: String,
}

/// Response after successful user login
#[derive(Debug, Clone)]
pub struct LoginUserResponse {
  /// Unique identifier of the user
  pub user_id: Uuid,
  /// Session token for authentication
  pub session_token: String,
  /// Session expiration timestamp
  pub expires_at: DateTime<Utc>,
  /// Session lifetime in seconds
  pub expires_in: u64,
}

/// Use case for logging in a user
pub struct LoginUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LoginUserUseCase {
  /// Creates a new instance of LoginUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user login use case
  ///
  /// # Errors
  /// Returns `AuthError::InvalidCredentials` for an unknown email or a wrong
  /// password, without saying which.
  pub async fn execute(
    &self,
    ctx: &OperationContext,
    command: LoginUserCommand,
  ) -> Result<LoginUserResponse, AuthError> {
    let email = Email::new(command.email);
    let password = Password::new(command.password);

    let session = self.auth_service.login(ctx, email, password).await?;
    let expires_at = session.expires_at();

    Ok(LoginUserResponse {
      user_id: session.user_id.into_inner(),
      expires_in: session.ttl.as_secs(),
      expires_at,
      session_token: session.token.into_inner(),
    })
  }
}
