use std::sync::Arc;

use crate::domain::auth::context::OperationContext;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::SessionToken;

/// Use case for logging out a user
pub struct LogoutUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LogoutUserUseCase {
  /// Creates a new instance of LogoutUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Ends the session. Unknown, expired and malformed tokens all succeed.
  ///
  /// # Errors
  /// Only `AuthError::Storage`, when the session store cannot be reached.
  pub async fn execute(
    &self,
    ctx: &OperationContext,
    session_token: String,
  ) -> Result<(), AuthError> {
    let Ok(token) = SessionToken::from_string(session_token) else {
      return Ok(());
    };

    self.auth_service.logout(ctx, &token).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::auth::fixtures;
  use crate::application::auth::{
    AuthenticateSessionUseCase, LoginUserCommand, LoginUserUseCase, RegisterUserCommand,
    RegisterUserUseCase,
  };

  #[tokio::test]
  async fn test_logout_ends_session_and_is_idempotent() {
    let service = fixtures::auth_service();
    let ctx = OperationContext::background();

    RegisterUserUseCase::new(service.clone())
      .execute(
        &ctx,
        RegisterUserCommand {
          email: "bye@example.com".to_string(),
          password: "password123".to_string(),
        },
      )
      .await
      .unwrap();
    let login = LoginUserUseCase::new(service.clone())
      .execute(
        &ctx,
        LoginUserCommand {
          email: "bye@example.com".to_string(),
          password: "password123".to_string(),
        },
      )
      .await
      .unwrap();

    let logout = LogoutUserUseCase::new(service.clone());
    let authenticate = AuthenticateSessionUseCase::new(service);

    logout
      .execute(&ctx, login.session_token.clone())
      .await
      .unwrap();
    logout
      .execute(&ctx, login.session_token.clone())
      .await
      .unwrap();

    assert!(matches!(
      authenticate.execute(&ctx, login.session_token).await,
      Err(AuthError::InvalidSession)
    ));
  }

  #[tokio::test]
  async fn test_logout_with_malformed_token_succeeds() {
    let logout = LogoutUserUseCase::new(fixtures::auth_service());
    let ctx = OperationContext::background();

    assert!(logout.execute(&ctx, String::new()).await.is_ok());
    assert!(logout.execute(&ctx, "not a token".to_string()).await.is_ok());
  }
}
