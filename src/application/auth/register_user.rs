use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::context::OperationContext;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, Password};

/// Command for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
  /// User's email address, already format-checked by the caller
  pub email: String,
  /// User's password (plain text, will be hashed)
  pub password: String,
}

/// Response after successful user registration
#[derive(Debug, Clone)]
pub struct RegisterUserResponse {
  /// Unique identifier of the newly created user
  pub user_id: Uuid,
}

/// Use case for registering a new user
pub struct RegisterUserUseCase {
  auth_service: Arc<AuthService>,
}

impl RegisterUserUseCase {
  /// Creates a new instance of RegisterUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user registration use case
  ///
  /// # Errors
  /// Returns `AuthError::DuplicateEmail` if the address is taken,
  /// `AuthError::Storage` on any backing failure.
  pub async fn execute(
    &self,
    ctx: &OperationContext,
    command: RegisterUserCommand,
  ) -> Result<RegisterUserResponse, AuthError> {
    let email = Email::new(command.email);
    let password = Password::new(command.password);

    let user_id = self.auth_service.register(ctx, email, password).await?;

    Ok(RegisterUserResponse {
      user_id: user_id.into_inner(),
    })
  }
}
