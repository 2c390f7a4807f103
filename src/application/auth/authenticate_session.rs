use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::context::OperationContext;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::SessionToken;

/// Response for a valid session
#[derive(Debug, Clone)]
pub struct AuthenticateSessionResponse {
  /// User the session was issued for
  pub user_id: Uuid,
}

/// Use case for resolving a presented session token
pub struct AuthenticateSessionUseCase {
  auth_service: Arc<AuthService>,
}

impl AuthenticateSessionUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// A token that could never have been issued is reported like an expired one.
  pub async fn execute(
    &self,
    ctx: &OperationContext,
    session_token: String,
  ) -> Result<AuthenticateSessionResponse, AuthError> {
    let token = SessionToken::from_string(session_token).map_err(|_| AuthError::InvalidSession)?;

    let user_id = self.auth_service.authenticate(ctx, &token).await?;

    Ok(AuthenticateSessionResponse {
      user_id: user_id.into_inner(),
    })
  }
}
