use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

use crate::adapters::http::{
  dtos::{
    AuthenticateResponse, ListUsersParams, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, SuccessResponse, UserResponse,
  },
  errors::{ApiError, AuthErrorKind},
};
use crate::application::auth::{
  AuthenticateSessionUseCase, ListUsersQuery, ListUsersUseCase, LoginUserCommand,
  LoginUserUseCase, LogoutUserUseCase, RegisterUserCommand, RegisterUserUseCase,
};
use crate::domain::auth::context::OperationContext;
use crate::infrastructure::metrics::{AuthMetrics, OUTCOME_OK};

/// Shared by every auth handler: the per-request deadline and the counters
#[derive(Clone)]
pub struct AuthHandlerState {
  pub metrics: AuthMetrics,
  pub request_timeout: Option<Duration>,
}

impl AuthHandlerState {
  fn context(&self) -> OperationContext {
    match self.request_timeout {
      Some(timeout) => OperationContext::background().with_timeout(timeout),
      None => OperationContext::background(),
    }
  }

  fn record<T>(&self, operation: &str, result: &Result<T, ApiError>) {
    let outcome = match result {
      Ok(_) => OUTCOME_OK,
      Err(error) => error.code(),
    };
    self.metrics.record(operation, outcome);
  }
}

/// Extract session token from Authorization header
fn extract_session_token(req: &HttpRequest) -> Result<String, ApiError> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
    .ok_or(ApiError::Auth(AuthErrorKind::InvalidToken))
}

/// Handler for user registration
///
/// POST /register
/// Body: RegisterRequest (JSON)
/// Response: RegisterResponse (JSON) with status 201
pub async fn register_handler(
  request: web::Json<RegisterRequest>,
  use_case: web::Data<Arc<RegisterUserUseCase>>,
  state: web::Data<AuthHandlerState>,
) -> Result<HttpResponse, ApiError> {
  let result = register(request.into_inner(), &use_case, &state).await;
  state.record("register", &result);
  result
}

async fn register(
  request: RegisterRequest,
  use_case: &RegisterUserUseCase,
  state: &AuthHandlerState,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = RegisterUserCommand {
    email: request.email,
    password: request.password,
  };

  let response = use_case.execute(&state.context(), command).await?;

  Ok(HttpResponse::Created().json(RegisterResponse {
    user_id: response.user_id,
  }))
}

/// Handler for user login
///
/// POST /login
/// Body: LoginRequest (JSON)
/// Response: LoginResponse (JSON) with status 200
pub async fn login_handler(
  request: web::Json<LoginRequest>,
  use_case: web::Data<Arc<LoginUserUseCase>>,
  state: web::Data<AuthHandlerState>,
) -> Result<HttpResponse, ApiError> {
  let result = login(request.into_inner(), &use_case, &state).await;
  state.record("login", &result);
  result
}

async fn login(
  request: LoginRequest,
  use_case: &LoginUserUseCase,
  state: &AuthHandlerState,
) -> Result<HttpResponse, ApiError> {
  // Input no account could match gets the ordinary rejection
  request
    .validate()
    .map_err(|_| ApiError::Auth(AuthErrorKind::InvalidCredentials))?;

  let command = LoginUserCommand {
    email: request.email,
    password: request.password,
  };

  let response = use_case.execute(&state.context(), command).await?;

  Ok(HttpResponse::Ok().json(LoginResponse {
    user_id: response.user_id,
    token: response.session_token,
    expires_at: response.expires_at,
    expires_in: response.expires_in,
  }))
}

/// Handler for session validation
///
/// POST /auth
/// Headers: Authorization: Bearer <token>
/// Response: AuthenticateResponse (JSON) with status 200
pub async fn authenticate_handler(
  use_case: web::Data<Arc<AuthenticateSessionUseCase>>,
  state: web::Data<AuthHandlerState>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let result = authenticate(&http_req, &use_case, &state).await;
  state.record("authenticate", &result);
  result
}

async fn authenticate(
  http_req: &HttpRequest,
  use_case: &AuthenticateSessionUseCase,
  state: &AuthHandlerState,
) -> Result<HttpResponse, ApiError> {
  let session_token = extract_session_token(http_req)?;
  let response = use_case.execute(&state.context(), session_token).await?;

  Ok(HttpResponse::Ok().json(AuthenticateResponse {
    user_id: response.user_id,
  }))
}

/// Handler for user logout
///
/// POST /logout
/// Headers: Authorization: Bearer <token>
/// Response: SuccessResponse (JSON) with status 200
pub async fn logout_handler(
  use_case: web::Data<Arc<LogoutUserUseCase>>,
  state: web::Data<AuthHandlerState>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let result = logout(&http_req, &use_case, &state).await;
  state.record("logout", &result);
  result
}

async fn logout(
  http_req: &HttpRequest,
  use_case: &LogoutUserUseCase,
  state: &AuthHandlerState,
) -> Result<HttpResponse, ApiError> {
  let session_token = extract_session_token(http_req)?;
  use_case.execute(&state.context(), session_token).await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Successfully logged out".to_string(),
  }))
}

/// Handler for the account listing
///
/// GET /list?offset=&limit=
/// Response: array of UserResponse (JSON) with status 200
pub async fn list_users_handler(
  params: web::Query<ListUsersParams>,
  use_case: web::Data<Arc<ListUsersUseCase>>,
  state: web::Data<AuthHandlerState>,
) -> Result<HttpResponse, ApiError> {
  let query = ListUsersQuery {
    offset: params.offset,
    limit: params.limit,
  };

  let result = use_case
    .execute(&state.context(), query)
    .await
    .map(|users| {
      let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
      HttpResponse::Ok().json(users)
    })
    .map_err(ApiError::from);

  state.record("list", &result);
  result
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[test]
  fn test_extract_session_token_valid() {
    let req = TestRequest::default()
      .insert_header(("Authorization", "Bearer test_token_123"))
      .to_http_request();

    let token = extract_session_token(&req).unwrap();
    assert_eq!(token, "test_token_123");
  }

  #[test]
  fn test_extract_session_token_missing() {
    let req = TestRequest::default().to_http_request();

    let result = extract_session_token(&req);
    assert!(matches!(
      result,
      Err(ApiError::Auth(AuthErrorKind::InvalidToken))
    ));
  }

  #[test]
  fn test_extract_session_token_invalid_format() {
    for header in ["InvalidFormat token", "Bearer ", "Bearer    "] {
      let req = TestRequest::default()
        .insert_header(("Authorization", header))
        .to_http_request();

      assert!(extract_session_token(&req).is_err(), "header {:?}", header);
    }
  }

  #[test]
  fn test_context_carries_configured_deadline() {
    let state = AuthHandlerState {
      metrics: AuthMetrics::new().unwrap(),
      request_timeout: Some(Duration::from_secs(5)),
    };
    assert!(state.context().deadline().is_some());

    let state = AuthHandlerState {
      request_timeout: None,
      ..state
    };
    assert!(state.context().deadline().is_none());
  }
}
