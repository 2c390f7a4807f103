use actix_web::{
  error::{JsonPayloadError, QueryPayloadError},
  web,
};
use std::sync::Arc;
use std::time::Duration;

use crate::application::auth::{
  AuthenticateSessionUseCase, ListUsersUseCase, LoginUserUseCase, LogoutUserUseCase,
  RegisterUserUseCase,
};
use crate::infrastructure::metrics::AuthMetrics;

use super::errors::ApiError;
use super::handlers::auth::{
  AuthHandlerState, authenticate_handler, list_users_handler, login_handler, logout_handler,
  register_handler,
};
use super::handlers::system::{NodeIdentity, metrics_handler, node_handler};

/// Everything the auth routes need from the composition root
#[derive(Clone)]
pub struct AuthRouteDependencies {
  pub register_use_case: Arc<RegisterUserUseCase>,
  pub login_use_case: Arc<LoginUserUseCase>,
  pub authenticate_use_case: Arc<AuthenticateSessionUseCase>,
  pub logout_use_case: Arc<LogoutUserUseCase>,
  pub list_users_use_case: Arc<ListUsersUseCase>,
  pub metrics: AuthMetrics,
  /// Deadline for each auth operation; `None` waits on the stores indefinitely
  pub request_timeout: Option<Duration>,
}

/// Configure authentication routes
///
/// # Routes
///
/// - POST /register - Create an account
/// - POST /login - Verify credentials and open a session
/// - POST /auth - Resolve a bearer token to its user
/// - POST /logout - End the session of a bearer token
/// - GET /list - List accounts, optionally paginated
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig, deps: AuthRouteDependencies) {
  let state = AuthHandlerState {
    metrics: deps.metrics,
    request_timeout: deps.request_timeout,
  };

  cfg
    .app_data(json_config())
    .app_data(query_config())
    .app_data(web::Data::new(state))
    .app_data(web::Data::new(deps.register_use_case))
    .app_data(web::Data::new(deps.login_use_case))
    .app_data(web::Data::new(deps.authenticate_use_case))
    .app_data(web::Data::new(deps.logout_use_case))
    .app_data(web::Data::new(deps.list_users_use_case))
    .route("/register", web::post().to(register_handler))
    .route("/login", web::post().to(login_handler))
    .route("/auth", web::post().to(authenticate_handler))
    .route("/logout", web::post().to(logout_handler))
    .route("/list", web::get().to(list_users_handler));
}

/// Configure instance and observability routes
///
/// - GET /node - Which instance answered
/// - GET /metrics - Prometheus scrape endpoint
pub fn configure_system_routes(
  cfg: &mut web::ServiceConfig,
  node_id: String,
  metrics: AuthMetrics,
) {
  cfg
    .app_data(web::Data::new(NodeIdentity(node_id)))
    .app_data(web::Data::new(metrics))
    .route("/node", web::get().to(node_handler))
    .route("/metrics", web::get().to(metrics_handler));
}

/// Malformed JSON bodies get the regular error envelope
fn json_config() -> web::JsonConfig {
  web::JsonConfig::default()
    .limit(16 * 1024)
    .error_handler(|err: JsonPayloadError, _req| {
      ApiError::Validation(format!("Invalid request body: {}", err)).into()
    })
}

fn query_config() -> web::QueryConfig {
  web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req| {
    ApiError::Validation(format!("Invalid query string: {}", err)).into()
  })
}
