use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use std::sync::Arc;

use crawlyzer_auth::{
  adapters::http::{
    AuthRouteDependencies, RequestIdMiddleware, configure_auth_routes, configure_system_routes,
    not_found_handler,
  },
  application::auth::{
    AuthenticateSessionUseCase, ListUsersUseCase, ListingPolicy, LoginUserUseCase,
    LogoutUserUseCase, RegisterUserUseCase,
  },
  domain::auth::services::{AuthService, AuthServiceConfig},
  infrastructure::{
    config::Config,
    metrics::AuthMetrics,
    persistence::{
      postgres::{PostgresUserRepository, connect_pool, run_migrations},
      redis::RedisSessionStore,
    },
    security::{Argon2PasswordHasher, SecureTokenGenerator},
    telemetry::{DEFAULT_FILTER, init_tracing},
  },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();
  init_tracing(DEFAULT_FILTER);

  tracing::info!("Starting crawlyzer auth service");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!(node_id = %config.server.node_id, "Configuration loaded");

  tracing::info!("Connecting to database");
  let db_pool = connect_pool(&config.database)
    .await
    .context("Could not connect to PostgreSQL")?;

  if config.database.run_migrations {
    run_migrations(&db_pool)
      .await
      .context("Failed to run database migrations")?;
    tracing::info!("Database migrations completed");
  }

  tracing::info!("Connecting to Redis");
  let session_store = RedisSessionStore::connect(&config.redis)
    .await
    .context("Could not connect to Redis")?;
  session_store
    .ping()
    .await
    .context("Redis did not answer PING")?;

  let user_repo = Arc::new(PostgresUserRepository::new(db_pool));
  user_repo
    .ping()
    .await
    .context("PostgreSQL did not answer")?;

  let password_hasher = Argon2PasswordHasher::with_params(
    config.security.argon2_memory_kib,
    config.security.argon2_iterations,
    config.security.argon2_parallelism,
  )
  .context("Invalid Argon2 parameters")?;

  let auth_service = Arc::new(AuthService::new(
    user_repo.clone(),
    Arc::new(session_store),
    Arc::new(password_hasher),
    Arc::new(SecureTokenGenerator::new()),
    AuthServiceConfig {
      session_ttl: config.security.session_ttl(),
    },
  ));
  auth_service.warm_up().await;

  let listing_policy = ListingPolicy {
    default_page_size: config.listing.default_page_size,
    max_page_size: config.listing.max_page_size,
  };

  let auth_routes = AuthRouteDependencies {
    register_use_case: Arc::new(RegisterUserUseCase::new(auth_service.clone())),
    login_use_case: Arc::new(LoginUserUseCase::new(auth_service.clone())),
    authenticate_use_case: Arc::new(AuthenticateSessionUseCase::new(auth_service.clone())),
    logout_use_case: Arc::new(LogoutUserUseCase::new(auth_service.clone())),
    list_users_use_case: Arc::new(ListUsersUseCase::new(auth_service, listing_policy)),
    metrics: AuthMetrics::new().context("Failed to register metrics")?,
    request_timeout: config.server.request_timeout(),
  };

  let node_id = config.server.node_id.clone();
  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    let metrics = auth_routes.metrics.clone();
    let auth_routes = auth_routes.clone();
    let node_id = node_id.clone();

    App::new()
      .wrap(Logger::default())
      .wrap(RequestIdMiddleware::new())
      .configure(move |cfg| configure_auth_routes(cfg, auth_routes))
      .configure(move |cfg| configure_system_routes(cfg, node_id, metrics))
      .default_service(web::to(not_found_handler))
  })
  .bind((server_host.as_str(), server_port))
  .with_context(|| format!("Failed to bind {}:{}", server_host, server_port))?
  .run()
  .await
  .context("HTTP server failed")?;

  tracing::info!("HTTP server stopped, closing database pool");
  user_repo.close().await;

  Ok(())
}
