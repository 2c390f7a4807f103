use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

use super::context::OperationContext;
use super::entities::{Session, User, UserSummary};
use super::errors::{AuthError, SecurityError, StorageError};
use super::ports::{PasswordHasher, SessionStore, TokenGenerator, UserRepository};
use super::value_objects::{Email, PageRequest, Password, PasswordHash, SessionToken, UserId};

/// Sessions live exactly this long after login and are never renewed.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3 * 60 * 60);

/// Verified against when the email is unknown, so both rejection paths cost
/// one Argon2 verification.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
  pub session_ttl: Duration,
}

impl Default for AuthServiceConfig {
  fn default() -> Self {
    Self {
      session_ttl: DEFAULT_SESSION_TTL,
    }
  }
}

/// Authentication service implementing core business logic
///
/// Holds only injected store handles and immutable configuration; every
/// operation is independent, so one instance can serve any number of
/// concurrent requests and several instances can share the same stores.
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  session_store: Arc<dyn SessionStore>,
  password_hasher: Arc<dyn PasswordHasher>,
  token_generator: Arc<dyn TokenGenerator>,
  config: AuthServiceConfig,
  decoy_hash: OnceCell<PasswordHash>,
}

impl AuthService {
  /// Creates a new instance of AuthService
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    session_store: Arc<dyn SessionStore>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_generator: Arc<dyn TokenGenerator>,
    config: AuthServiceConfig,
  ) -> Self {
    Self {
      user_repo,
      session_store,
      password_hasher,
      token_generator,
      config,
      decoy_hash: OnceCell::new(),
    }
  }

  pub fn session_ttl(&self) -> Duration {
    self.config.session_ttl
  }

  /// Prepares the decoy digest up front so the first unknown-email login is
  /// not slower than the rest.
  pub async fn warm_up(&self) {
    if let Err(error) = self.decoy_digest().await {
      tracing::warn!(error = %error, "Could not prepare decoy password digest");
    }
  }

  /// Registers a new account
  ///
  /// # Errors
  /// Returns `AuthError::DuplicateEmail` when the user store reports a
  /// uniqueness conflict on the email, `AuthError::Storage` otherwise.
  pub async fn register(
    &self,
    ctx: &OperationContext,
    email: Email,
    password: Password,
  ) -> Result<UserId, AuthError> {
    let password_hash = guarded(ctx, "register.hash", self.password_hasher.hash(&password)).await?;

    let user = User::new(email, password_hash);

    let created = ctx
      .run(self.user_repo.create(&user))
      .await
      .map_err(|interrupted| storage_failure("register.create", interrupted))?;

    match created {
      Ok(user_id) => {
        tracing::info!(user_id = %user_id, "User registered");
        Ok(user_id)
      }
      Err(error) if error.is_email_conflict() => {
        tracing::debug!("Registration rejected: email already exists");
        Err(AuthError::DuplicateEmail)
      }
      Err(error) => Err(storage_failure("register.create", error)),
    }
  }

  /// Verifies credentials and opens a new session
  ///
  /// Unknown email and wrong password both return the same
  /// `AuthError::InvalidCredentials`. The call only succeeds when the session
  /// was stored *and* the last-login timestamp was recorded.
  pub async fn login(
    &self,
    ctx: &OperationContext,
    email: Email,
    password: Password,
  ) -> Result<Session, AuthError> {
    let user = guarded(
      ctx,
      "login.find_by_email",
      self.user_repo.find_by_email(&email),
    )
    .await?;

    let Some(user) = user else {
      self.verify_against_decoy(ctx, &password).await?;
      tracing::debug!("Login rejected");
      return Err(AuthError::InvalidCredentials);
    };

    let verified = ctx
      .run(self.password_hasher.verify(&password, &user.password_hash))
      .await
      .map_err(|interrupted| storage_failure("login.verify", interrupted))?;

    if !verified {
      tracing::debug!(user_id = %user.id, "Login rejected");
      return Err(AuthError::InvalidCredentials);
    }

    let token = guarded(ctx, "login.generate_token", self.token_generator.generate()).await?;
    let session = Session::new(token, user.id, self.config.session_ttl);

    guarded(
      ctx,
      "login.create_session",
      self
        .session_store
        .create(&session.token, session.user_id, session.ttl),
    )
    .await?;

    let recorded = guarded(
      ctx,
      "login.update_last_login",
      self
        .user_repo
        .update_last_login(user.id, session.created_at),
    )
    .await;

    if let Err(error) = recorded {
      self.discard_session(&session.token).await;
      return Err(error);
    }

    tracing::info!(
      user_id = %user.id,
      token = session.token.fingerprint(),
      "Session created"
    );

    Ok(session)
  }

  /// Resolves a session token to the user it was issued for
  ///
  /// # Errors
  /// Returns `AuthError::InvalidSession` for unknown and expired tokens alike.
  pub async fn authenticate(
    &self,
    ctx: &OperationContext,
    token: &SessionToken,
  ) -> Result<UserId, AuthError> {
    guarded(ctx, "authenticate.get", self.session_store.get(token))
      .await?
      .ok_or(AuthError::InvalidSession)
  }

  /// Ends a session. Ending an unknown or already-ended session succeeds.
  pub async fn logout(
    &self,
    ctx: &OperationContext,
    token: &SessionToken,
  ) -> Result<(), AuthError> {
    guarded(ctx, "logout.delete", self.session_store.delete(token)).await?;
    tracing::info!(token = token.fingerprint(), "Session closed");
    Ok(())
  }

  /// Lists accounts without their password digests.
  ///
  /// `None` returns every account; a page request returns one window of
  /// the listing ordered by creation time.
  pub async fn list_users(
    &self,
    ctx: &OperationContext,
    page: Option<PageRequest>,
  ) -> Result<Vec<UserSummary>, AuthError> {
    let users = match page {
      Some(page) => guarded(ctx, "list_users.page", self.user_repo.list_page(page)).await?,
      None => guarded(ctx, "list_users.all", self.user_repo.list_all()).await?,
    };

    Ok(users.into_iter().map(UserSummary::from).collect())
  }

  async fn decoy_digest(&self) -> Result<&PasswordHash, SecurityError> {
    self
      .decoy_hash
      .get_or_try_init(|| async {
        let decoy = Password::new(DECOY_PASSWORD);
        self.password_hasher.hash(&decoy).await
      })
      .await
  }

  async fn verify_against_decoy(
    &self,
    ctx: &OperationContext,
    password: &Password,
  ) -> Result<(), AuthError> {
    match self.decoy_digest().await {
      Ok(decoy) => {
        ctx
          .run(self.password_hasher.verify(password, decoy))
          .await
          .map_err(|interrupted| storage_failure("login.verify", interrupted))?;
      }
      Err(error) => {
        tracing::warn!(error = %error, "Decoy digest unavailable, skipping timing equalization");
      }
    }
    Ok(())
  }

  /// Best-effort removal of a session written by a login that then failed.
  async fn discard_session(&self, token: &SessionToken) {
    if let Err(error) = self.session_store.delete(token).await {
      tracing::error!(
        token = token.fingerprint(),
        error = %error,
        "Failed to discard session of failed login; it will expire on its own"
      );
    }
  }
}

/// Logs the full cause where it happens and hands back the opaque error.
fn storage_failure(operation: &'static str, error: impl Into<StorageError>) -> AuthError {
  let error = error.into();
  tracing::error!(
    operation,
    kind = ?error.kind(),
    detail = %error.detail(),
    "Auth storage failure"
  );
  AuthError::Storage(error)
}

/// Runs a store call under the caller's context; every failure is a storage failure.
async fn guarded<T, E, F>(
  ctx: &OperationContext,
  operation: &'static str,
  future: F,
) -> Result<T, AuthError>
where
  F: Future<Output = Result<T, E>>,
  E: Into<StorageError>,
{
  match ctx.run(future).await {
    Ok(Ok(value)) => Ok(value),
    Ok(Err(error)) => Err(storage_failure(operation, error)),
    Err(interrupted) => Err(storage_failure(operation, interrupted)),
  }
}
