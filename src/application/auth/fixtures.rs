use std::sync::Arc;

use crate::domain::auth::services::{AuthService, AuthServiceConfig};
use crate::infrastructure::persistence::memory::{InMemorySessionStore, InMemoryUserRepository};
use crate::infrastructure::security::{Argon2PasswordHasher, SecureTokenGenerator};

/// Auth service over in-memory stores with a cheap work factor
pub(crate) fn auth_service() -> Arc<AuthService> {
  Arc::new(AuthService::new(
    Arc::new(InMemoryUserRepository::new()),
    Arc::new(InMemorySessionStore::new()),
    Arc::new(Argon2PasswordHasher::with_params(1024, 1, 1).unwrap()),
    Arc::new(SecureTokenGenerator::new()),
    AuthServiceConfig::default(),
  ))
}
