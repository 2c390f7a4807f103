use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;

use crate::domain::auth::errors::SecurityError;
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};

/// Memory cost: 19 MiB = 19456 KiB
pub const DEFAULT_MEMORY_KIB: u32 = 19456;
/// Time cost: 2 iterations
pub const DEFAULT_ITERATIONS: u32 = 2;
/// Parallelism: 1 lane
pub const DEFAULT_PARALLELISM: u32 = 1;

/// Argon2id password hasher implementation
///
/// Hashing and verification are CPU-bound, so both run on the blocking pool
/// instead of stalling the async workers. Verification reads its cost
/// parameters from the stored digest, so digests created under older settings
/// keep verifying after the configuration changes.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
  /// Creates a hasher with the default work factor
  pub fn new() -> Result<Self, SecurityError> {
    Self::with_params(DEFAULT_MEMORY_KIB, DEFAULT_ITERATIONS, DEFAULT_PARALLELISM)
  }

  /// Creates a hasher with an explicit work factor
  pub fn with_params(
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
  ) -> Result<Self, SecurityError> {
    let params = Params::new(memory_kib, iterations, parallelism, Some(32)).map_err(|e| {
      SecurityError::HashingFailed(format!("Failed to create Argon2 params: {}", e))
    })?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    Ok(Self { argon2 })
  }

  fn hash_blocking(argon2: &Argon2<'static>, password: &Password) -> Result<String, SecurityError> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);

    argon2
      .hash_password(password.as_bytes(), &salt)
      .map(|hash| hash.to_string())
      .map_err(|e| SecurityError::HashingFailed(e.to_string()))
  }

  fn verify_blocking(argon2: &Argon2<'static>, password: &Password, digest: &str) -> bool {
    // A digest that does not parse is reported exactly like a mismatch
    let Ok(parsed) = Argon2PasswordHash::new(digest) else {
      return false;
    };

    argon2.verify_password(password.as_bytes(), &parsed).is_ok()
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, SecurityError> {
    let argon2 = self.argon2.clone();
    let password = password.clone();

    let digest = tokio::task::spawn_blocking(move || Self::hash_blocking(&argon2, &password))
      .await
      .map_err(|e| SecurityError::HashingFailed(format!("Hashing task failed: {}", e)))??;

    Ok(PasswordHash::from_hash(digest))
  }

  async fn verify(&self, password: &Password, hashed_password: &PasswordHash) -> bool {
    let argon2 = self.argon2.clone();
    let password = password.clone();
    let digest = hashed_password.clone();

    match tokio::task::spawn_blocking(move || {
      Self::verify_blocking(&argon2, &password, digest.as_str())
    })
    .await
    {
      Ok(verified) => verified,
      Err(error) => {
        tracing::error!(error = %error, "Password verification task failed");
        false
      }
    }
  }
}
