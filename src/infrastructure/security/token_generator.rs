use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;

use crate::domain::auth::errors::SecurityError;
use crate::domain::auth::ports::TokenGenerator;
use crate::domain::auth::value_objects::SessionToken;

/// 32 bytes = 256 bits of entropy per token
const TOKEN_BYTES: usize = 32;

/// Secure token generator using cryptographically secure random number generation
pub struct SecureTokenGenerator;

impl SecureTokenGenerator {
  /// Creates a new instance of SecureTokenGenerator
  pub fn new() -> Self {
    Self
  }
}

impl Default for SecureTokenGenerator {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl TokenGenerator for SecureTokenGenerator {
  /// Draws 32 bytes from the OS RNG and encodes them as unpadded base64url,
  /// which is safe in headers and as a cache key suffix.
  ///
  /// # Errors
  /// Returns `SecurityError::EntropyUnavailable` if the OS RNG fails.
  async fn generate(&self) -> Result<SessionToken, SecurityError> {
    let mut token_bytes = [0u8; TOKEN_BYTES];

    rand::rngs::OsRng
      .try_fill_bytes(&mut token_bytes)
      .map_err(|e| SecurityError::EntropyUnavailable(e.to_string()))?;

    Ok(SessionToken::generated(URL_SAFE_NO_PAD.encode(token_bytes)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[tokio::test]
  async fn test_generate_creates_unique_tokens() {
    let generator = SecureTokenGenerator::new();
    let mut seen = HashSet::new();

    for _ in 0..100 {
      let token = generator.generate().await.unwrap();
      assert!(seen.insert(token.into_inner()));
    }
  }

  #[tokio::test]
  async fn test_generate_creates_expected_length_token() {
    let token = SecureTokenGenerator::new().generate().await.unwrap();

    // 32 bytes encoded in base64url without padding should be 43 characters
    assert_eq!(token.as_str().len(), 43);
  }

  #[tokio::test]
  async fn test_generated_token_parses_as_client_token() {
    let token = SecureTokenGenerator::new().generate().await.unwrap();

    let parsed = SessionToken::from_string(token.as_str()).unwrap();
    assert_eq!(parsed, token);
  }
}
