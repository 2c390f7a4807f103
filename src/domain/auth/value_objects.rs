use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueObjectError {
  #[error("Invalid token format")]
  InvalidToken,
}

// ============================================================================
// Email Value Object
// ============================================================================

/// Account email address.
///
/// Format checks belong to the request layer; the value is stored exactly as
/// given (minus surrounding whitespace) so uniqueness is decided by storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  pub fn new(email: impl Into<String>) -> Self {
    Self(email.into().trim().to_string())
  }

  /// Returns the email as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for Email {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

/// Raw password as typed by the user. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
  pub fn new(password: impl Into<String>) -> Self {
    Self(password.into())
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn as_bytes(&self) -> &[u8] {
    self.0.as_bytes()
  }
}

impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

impl fmt::Display for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("***")
  }
}

// ============================================================================
// PasswordHash Value Object (PHC-formatted digest)
// ============================================================================

/// Salted password digest in PHC string format.
///
/// Deliberately not `Serialize`: the digest has no business outside the
/// process, and `Debug` is redacted so it never lands in logs either. The
/// string is not parsed here; a malformed digest simply fails verification.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
  pub fn from_hash(hash: impl Into<String>) -> Self {
    Self(hash.into())
  }

  /// Returns the hash as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Debug for PasswordHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("PasswordHash(***)")
  }
}

// ============================================================================
// SessionToken Value Object
// ============================================================================

/// Opaque bearer token identifying a live session.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
  const MAX_LENGTH: usize = 256;
  const FINGERPRINT_LENGTH: usize = 8;

  /// Wraps a freshly generated token. Only token generators should call this.
  pub fn generated(token: String) -> Self {
    Self(token)
  }

  /// Parses a token presented by a client.
  ///
  /// Accepts the URL-safe alphabet only so that arbitrary client input can
  /// never reshape the cache key it is appended to.
  pub fn from_string(token: impl Into<String>) -> Result<Self, ValueObjectError> {
    let token = token.into();

    if token.is_empty() || token.len() > Self::MAX_LENGTH {
      return Err(ValueObjectError::InvalidToken);
    }

    if !token
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
      return Err(ValueObjectError::InvalidToken);
    }

    Ok(Self(token))
  }

  /// Short prefix safe to put in logs
  pub fn fingerprint(&self) -> &str {
    let end = self.0.len().min(Self::FINGERPRINT_LENGTH);
    &self.0[..end]
  }

  /// Returns the token as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Debug for SessionToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "SessionToken({}***)", self.fingerprint())
  }
}

impl fmt::Display for SessionToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("***")
  }
}

// ============================================================================
// UserId Value Object
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
  /// Creates a new random UserId
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }

  /// Creates a UserId from an existing UUID
  pub fn from_uuid(uuid: Uuid) -> Self {
    Self(uuid)
  }

  /// Parses the textual form stored in the session cache
  pub fn parse(value: &str) -> Option<Self> {
    Uuid::parse_str(value)
      .ok()
      .filter(|uuid| !uuid.is_nil())
      .map(Self)
  }

  /// Returns the inner UUID
  pub fn into_inner(self) -> Uuid {
    self.0
  }

  /// Returns a reference to the inner UUID
  pub fn as_uuid(&self) -> &Uuid {
    &self.0
  }
}

impl Default for UserId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<Uuid> for UserId {
  fn from(uuid: Uuid) -> Self {
    Self(uuid)
  }
}

impl From<UserId> for Uuid {
  fn from(user_id: UserId) -> Self {
    user_id.0
  }
}

// ============================================================================
// PageRequest Value Object
// ============================================================================

/// Window into the account listing, ordered by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub offset: u64,
  pub limit: u32,
}

impl PageRequest {
  pub fn new(offset: u64, limit: u32) -> Self {
    Self { offset, limit }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_email_is_trimmed_but_not_rewritten() {
    let email = Email::new("  Alice@Example.com ");
    assert_eq!(email.as_str(), "Alice@Example.com");
  }

  #[test]
  fn test_password_debug_is_redacted() {
    let password = Password::new("hunter22hunter22");
    assert_eq!(format!("{:?}", password), "Password(***)");
    assert_eq!(password.to_string(), "***");
  }

  #[test]
  fn test_password_hash_debug_is_redacted() {
    let hash = PasswordHash::from_hash("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA");
    assert_eq!(format!("{:?}", hash), "PasswordHash(***)");
  }

  #[test]
  fn test_session_token_parsing() {
    assert!(SessionToken::from_string("abcDEF123-_").is_ok());
    assert!(SessionToken::from_string("0f8fad5b-d9cb-469f-a165-70867728950e").is_ok());

    assert_eq!(
      SessionToken::from_string(""),
      Err(ValueObjectError::InvalidToken)
    );
    assert_eq!(
      SessionToken::from_string("has space"),
      Err(ValueObjectError::InvalidToken)
    );
    assert_eq!(
      SessionToken::from_string("user:session:other"),
      Err(ValueObjectError::InvalidToken)
    );
    assert_eq!(
      SessionToken::from_string("a".repeat(257)),
      Err(ValueObjectError::InvalidToken)
    );
  }

  #[test]
  fn test_session_token_never_prints_in_full() {
    let token = SessionToken::from_string("abcdefghijklmnopqrstuvwxyz").unwrap();
    assert_eq!(token.fingerprint(), "abcdefgh");
    assert_eq!(format!("{:?}", token), "SessionToken(abcdefgh***)");
    assert_eq!(token.to_string(), "***");
  }

  #[test]
  fn test_user_id_parse() {
    let id = UserId::new();
    assert_eq!(UserId::parse(&id.to_string()), Some(id));
    assert_eq!(UserId::parse("not-a-uuid"), None);
    assert_eq!(UserId::parse(&Uuid::nil().to_string()), None);
  }
}
