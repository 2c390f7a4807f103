use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::domain::auth::{
  errors::RepositoryError,
  ports::SessionStore,
  value_objects::{SessionToken, UserId},
};

/// In-memory implementation of the SessionStore trait
///
/// Expiry is measured on the tokio clock so tests can pause and advance it.
/// Expired entries are treated as absent and evicted on the next touch.
#[derive(Default)]
pub struct InMemorySessionStore {
  entries: Mutex<HashMap<String, (UserId, Instant)>>,
}

impl InMemorySessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of live sessions
  pub async fn len(&self) -> usize {
    let now = Instant::now();
    let mut entries = self.entries.lock().await;
    entries.retain(|_, (_, expires_at)| *expires_at > now);
    entries.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.len().await == 0
  }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
  async fn create(
    &self,
    token: &SessionToken,
    user_id: UserId,
    ttl: Duration,
  ) -> Result<(), RepositoryError> {
    let now = Instant::now();
    let mut entries = self.entries.lock().await;

    if let Some((_, expires_at)) = entries.get(token.as_str()) {
      if *expires_at > now {
        return Err(RepositoryError::Collision);
      }
    }

    entries.insert(token.as_str().to_string(), (user_id, now + ttl));
    Ok(())
  }

  async fn get(&self, token: &SessionToken) -> Result<Option<UserId>, RepositoryError> {
    let now = Instant::now();
    let mut entries = self.entries.lock().await;

    match entries.get(token.as_str()) {
      Some((user_id, expires_at)) if *expires_at > now => Ok(Some(*user_id)),
      Some(_) => {
        entries.remove(token.as_str());
        Ok(None)
      }
      None => Ok(None),
    }
  }

  async fn delete(&self, token: &SessionToken) -> Result<(), RepositoryError> {
    self.entries.lock().await.remove(token.as_str());
    Ok(())
  }
}
