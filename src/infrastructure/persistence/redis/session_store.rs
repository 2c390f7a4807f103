use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

use crate::domain::auth::{
  errors::RepositoryError,
  ports::SessionStore,
  value_objects::{SessionToken, UserId},
};
use crate::infrastructure::config::RedisConfig;

/// Namespace shared by every instance pointed at the same Redis
pub const DEFAULT_KEY_PREFIX: &str = "user:session:";

/// Redis implementation of the SessionStore trait
///
/// Each session is a single string key `{prefix}{token}` holding the user id.
/// Expiry is delegated to Redis (`PX`), so validity is whatever Redis says it is.
#[derive(Clone)]
pub struct RedisSessionStore {
  conn: ConnectionManager,
  key_prefix: String,
}

impl RedisSessionStore {
  pub fn new(conn: ConnectionManager, key_prefix: impl Into<String>) -> Self {
    Self {
      conn,
      key_prefix: key_prefix.into(),
    }
  }

  /// Opens a managed connection, giving up after `connect_timeout_seconds`
  pub async fn connect(config: &RedisConfig) -> Result<Self, RepositoryError> {
    let client = redis::Client::open(config.url.as_str())
      .map_err(|e| RepositoryError::ConnectionFailed(format!("Invalid Redis URL: {}", e)))?;

    let conn = tokio::time::timeout(
      Duration::from_secs(config.connect_timeout_seconds),
      client.get_connection_manager(),
    )
    .await
    .map_err(|_| {
      RepositoryError::ConnectionFailed(format!(
        "Redis connection timed out after {} seconds",
        config.connect_timeout_seconds
      ))
    })?
    .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

    Ok(Self::new(conn, config.key_prefix.clone()))
  }

  pub async fn ping(&self) -> Result<(), RepositoryError> {
    let mut conn = self.conn.clone();
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;
    Ok(())
  }

  fn key(&self, token: &SessionToken) -> String {
    format!("{}{}", self.key_prefix, token.as_str())
  }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
  async fn create(
    &self,
    token: &SessionToken,
    user_id: UserId,
    ttl: Duration,
  ) -> Result<(), RepositoryError> {
    let mut conn = self.conn.clone();
    let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);

    // SET .. NX replies nil when the key is already taken
    let reply: Option<String> = redis::cmd("SET")
      .arg(self.key(token))
      .arg(user_id.to_string())
      .arg("NX")
      .arg("PX")
      .arg(ttl_ms)
      .query_async(&mut conn)
      .await?;

    match reply {
      Some(_) => Ok(()),
      None => Err(RepositoryError::Collision),
    }
  }

  async fn get(&self, token: &SessionToken) -> Result<Option<UserId>, RepositoryError> {
    let mut conn = self.conn.clone();
    let value: Option<String> = conn.get(self.key(token)).await?;

    Ok(value.and_then(|raw| {
      let user_id = UserId::parse(&raw);
      if user_id.is_none() {
        tracing::warn!(
          token = token.fingerprint(),
          "Session entry does not hold a user id, treating as absent"
        );
      }
      user_id
    }))
  }

  async fn delete(&self, token: &SessionToken) -> Result<(), RepositoryError> {
    let mut conn = self.conn.clone();
    let _: i64 = conn.del(self.key(token)).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use testcontainers_modules::redis::{REDIS_PORT, Redis};
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};

  async fn setup_test_redis() -> (RedisSessionStore, ContainerAsync<Redis>) {
    let container = Redis::default()
      .start()
      .await
      .expect("Failed to start redis container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
      .get_host_port_ipv4(REDIS_PORT)
      .await
      .expect("Failed to get port");

    let config = RedisConfig {
      url: format!("redis://{}:{}", host, port),
      connect_timeout_seconds: 5,
      key_prefix: DEFAULT_KEY_PREFIX.to_string(),
    };

    let store = RedisSessionStore::connect(&config)
      .await
      .expect("Failed to connect to test redis");

    (store, container)
  }

  fn token(value: &str) -> SessionToken {
    SessionToken::from_string(value).unwrap()
  }

  #[tokio::test]
  async fn test_create_get_delete() {
    let (store, _container) = setup_test_redis().await;
    store.ping().await.unwrap();

    let user_id = UserId::new();
    store
      .create(&token("tok-1"), user_id, Duration::from_secs(60))
      .await
      .unwrap();

    assert_eq!(store.get(&token("tok-1")).await.unwrap(), Some(user_id));

    store.delete(&token("tok-1")).await.unwrap();
    assert_eq!(store.get(&token("tok-1")).await.unwrap(), None);

    // Deleting an absent key is not an error
    store.delete(&token("tok-1")).await.unwrap();
  }

  #[tokio::test]
  async fn test_set_if_absent() {
    let (store, _container) = setup_test_redis().await;
    let owner = UserId::new();

    store
      .create(&token("tok-2"), owner, Duration::from_secs(60))
      .await
      .unwrap();

    let second = store
      .create(&token("tok-2"), UserId::new(), Duration::from_secs(60))
      .await;
    assert!(matches!(second, Err(RepositoryError::Collision)));
    assert_eq!(store.get(&token("tok-2")).await.unwrap(), Some(owner));
  }

  #[tokio::test]
  async fn test_key_layout_and_ttl() {
    let (store, _container) = setup_test_redis().await;
    let user_id = UserId::new();

    store
      .create(&token("tok-3"), user_id, Duration::from_secs(3 * 60 * 60))
      .await
      .unwrap();

    let mut conn = store.conn.clone();
    let raw: String = conn.get("user:session:tok-3").await.unwrap();
    assert_eq!(raw, user_id.to_string());

    let ttl: i64 = conn.pttl("user:session:tok-3").await.unwrap();
    assert!(ttl > 0 && ttl <= 3 * 60 * 60 * 1000);
  }

  #[tokio::test]
  async fn test_entry_expires() {
    let (store, _container) = setup_test_redis().await;

    store
      .create(&token("tok-4"), UserId::new(), Duration::from_millis(200))
      .await
      .unwrap();

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(store.get(&token("tok-4")).await.unwrap(), None);
  }

  #[tokio::test]
  async fn test_garbage_value_reads_as_absent() {
    let (store, _container) = setup_test_redis().await;

    let mut conn = store.conn.clone();
    let _: () = conn.set("user:session:tok-5", "not-a-uuid").await.unwrap();

    assert_eq!(store.get(&token("tok-5")).await.unwrap(), None);
  }
}
