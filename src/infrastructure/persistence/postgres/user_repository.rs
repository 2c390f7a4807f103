use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::{
  entities::User,
  errors::RepositoryError,
  ports::UserRepository,
  value_objects::{Email, PageRequest, PasswordHash, UserId},
};

/// PostgreSQL implementation of the UserRepository trait
#[derive(Clone)]
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  /// Creates a new instance of PostgresUserRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Round trip to the database, for readiness checks
  pub async fn ping(&self) -> Result<(), RepositoryError> {
    sqlx::query("SELECT 1").execute(&self.pool).await?;
    Ok(())
  }

  /// Closes the pool; outstanding connections are awaited
  pub async fn close(&self) {
    self.pool.close().await;
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  email: String,
  password_hash: String,
  created_at: DateTime<Utc>,
  last_login: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User::from_db(
      UserId::from_uuid(row.id),
      row.email,
      PasswordHash::from_hash(row.password_hash),
      row.created_at,
      row.last_login,
    )
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: &User) -> Result<UserId, RepositoryError> {
    let id: Uuid = sqlx::query_scalar(
      r#"
            INSERT INTO users (id, email, password_hash, created_at, last_login)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
    )
    .bind(user.id.as_uuid())
    .bind(&user.email)
    .bind(user.password_hash.as_str())
    .bind(user.created_at)
    .bind(user.last_login)
    .fetch_one(&self.pool)
    .await?;

    Ok(UserId::from_uuid(id))
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, email, password_hash, created_at, last_login
            FROM users
            WHERE email = $1
            "#,
    )
    .bind(email.as_str())
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn update_last_login(
    &self,
    user_id: UserId,
    at: DateTime<Utc>,
  ) -> Result<(), RepositoryError> {
    let result = sqlx::query(
      r#"
            UPDATE users
            SET last_login = $2
            WHERE id = $1
            "#,
    )
    .bind(user_id.as_uuid())
    .bind(at)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      return Err(RepositoryError::NotFound);
    }

    Ok(())
  }

  async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
    let rows = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, email, password_hash, created_at, last_login
            FROM users
            ORDER BY created_at, id
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
  }

  async fn list_page(&self, page: PageRequest) -> Result<Vec<User>, RepositoryError> {
    let offset = i64::try_from(page.offset).unwrap_or(i64::MAX);

    let rows = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, email, password_hash, created_at, last_login
            FROM users
            ORDER BY created_at, id
            LIMIT $1 OFFSET $2
            "#,
    )
    .bind(i64::from(page.limit))
    .bind(offset)
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, SubsecRound};
  use sqlx::postgres::PgPoolOptions;
  use testcontainers::ImageExt;
  use testcontainers_modules::postgres::Postgres;
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};

  use crate::infrastructure::persistence::postgres::run_migrations;

  async fn setup_test_db() -> (PgPool, ContainerAsync<Postgres>) {
    let container = Postgres::default()
      .with_tag("16-alpine")
      .start()
      .await
      .expect("Failed to start postgres container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
      .get_host_port_ipv4(5432)
      .await
      .expect("Failed to get port");
    let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPoolOptions::new()
      .max_connections(5)
      .connect(&database_url)
      .await
      .expect("Failed to connect to test database");

    run_migrations(&pool)
      .await
      .expect("Failed to run migrations");

    (pool, container)
  }

  fn user(email: &str) -> User {
    User::new(Email::new(email), PasswordHash::from_hash("$argon2id$v=19$stub"))
  }

  #[tokio::test]
  async fn test_create_and_find_user() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    let created = user("test@example.com");
    let id = repo.create(&created).await.unwrap();
    assert_eq!(id, created.id);

    let found = repo
      .find_by_email(&Email::new("test@example.com"))
      .await
      .unwrap()
      .expect("user should exist");

    assert_eq!(found.id, id);
    assert_eq!(found.email, "test@example.com");
    assert_eq!(found.password_hash.as_str(), "$argon2id$v=19$stub");
    assert!(found.last_login.is_none());

    assert!(
      repo
        .find_by_email(&Email::new("nobody@example.com"))
        .await
        .unwrap()
        .is_none()
    );
  }

  #[tokio::test]
  async fn test_duplicate_email() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    repo.create(&user("duplicate@example.com")).await.unwrap();
    let result = repo.create(&user("duplicate@example.com")).await;

    match result {
      Err(RepositoryError::DuplicateKey(constraint)) => assert_eq!(constraint, "users_email_key"),
      other => panic!("Expected DuplicateKey error, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_email_match_is_exact() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    repo.create(&user("Case@Example.com")).await.unwrap();

    // Different casing is a different account
    assert!(
      repo
        .find_by_email(&Email::new("case@example.com"))
        .await
        .unwrap()
        .is_none()
    );
    assert!(repo.create(&user("case@example.com")).await.is_ok());
  }

  #[tokio::test]
  async fn test_update_last_login() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    let created = user("login@example.com");
    repo.create(&created).await.unwrap();

    // TIMESTAMPTZ keeps microseconds
    let at = Utc::now().trunc_subsecs(6);
    repo.update_last_login(created.id, at).await.unwrap();

    let found = repo
      .find_by_email(&Email::new("login@example.com"))
      .await
      .unwrap()
      .unwrap();
    assert_eq!(found.last_login, Some(at));

    assert!(matches!(
      repo.update_last_login(UserId::new(), at).await,
      Err(RepositoryError::NotFound)
    ));
  }

  #[tokio::test]
  async fn test_listing_order_and_pages() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    let base = Utc::now().trunc_subsecs(6);
    for i in 0..5 {
      let mut u = user(&format!("user{}@example.com", i));
      u.created_at = base + Duration::seconds(i);
      repo.create(&u).await.unwrap();
    }

    let all = repo.list_all().await.unwrap();
    let emails: Vec<_> = all.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(
      emails,
      vec![
        "user0@example.com",
        "user1@example.com",
        "user2@example.com",
        "user3@example.com",
        "user4@example.com",
      ]
    );

    let page = repo.list_page(PageRequest::new(1, 2)).await.unwrap();
    let emails: Vec<_> = page.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, vec!["user1@example.com", "user2@example.com"]);

    let beyond = repo.list_page(PageRequest::new(10, 2)).await.unwrap();
    assert!(beyond.is_empty());
  }

  #[tokio::test]
  async fn test_ping_and_close() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    repo.ping().await.unwrap();
    repo.close().await;

    assert!(matches!(
      repo.ping().await,
      Err(RepositoryError::ConnectionFailed(_))
    ));
  }
}
