use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::auth::{
  entities::User,
  errors::{EMAIL_UNIQUE_CONSTRAINT, RepositoryError},
  ports::UserRepository,
  value_objects::{Email, PageRequest, UserId},
};

/// In-memory implementation of the UserRepository trait
///
/// The email index is checked and updated under the same write lock, which
/// plays the role of the unique index in the relational schema.
#[derive(Default)]
pub struct InMemoryUserRepository {
  state: RwLock<State>,
}

#[derive(Default)]
struct State {
  users: HashMap<UserId, User>,
  by_email: HashMap<String, UserId>,
}

impl InMemoryUserRepository {
  pub fn new() -> Self {
    Self::default()
  }

  fn sorted(users: &HashMap<UserId, User>) -> Vec<User> {
    let mut users: Vec<User> = users.values().cloned().collect();
    users.sort_by(|a, b| {
      a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
    });
    users
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn create(&self, user: &User) -> Result<UserId, RepositoryError> {
    let mut state = self.state.write().await;

    if state.by_email.contains_key(&user.email) {
      return Err(RepositoryError::DuplicateKey(EMAIL_UNIQUE_CONSTRAINT.to_string()));
    }
    if state.users.contains_key(&user.id) {
      return Err(RepositoryError::DuplicateKey("users_pkey".to_string()));
    }

    state.by_email.insert(user.email.clone(), user.id);
    state.users.insert(user.id, user.clone());

    Ok(user.id)
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
    let state = self.state.read().await;

    Ok(
      state
        .by_email
        .get(email.as_str())
        .and_then(|id| state.users.get(id))
        .cloned(),
    )
  }

  async fn update_last_login(
    &self,
    user_id: UserId,
    at: DateTime<Utc>,
  ) -> Result<(), RepositoryError> {
    let mut state = self.state.write().await;

    match state.users.get_mut(&user_id) {
      Some(user) => {
        user.last_login = Some(at);
        Ok(())
      }
      None => Err(RepositoryError::NotFound),
    }
  }

  async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
    let state = self.state.read().await;
    Ok(Self::sorted(&state.users))
  }

  async fn list_page(&self, page: PageRequest) -> Result<Vec<User>, RepositoryError> {
    let state = self.state.read().await;
    let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);

    Ok(
      Self::sorted(&state.users)
        .into_iter()
        .skip(offset)
        .take(page.limit as usize)
        .collect(),
    )
  }
}
