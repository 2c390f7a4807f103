use std::sync::Arc;

use crate::domain::auth::context::OperationContext;
use crate::domain::auth::entities::UserSummary;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::PageRequest;

/// Page size bounds applied to listing queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingPolicy {
  pub default_page_size: u32,
  pub max_page_size: u32,
}

impl Default for ListingPolicy {
  fn default() -> Self {
    Self {
      default_page_size: 100,
      max_page_size: 1000,
    }
  }
}

impl ListingPolicy {
  /// No bounds given means the whole listing.
  pub fn page_for(&self, query: &ListUsersQuery) -> Option<PageRequest> {
    if query.offset.is_none() && query.limit.is_none() {
      return None;
    }

    let limit = query
      .limit
      .unwrap_or(self.default_page_size)
      .clamp(1, self.max_page_size.max(1));

    Some(PageRequest::new(query.offset.unwrap_or(0), limit))
  }
}

/// Optional window into the listing
#[derive(Debug, Clone, Default)]
pub struct ListUsersQuery {
  pub offset: Option<u64>,
  pub limit: Option<u32>,
}

/// Use case for listing accounts. Digests never leave the service.
pub struct ListUsersUseCase {
  auth_service: Arc<AuthService>,
  policy: ListingPolicy,
}

impl ListUsersUseCase {
  pub fn new(auth_service: Arc<AuthService>, policy: ListingPolicy) -> Self {
    Self {
      auth_service,
      policy,
    }
  }

  pub async fn execute(
    &self,
    ctx: &OperationContext,
    query: ListUsersQuery,
  ) -> Result<Vec<UserSummary>, AuthError> {
    let page = self.policy.page_for(&query);
    self.auth_service.list_users(ctx, page).await
  }
}
