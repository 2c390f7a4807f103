pub mod context;
pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use context::{Interrupted, OperationContext};
pub use entities::{Session, User, UserSummary};
pub use errors::{AuthError, RepositoryError, SecurityError, StorageError, StorageFailure};
pub use services::{AuthService, AuthServiceConfig, DEFAULT_SESSION_TTL};
pub use value_objects::{
  Email, PageRequest, Password, PasswordHash, SessionToken, UserId, ValueObjectError,
};
