//! Authentication use cases
//!
//! Each use case turns transport-level input into domain values and calls
//! into the auth service.

mod authenticate_session;
mod list_users;
mod login_user;
mod logout_user;
mod register_user;

#[cfg(test)]
mod fixtures;

pub use authenticate_session::{AuthenticateSessionResponse, AuthenticateSessionUseCase};
pub use list_users::{ListUsersQuery, ListUsersUseCase, ListingPolicy};
pub use login_user::{LoginUserCommand, LoginUserResponse, LoginUserUseCase};
pub use logout_user::LogoutUserUseCase;
pub use register_user::{RegisterUserCommand, RegisterUserResponse, RegisterUserUseCase};
