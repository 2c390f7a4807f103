//! In-process stores with the same contracts as the Postgres and Redis
//! adapters. Used to run the Auth Service in isolation.

mod session_store;
mod user_repository;

pub use session_store::InMemorySessionStore;
pub use user_repository::InMemoryUserRepository;
