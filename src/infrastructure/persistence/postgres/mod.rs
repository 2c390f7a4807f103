mod pool;
mod user_repository;

pub use pool::{connect_pool, run_migrations};
pub use user_repository::PostgresUserRepository;
