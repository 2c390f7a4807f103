mod session_store;

pub use session_store::{DEFAULT_KEY_PREFIX, RedisSessionStore};
