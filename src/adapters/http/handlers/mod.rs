pub mod auth;
pub mod system;

pub use auth::AuthHandlerState;
pub use system::NodeIdentity;
