pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use errors::{ApiError, AuthErrorKind};
pub use handlers::system::not_found_handler;
pub use middleware::{RequestId, RequestIdExt, RequestIdMiddleware};
pub use routes::{AuthRouteDependencies, configure_auth_routes, configure_system_routes};
