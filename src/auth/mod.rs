// Public API - what other modules can use
pub use handlers::login;
pub use middleware::{require_admin, require_token};
pub use token::{AuthError, Clock, SystemClock, TokenService, TOKEN_TTL_MINUTES};
pub use types::{Claims, ADMIN_ROLE};

// Internal modules
mod handlers;
mod middleware;
pub mod token;
pub mod types;
