// Library crate for the staffdesk HTTP backend
// This file exposes the public API for integration tests

pub mod auth;
pub mod config;
pub mod employee;
pub mod extract;
pub mod routes;
pub mod shared;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use auth::{Claims, TokenService};
pub use config::AppConfig;
pub use employee::{models::Employee, repository::EmployeeRepository};
pub use routes::build_router;
pub use shared::{AppError, AppState, MessageResponse};
pub use user::{models::User, repository::UserRepository};
