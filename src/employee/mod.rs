// Public API - what other modules can use
pub use handlers::{create_employee, delete_employee, get_employee, list_employees, update_employee};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
