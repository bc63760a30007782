use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::TokenService;
use crate::employee::repository::{
    EmployeeRepository, InMemoryEmployeeRepository, PostgresEmployeeRepository,
};
use crate::user::repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub token_service: Arc<TokenService>,
    pub employee_repository: Arc<dyn EmployeeRepository + Send + Sync>,
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
}

impl AppState {
    pub fn new(
        token_service: Arc<TokenService>,
        employee_repository: Arc<dyn EmployeeRepository + Send + Sync>,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        Self {
            token_service,
            employee_repository,
            user_repository,
        }
    }

    /// Both tables backed by one Postgres pool
    pub fn postgres(token_service: Arc<TokenService>, pool: PgPool) -> Self {
        Self::new(
            token_service,
            Arc::new(PostgresEmployeeRepository::new(pool.clone())),
            Arc::new(PostgresUserRepository::new(pool)),
        )
    }

    /// Empty in-memory tables, for development without a database
    pub fn in_memory(token_service: Arc<TokenService>) -> Self {
        Self::new(
            token_service,
            Arc::new(InMemoryEmployeeRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Could not create token: {0}")]
    JwtError(String),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::JwtError(_) | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Error bodies are plain text; only successful responses carry JSON.
        let body = match &self {
            AppError::JwtError(_) => "Could not create token".to_string(),
            other => other.to_string(),
        };

        (self.status_code(), body).into_response()
    }
}

/// Confirmation body for create, update and delete
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
