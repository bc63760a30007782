use axum::{extract::State, Json};
use tracing::{info, instrument, warn};

use super::types::{Credentials, LoginResponse};
use crate::extract::JsonBody;
use crate::shared::{AppError, AppState};

/// HTTP handler for exchanging credentials for a token
///
/// POST /login
/// Returns a token carrying the caller's username and stored role
#[instrument(name = "login", skip(state, credentials), fields(username = %credentials.username))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<Json<LoginResponse>, AppError> {
    let role = state
        .user_repository
        .find_role(&credentials.username, &credentials.password)
        .await?
        .ok_or_else(|| {
            warn!("Login rejected: no matching username and password");
            AppError::Unauthorized("Invalid credentials".to_string())
        })?;

    let token = state.token_service.issue(&credentials.username, &role)?;

    info!(role = %role, "Login successful");

    Ok(Json(LoginResponse { token }))
}
