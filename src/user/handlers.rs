use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, instrument, warn};

use super::models::User;
use crate::extract::{JsonBody, RecordId};
use crate::shared::{AppError, AppState, MessageResponse};

/// GET /user?id=
#[instrument(name = "get_user", skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<Json<User>, AppError> {
    let user = state.user_repository.get_user(id).await?.ok_or_else(|| {
        warn!(user_id = id, "User not found");
        AppError::NotFound(format!("User with id {} not found", id))
    })?;

    Ok(Json(user))
}

/// GET /users
#[instrument(name = "list_users", skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = state.user_repository.list_users().await?;

    info!(user_count = users.len(), "Users listed successfully");

    Ok(Json(users))
}

/// POST /add_user
#[instrument(name = "create_user", skip(state, user))]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(user): JsonBody<User>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let id = state.user_repository.create_user(&user).await?;

    info!(user_id = id, username = %user.username, "User created successfully");

    Ok((StatusCode::CREATED, Json(MessageResponse::new("User created"))))
}

/// PUT /update_user?id=
#[instrument(name = "update_user", skip(state, user))]
pub async fn update_user(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    JsonBody(user): JsonBody<User>,
) -> Result<Json<MessageResponse>, AppError> {
    if state.user_repository.update_user(id, &user).await? == 0 {
        warn!(user_id = id, "Update matched no user");
    }

    Ok(Json(MessageResponse::new("User updated")))
}

/// DELETE /delete_user?id=
#[instrument(name = "delete_user", skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<Json<MessageResponse>, AppError> {
    if state.user_repository.delete_user(id).await? == 0 {
        warn!(user_id = id, "Delete matched no user");
    }

    Ok(Json(MessageResponse::new("User deleted")))
}
