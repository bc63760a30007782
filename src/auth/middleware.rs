use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::{info, instrument, warn};

use super::types::Claims;
use crate::shared::{AppError, AppState};

/// Token interceptor - verifies the Authorization Bearer header once and adds Claims to the request.
/// Handlers and later interceptors read them with Extension<Claims>.
#[instrument(skip(state, req, next))]
pub async fn require_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = req.headers().get(AUTHORIZATION).ok_or_else(|| {
        warn!(uri = %req.uri(), "Missing Authorization header in request");
        AppError::Unauthorized("Missing token".to_string())
    })?;

    // Present but empty after the prefix is an invalid token, not a missing one.
    // A value without the prefix is verified as-is; non-ASCII bytes verify as empty.
    let token = header
        .to_str()
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value))
        .unwrap_or_default()
        .to_string();

    let claims = match state.token_service.verify(&token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!(uri = %req.uri(), "Token verification failed: {}", e);
            return Err(e.into());
        }
    };

    info!(
        username = %claims.username,
        role = %claims.role,
        "Authentication successful, adding claims to request"
    );

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Admin interceptor - must run after `require_token`; rejects non-admin callers with 403.
#[instrument(skip(req, next))]
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let claims = req.extensions().get::<Claims>().ok_or_else(|| {
        warn!(uri = %req.uri(), "Admin check reached without verified claims");
        AppError::Unauthorized("Missing token".to_string())
    })?;

    if !claims.is_admin() {
        warn!(
            username = %claims.username,
            role = %claims.role,
            "Non-admin caller rejected"
        );
        return Err(AppError::Forbidden("Forbidden: Admins only".to_string()));
    }

    Ok(next.run(req).await)
}
