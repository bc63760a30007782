use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::shared::AppError;

/// The `id` query parameter, parsed as a 64-bit integer.
///
/// Absent, empty and non-numeric values are all rejected with 400. When the
/// parameter repeats, the first occurrence wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri).map_err(|e| {
            warn!(error = %e, "Unparseable query string");
            AppError::Validation("Invalid query string".to_string())
        })?;

        let raw = pairs
            .into_iter()
            .find(|(key, _)| key == "id")
            .map(|(_, value)| value)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Validation("Parameter 'id' is missing".to_string()))?;

        raw.parse::<i64>().map(RecordId).map_err(|_| {
            warn!(id = %raw, "Rejected non-numeric id");
            AppError::Validation("Invalid parameter 'id'".to_string())
        })
    }
}

/// JSON request body that reports every decoding failure as 400.
///
/// Unlike `axum::Json` this does not require a content type and does not
/// split syntax errors from shape errors. A `null` body decodes as `T::default()`.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            warn!(error = %e, "Failed to read request body");
            AppError::Validation("Invalid request payload".to_string())
        })?;

        serde_json::from_slice::<Option<T>>(&bytes)
            .map(|body| JsonBody(body.unwrap_or_default()))
            .map_err(|e| {
                warn!(error = %e, "Failed to decode request body");
                AppError::Validation("Invalid request payload".to_string())
            })
    }
}
