// rest_api/src/handlers/mod.rs

pub mod appointments;
pub mod patients;

use axum::extract::Path;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::RestApiError;

/// Bodies are decoded by hand so a missing content-type is not a rejection.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, RestApiError> {
    serde_json::from_slice(body).map_err(|e| {
        error!(error = %e, "Error unmarshalling request body");
        RestApiError::InvalidInput("invalid request body".to_string())
    })
}

/// A path segment wins over the `id` query parameter.
pub(crate) fn resolve_id(path: Option<Path<String>>, query_id: String) -> String {
    match path {
        Some(Path(id)) if !id.is_empty() => id,
        _ => query_id,
    }
}
