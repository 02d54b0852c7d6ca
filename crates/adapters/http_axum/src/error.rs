//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use backsync_domain::error::CrudError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`CrudError`] to an HTTP response with an appropriate status code.
///
/// Usage errors surface their message at 400, lookups that matched nothing
/// at 404. Storage and serialization failures log the cause and return a
/// generic 500 body.
pub struct ApiError(CrudError);

impl From<CrudError> for ApiError {
    fn from(err: CrudError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            CrudError::Usage(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            CrudError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            CrudError::Serialization(err) => {
                tracing::error!(error = %err, "failed to render response document");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            CrudError::Storage(err) => {
                tracing::error!(error = %err, "storage operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
