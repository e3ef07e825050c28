//! Mapping from [`ClinicError`] to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use medeasy_core::ClinicError;

use crate::dto::ErrorRes;

/// Wrapper so handlers can return `Result<_, ApiError>` with `?` over core
/// calls.
#[derive(Debug)]
pub struct ApiError(pub ClinicError);

impl From<ClinicError> for ApiError {
    fn from(err: ClinicError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ClinicError::PermissionDenied => (StatusCode::FORBIDDEN, self.0.to_string()),
            ClinicError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            ClinicError::Validation(_) | ClinicError::OutsideSchedulingWindow => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.0.to_string())
            }
            ClinicError::DuplicateField(_) | ClinicError::InvalidTransition(_) => {
                (StatusCode::CONFLICT, self.0.to_string())
            }
            ClinicError::InvalidCredentials | ClinicError::NotAuthenticated => {
                (StatusCode::UNAUTHORIZED, self.0.to_string())
            }
            ClinicError::Store(err) => {
                tracing::error!("store error: {err:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
        };
        (status, Json(ErrorRes { error: message })).into_response()
    }
}
