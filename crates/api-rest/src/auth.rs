//! Bearer-token authentication.
//!
//! The extractor resolves `Authorization: Bearer <token>` against the
//! session store and hands handlers an explicit [`Identity`]; no handler
//! reads session state ambiently.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use medeasy_core::{ClinicError, Identity};

use crate::error::ApiError;
use crate::AppState;

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct Caller {
    pub identity: Identity,
    /// The raw token, kept so logout can revoke it.
    pub token: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError(ClinicError::NotAuthenticated))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError(ClinicError::NotAuthenticated))?;

        let identity = state
            .sessions
            .resolve(token)
            .ok_or(ApiError(ClinicError::NotAuthenticated))?;

        Ok(Caller {
            identity,
            token: token.to_owned(),
        })
    }
}
