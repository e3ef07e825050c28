//! Error taxonomy for clinic operations.
//!
//! Every fallible operation in this crate returns [`ClinicResult`]. The
//! variants map one-to-one onto the API's response classes, so handlers never
//! need to inspect error internals to pick a status code.

/// Errors surfaced by identity, lifecycle, and clinical-record operations.
#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    /// The caller's role or ownership does not allow the operation.
    #[error("permission denied")]
    PermissionDenied,

    /// The referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// The requested date-time falls outside clinic hours.
    #[error("appointments must be between 08:00 and 11:00 or between 13:00 and 17:30")]
    OutsideSchedulingWindow,

    /// A unique field (email, license number, national id) is already taken.
    #[error("{0} is already registered")]
    DuplicateField(&'static str),

    /// Unknown email or wrong password.
    #[error("invalid e-mail or password")]
    InvalidCredentials,

    /// The appointment's current status does not allow the transition.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// The session token is missing, unknown, or logged out.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Underlying store failure.
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;

impl From<medeasy_types::TextError> for ClinicError {
    fn from(err: medeasy_types::TextError) -> Self {
        ClinicError::Validation(err.to_string())
    }
}
