//! Registration, authentication, and doctor listing.
//!
//! Registration validates role-specific required fields and uniqueness
//! before writing; authentication verifies the submitted password against the
//! stored credential string and opens a session.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use medeasy_types::{NationalId, NonEmptyText};

use super::{lock_store, SharedDatabase};
use crate::credentials::{hash_password, verify_password};
use crate::db::Database;
use crate::error::{ClinicError, ClinicResult};
use crate::models::{Identity, Profile, User};
use crate::session::SessionStore;

/// Patient registration input.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPatient {
    pub name: String,
    pub email: String,
    pub national_id: String,
    pub birth_date: NaiveDate,
    pub password: String,
    pub password_confirmation: String,
}

/// Doctor registration input.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterDoctor {
    pub name: String,
    pub email: String,
    pub license_number: String,
    pub specialty: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub token: String,
    pub user: User,
}

/// Identity and credential operations.
#[derive(Clone)]
pub struct IdentityService {
    store: SharedDatabase,
    sessions: Arc<SessionStore>,
}

impl IdentityService {
    pub fn new(store: SharedDatabase, sessions: Arc<SessionStore>) -> Self {
        Self { store, sessions }
    }

    /// Registers a new patient.
    ///
    /// # Errors
    ///
    /// `Validation` for malformed fields (empty name, bad email shape,
    /// national id not exactly 11 characters, password/confirmation
    /// mismatch); `DuplicateField` when the email or national id is taken.
    pub fn register_patient(&self, req: RegisterPatient) -> ClinicResult<User> {
        let name = NonEmptyText::new(&req.name)
            .map_err(|_| ClinicError::Validation("name is required".into()))?;
        validate_email(&req.email)?;
        validate_password_pair(&req.password, &req.password_confirmation)?;
        let national_id = NationalId::new(&req.national_id).map_err(|_| {
            ClinicError::Validation(format!(
                "national id must be exactly {} characters",
                NationalId::LEN
            ))
        })?;

        let db = lock_store(&self.store);
        check_email_free(&db, &req.email)?;
        if db.national_id_taken(national_id.as_str())? {
            return Err(ClinicError::DuplicateField("national id"));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: req.email.trim().to_owned(),
            name: name.into_inner(),
            password_hash: hash_password(&req.password),
            profile: Profile::Patient {
                national_id: national_id.as_str().to_owned(),
                birth_date: req.birth_date,
            },
        };
        db.insert_user(&user)?;
        tracing::info!(user_id = %user.id, "patient registered");
        Ok(user)
    }

    /// Registers a new doctor.
    ///
    /// # Errors
    ///
    /// `Validation` for malformed fields; `DuplicateField` when the email or
    /// license number is taken.
    pub fn register_doctor(&self, req: RegisterDoctor) -> ClinicResult<User> {
        let name = NonEmptyText::new(&req.name)
            .map_err(|_| ClinicError::Validation("name is required".into()))?;
        validate_email(&req.email)?;
        validate_password_pair(&req.password, &req.password_confirmation)?;
        let license_number = NonEmptyText::new(&req.license_number)
            .map_err(|_| ClinicError::Validation("license number is required".into()))?;
        let specialty = NonEmptyText::new(&req.specialty)
            .map_err(|_| ClinicError::Validation("specialty is required".into()))?;

        let db = lock_store(&self.store);
        check_email_free(&db, &req.email)?;
        if db.license_number_taken(license_number.as_str())? {
            return Err(ClinicError::DuplicateField("license number"));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: req.email.trim().to_owned(),
            name: name.into_inner(),
            password_hash: hash_password(&req.password),
            profile: Profile::Doctor {
                license_number: license_number.into_inner(),
                specialty: specialty.into_inner(),
            },
        };
        db.insert_user(&user)?;
        tracing::info!(user_id = %user.id, "doctor registered");
        Ok(user)
    }

    /// Verifies credentials and opens a session.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` when the email is unknown or the password does
    /// not match; the two cases are indistinguishable to the caller.
    pub fn authenticate(&self, email: &str, password: &str) -> ClinicResult<LoginSession> {
        let user = {
            let db = lock_store(&self.store);
            db.get_user_by_email(email.trim())?
        };
        let user = user.ok_or(ClinicError::InvalidCredentials)?;
        if !verify_password(&user.password_hash, password) {
            tracing::warn!(user_id = %user.id, "failed login attempt");
            return Err(ClinicError::InvalidCredentials);
        }

        let token = self.sessions.create(Identity {
            user_id: user.id,
            role: user.role(),
        });
        tracing::info!(user_id = %user.id, role = %user.role(), "login");
        Ok(LoginSession { token, user })
    }

    /// Closes the session for `token`.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` when the token is unknown or already revoked.
    pub fn logout(&self, token: &str) -> ClinicResult<()> {
        if self.sessions.revoke(token) {
            Ok(())
        } else {
            Err(ClinicError::NotAuthenticated)
        }
    }

    /// All doctors, for the booking picker.
    pub fn list_doctors(&self) -> ClinicResult<Vec<User>> {
        let db = lock_store(&self.store);
        db.list_doctors()
    }
}

fn check_email_free(db: &Database, email: &str) -> ClinicResult<()> {
    if db.email_taken(email.trim())? {
        Err(ClinicError::DuplicateField("email"))
    } else {
        Ok(())
    }
}

/// Shape check only: something before the `@`, a dot somewhere after it.
fn validate_email(email: &str) -> ClinicResult<()> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ClinicError::Validation("invalid e-mail address".into()))
    }
}

fn validate_password_pair(password: &str, confirmation: &str) -> ClinicResult<()> {
    if password.is_empty() {
        return Err(ClinicError::Validation("password is required".into()));
    }
    if password != confirmation {
        return Err(ClinicError::Validation("passwords must match".into()));
    }
    Ok(())
}
