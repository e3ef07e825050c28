//! Domain model for the clinic.
//!
//! Users carry an explicit [`Role`] tag plus a role-specific [`Profile`]
//! variant; nothing in the system dispatches on type identity, only on the
//! stored tag. Appointments hold the four-state lifecycle status; clinical
//! notes and prescriptions are append-only children of an appointment.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role discriminator stored on every user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
}

impl Role {
    /// Canonical text form used in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
        }
    }

    /// Parse the stored text form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "patient" => Some(Role::Patient),
            "doctor" => Some(Role::Doctor),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role-specific profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Profile {
    Patient {
        /// CPF-style national id, unique across patients.
        national_id: String,
        birth_date: NaiveDate,
    },
    Doctor {
        /// CRM-style license number, unique across doctors.
        license_number: String,
        specialty: String,
    },
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Profile::Patient { .. } => Role::Patient,
            Profile::Doctor { .. } => Role::Doctor,
        }
    }
}

/// A registered user: patient or doctor, decided by the profile tag.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Opaque credential string, `sha256$<salt>$<digest>`.
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(flatten)]
    pub profile: Profile,
}

impl User {
    pub fn role(&self) -> Role {
        self.profile.role()
    }
}

/// Authenticated caller identity, established at request start and passed
/// explicitly into every service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

/// Appointment lifecycle status.
///
/// `Scheduled → Confirmed → Finalized`, with `Cancelled` reachable from the
/// two non-terminal states. `Finalized` and `Cancelled` are terminal, though
/// Confirm/Edit deliberately apply no current-state guard (see the lifecycle
/// service).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Finalized,
    Cancelled,
}

impl AppointmentStatus {
    /// Canonical text form used in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Finalized => "finalized",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Parse the stored text form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(AppointmentStatus::Scheduled),
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "finalized" => Some(AppointmentStatus::Finalized),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled meeting between a patient and a doctor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appointment {
    pub id: Uuid,
    /// Clinic wall-clock time of the appointment.
    pub scheduled_at: NaiveDateTime,
    pub status: AppointmentStatus,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
}

impl Appointment {
    /// Whether the given user is the appointment's patient or doctor.
    pub fn is_party(&self, user_id: Uuid) -> bool {
        self.patient_id == user_id || self.doctor_id == user_id
    }
}

/// Doctor-authored free-text record ("evolução") attached to an appointment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicalNote {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub appointment_id: Uuid,
    pub doctor_id: Uuid,
}

/// Doctor-authored treatment description ("receita") attached to an
/// appointment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prescription {
    pub id: Uuid,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub appointment_id: Uuid,
}
