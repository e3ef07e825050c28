//! Request and response bodies for the REST surface.
//!
//! DTOs stay in this crate so `medeasy-core` carries no OpenAPI concerns;
//! conversions to and from the core types are defined next to each DTO.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use medeasy_core::{
    Appointment, AppointmentRecords, AppointmentStatus, ClinicalNote, EditAppointment,
    Prescription, Profile, RegisterDoctor, RegisterPatient, User,
};

/// Liveness response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterPatientReq {
    pub name: String,
    pub email: String,
    /// CPF, exactly 11 characters.
    pub national_id: String,
    pub birth_date: NaiveDate,
    pub password: String,
    pub password_confirmation: String,
}

impl From<RegisterPatientReq> for RegisterPatient {
    fn from(req: RegisterPatientReq) -> Self {
        RegisterPatient {
            name: req.name,
            email: req.email,
            national_id: req.national_id,
            birth_date: req.birth_date,
            password: req.password,
            password_confirmation: req.password_confirmation,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterDoctorReq {
    pub name: String,
    pub email: String,
    /// CRM license number.
    pub license_number: String,
    pub specialty: String,
    pub password: String,
    pub password_confirmation: String,
}

impl From<RegisterDoctorReq> for RegisterDoctor {
    fn from(req: RegisterDoctorReq) -> Self {
        RegisterDoctor {
            name: req.name,
            email: req.email,
            license_number: req.license_number,
            specialty: req.specialty,
            password: req.password,
            password_confirmation: req.password_confirmation,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredRes {
    pub id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginRes {
    /// Bearer token for subsequent requests.
    pub token: String,
    pub user_id: Uuid,
    #[schema(value_type = String, example = "patient")]
    pub role: medeasy_core::Role,
    pub name: String,
}

/// One entry of the booking picker.
#[derive(Debug, Serialize, ToSchema)]
pub struct DoctorRes {
    pub id: Uuid,
    pub name: String,
    pub license_number: String,
    pub specialty: String,
}

impl DoctorRes {
    /// `None` when the user is not a doctor.
    pub fn from_user(user: User) -> Option<Self> {
        match user.profile {
            Profile::Doctor {
                license_number,
                specialty,
            } => Some(DoctorRes {
                id: user.id,
                name: user.name,
                license_number,
                specialty,
            }),
            Profile::Patient { .. } => None,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScheduleReq {
    pub doctor_id: Uuid,
    /// Clinic wall-clock time, e.g. `2026-03-09T09:30:00`.
    pub scheduled_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EditAppointmentReq {
    pub doctor_id: Uuid,
    pub scheduled_at: NaiveDateTime,
    #[schema(value_type = String, example = "confirmed")]
    pub status: AppointmentStatus,
}

impl From<EditAppointmentReq> for EditAppointment {
    fn from(req: EditAppointmentReq) -> Self {
        EditAppointment {
            doctor_id: req.doctor_id,
            scheduled_at: req.scheduled_at,
            status: req.status,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentRes {
    pub id: Uuid,
    pub scheduled_at: NaiveDateTime,
    #[schema(value_type = String, example = "scheduled")]
    pub status: AppointmentStatus,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
}

impl From<Appointment> for AppointmentRes {
    fn from(appointment: Appointment) -> Self {
        AppointmentRes {
            id: appointment.id,
            scheduled_at: appointment.scheduled_at,
            status: appointment.status,
            patient_id: appointment.patient_id,
            doctor_id: appointment.doctor_id,
        }
    }
}

/// One chart submission: a note or a prescription, never both. The `action`
/// tag plays the role of the distinct submit button per form.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum RecordActionReq {
    Note { content: String },
    Prescription { description: String },
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoteRes {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub doctor_id: Uuid,
}

impl From<ClinicalNote> for NoteRes {
    fn from(note: ClinicalNote) -> Self {
        NoteRes {
            id: note.id,
            content: note.content,
            created_at: note.created_at,
            doctor_id: note.doctor_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PrescriptionRes {
    pub id: Uuid,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Prescription> for PrescriptionRes {
    fn from(prescription: Prescription) -> Self {
        PrescriptionRes {
            id: prescription.id,
            description: prescription.description,
            created_at: prescription.created_at,
        }
    }
}

/// An appointment with its records: notes oldest first, prescriptions
/// newest first.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordsRes {
    pub appointment: AppointmentRes,
    pub notes: Vec<NoteRes>,
    pub prescriptions: Vec<PrescriptionRes>,
}

impl From<AppointmentRecords> for RecordsRes {
    fn from(records: AppointmentRecords) -> Self {
        RecordsRes {
            appointment: records.appointment.into(),
            notes: records.notes.into_iter().map(Into::into).collect(),
            prescriptions: records.prescriptions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Error body for every non-2xx response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}
