//! # MedEasy Core
//!
//! Domain logic for the clinic appointment system:
//!
//! - Identity: patient/doctor registration, credential checks, sessions
//! - Appointment lifecycle: schedule, edit, confirm, cancel, finalize, list
//! - Clinical records: append-only notes ("evoluções") and prescriptions
//! - Scheduling-window validation for clinic hours
//! - SQLite-backed store shared behind a mutex
//!
//! **No API concerns**: HTTP routing, request DTOs, and status-code mapping
//! belong in `api-rest`.

pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod window;

pub use config::CoreConfig;
pub use db::Database;
pub use error::{ClinicError, ClinicResult};
pub use models::{
    Appointment, AppointmentStatus, ClinicalNote, Identity, Prescription, Profile, Role, User,
};
pub use services::{
    AppointmentRecords, AppointmentService, EditAppointment, IdentityService, LoginSession,
    RecordService, RegisterDoctor, RegisterPatient, SharedDatabase,
};
pub use session::SessionStore;
pub use window::validate_scheduling_window;
