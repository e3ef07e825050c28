//! Clinical notes and prescriptions ("evoluções" and "receitas").
//!
//! Records are append-only: they can be added and listed, never edited or
//! deleted, and they vanish only when their appointment is deleted (cascade
//! in the store). Listing is always an explicit query per appointment.

use chrono::Utc;
use uuid::Uuid;

use medeasy_types::NonEmptyText;

use super::{lock_store, SharedDatabase};
use crate::db::Database;
use crate::error::{ClinicError, ClinicResult};
use crate::models::{Appointment, ClinicalNote, Identity, Prescription, Role};

/// An appointment together with its clinical records, in display order:
/// notes oldest first, prescriptions newest first.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AppointmentRecords {
    pub appointment: Appointment,
    pub notes: Vec<ClinicalNote>,
    pub prescriptions: Vec<Prescription>,
}

/// Clinical record operations.
#[derive(Clone)]
pub struct RecordService {
    store: SharedDatabase,
}

impl RecordService {
    pub fn new(store: SharedDatabase) -> Self {
        Self { store }
    }

    /// Appends a clinical note to an appointment.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` unless the caller is the appointment's doctor;
    /// `NotFound` when the appointment is missing; `Validation` when the
    /// content is empty.
    pub fn add_note(
        &self,
        caller: Identity,
        appointment_id: Uuid,
        content: &str,
    ) -> ClinicResult<ClinicalNote> {
        let content = NonEmptyText::new(content)
            .map_err(|_| ClinicError::Validation("note content cannot be empty".into()))?;

        let db = lock_store(&self.store);
        require_appointment_doctor(&db, appointment_id, caller)?;

        let note = ClinicalNote {
            id: Uuid::new_v4(),
            content: content.into_inner(),
            created_at: Utc::now(),
            appointment_id,
            doctor_id: caller.user_id,
        };
        db.insert_note(&note)?;
        tracing::info!(appointment_id = %appointment_id, note_id = %note.id, "note added");
        Ok(note)
    }

    /// Appends a prescription to an appointment.
    ///
    /// Same doctor-only restriction as [`add_note`](Self::add_note); the two
    /// are independent submissions distinguished upstream by an action tag.
    pub fn add_prescription(
        &self,
        caller: Identity,
        appointment_id: Uuid,
        description: &str,
    ) -> ClinicResult<Prescription> {
        let description = NonEmptyText::new(description)
            .map_err(|_| ClinicError::Validation("prescription description cannot be empty".into()))?;

        let db = lock_store(&self.store);
        require_appointment_doctor(&db, appointment_id, caller)?;

        let prescription = Prescription {
            id: Uuid::new_v4(),
            description: description.into_inner(),
            created_at: Utc::now(),
            appointment_id,
        };
        db.insert_prescription(&prescription)?;
        tracing::info!(
            appointment_id = %appointment_id,
            prescription_id = %prescription.id,
            "prescription added"
        );
        Ok(prescription)
    }

    /// The doctor's chart page: appointment plus its notes and
    /// prescriptions.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` unless the caller is a doctor and the appointment's
    /// doctor; `NotFound` when the appointment is missing.
    pub fn doctor_view(
        &self,
        caller: Identity,
        appointment_id: Uuid,
    ) -> ClinicResult<AppointmentRecords> {
        if caller.role != Role::Doctor {
            return Err(ClinicError::PermissionDenied);
        }
        let db = lock_store(&self.store);
        let appointment = require_appointment_doctor(&db, appointment_id, caller)?;
        load_records(&db, appointment)
    }

    /// The patient's history page for one of their own appointments.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` unless the caller is the appointment's patient;
    /// `NotFound` when the appointment is missing.
    pub fn patient_history(
        &self,
        caller: Identity,
        appointment_id: Uuid,
    ) -> ClinicResult<AppointmentRecords> {
        let db = lock_store(&self.store);
        let appointment = db
            .get_appointment(appointment_id)?
            .ok_or(ClinicError::NotFound("appointment"))?;
        if caller.role != Role::Patient || appointment.patient_id != caller.user_id {
            return Err(ClinicError::PermissionDenied);
        }
        load_records(&db, appointment)
    }
}

fn require_appointment_doctor(
    db: &Database,
    appointment_id: Uuid,
    caller: Identity,
) -> ClinicResult<Appointment> {
    let appointment = db
        .get_appointment(appointment_id)?
        .ok_or(ClinicError::NotFound("appointment"))?;
    if appointment.doctor_id != caller.user_id {
        return Err(ClinicError::PermissionDenied);
    }
    Ok(appointment)
}

fn load_records(db: &Database, appointment: Appointment) -> ClinicResult<AppointmentRecords> {
    let notes = db.list_notes(appointment.id)?;
    let prescriptions = db.list_prescriptions(appointment.id)?;
    Ok(AppointmentRecords {
        appointment,
        notes,
        prescriptions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{
        AppointmentService, IdentityService, RegisterDoctor, RegisterPatient,
    };
    use crate::session::SessionStore;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};

    struct Fixture {
        records: RecordService,
        appointment_id: Uuid,
        patient: Identity,
        doctor: Identity,
        other_doctor: Identity,
        other_patient: Identity,
    }

    fn fixture() -> Fixture {
        let store: SharedDatabase =
            Arc::new(Mutex::new(Database::open_in_memory().unwrap()));
        let identity = IdentityService::new(store.clone(), Arc::new(SessionStore::new()));
        let appointments = AppointmentService::new(store.clone());

        let register_patient = |email: &str, cpf: &str| {
            let user = identity
                .register_patient(RegisterPatient {
                    name: "Paciente".into(),
                    email: email.into(),
                    national_id: cpf.into(),
                    birth_date: NaiveDate::from_ymd_opt(1990, 5, 1).unwrap(),
                    password: "s3nha".into(),
                    password_confirmation: "s3nha".into(),
                })
                .unwrap();
            Identity {
                user_id: user.id,
                role: user.role(),
            }
        };
        let register_doctor = |email: &str, crm: &str| {
            let user = identity
                .register_doctor(RegisterDoctor {
                    name: "Médico".into(),
                    email: email.into(),
                    license_number: crm.into(),
                    specialty: "Clínica geral".into(),
                    password: "s3nha".into(),
                    password_confirmation: "s3nha".into(),
                })
                .unwrap();
            Identity {
                user_id: user.id,
                role: user.role(),
            }
        };

        let patient = register_patient("ana@example.com", "12345678901");
        let other_patient = register_patient("carla@example.com", "98765432109");
        let doctor = register_doctor("bruno@example.com", "CRM-1");
        let other_doctor = register_doctor("diego@example.com", "CRM-2");

        let slot = NaiveDate::from_ymd_opt(2026, 3, 9)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let appointment = appointments
            .schedule(patient, doctor.user_id, slot)
            .unwrap();

        Fixture {
            records: RecordService::new(store),
            appointment_id: appointment.id,
            patient,
            doctor,
            other_doctor,
            other_patient,
        }
    }

    #[test]
    fn doctor_adds_and_sees_notes_and_prescriptions() {
        let fx = fixture();
        fx.records
            .add_note(fx.doctor, fx.appointment_id, "Paciente estável")
            .unwrap();
        fx.records
            .add_prescription(fx.doctor, fx.appointment_id, "Dipirona 500mg 8/8h")
            .unwrap();

        let view = fx.records.doctor_view(fx.doctor, fx.appointment_id).unwrap();
        assert_eq!(view.notes.len(), 1);
        assert_eq!(view.prescriptions.len(), 1);
        assert_eq!(view.notes[0].doctor_id, fx.doctor.user_id);
    }

    #[test]
    fn only_the_appointments_doctor_may_write_records() {
        let fx = fixture();
        assert!(matches!(
            fx.records
                .add_note(fx.other_doctor, fx.appointment_id, "intruso"),
            Err(ClinicError::PermissionDenied)
        ));
        assert!(matches!(
            fx.records
                .add_prescription(fx.patient, fx.appointment_id, "auto-receita"),
            Err(ClinicError::PermissionDenied)
        ));
    }

    #[test]
    fn empty_content_is_rejected_and_not_persisted() {
        let fx = fixture();
        assert!(matches!(
            fx.records.add_note(fx.doctor, fx.appointment_id, "   "),
            Err(ClinicError::Validation(_))
        ));
        assert!(matches!(
            fx.records.add_prescription(fx.doctor, fx.appointment_id, ""),
            Err(ClinicError::Validation(_))
        ));

        let view = fx.records.doctor_view(fx.doctor, fx.appointment_id).unwrap();
        assert!(view.notes.is_empty());
        assert!(view.prescriptions.is_empty());
    }

    #[test]
    fn history_is_for_the_appointments_patient_only() {
        let fx = fixture();
        fx.records
            .add_note(fx.doctor, fx.appointment_id, "Paciente estável")
            .unwrap();

        let history = fx
            .records
            .patient_history(fx.patient, fx.appointment_id)
            .unwrap();
        assert_eq!(history.notes.len(), 1);

        assert!(matches!(
            fx.records.patient_history(fx.other_patient, fx.appointment_id),
            Err(ClinicError::PermissionDenied)
        ));
        // the doctor uses the chart view, not the patient history
        assert!(matches!(
            fx.records.patient_history(fx.doctor, fx.appointment_id),
            Err(ClinicError::PermissionDenied)
        ));
    }

    #[test]
    fn unknown_appointment_is_not_found() {
        let fx = fixture();
        assert!(matches!(
            fx.records.add_note(fx.doctor, Uuid::new_v4(), "x"),
            Err(ClinicError::NotFound("appointment"))
        ));
        assert!(matches!(
            fx.records.patient_history(fx.patient, Uuid::new_v4()),
            Err(ClinicError::NotFound("appointment"))
        ));
    }

    #[test]
    fn doctor_view_requires_doctor_role() {
        let fx = fixture();
        assert!(matches!(
            fx.records.doctor_view(fx.patient, fx.appointment_id),
            Err(ClinicError::PermissionDenied)
        ));
    }
}
