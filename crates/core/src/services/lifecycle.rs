//! Appointment lifecycle controller.
//!
//! Status graph: `Scheduled → Confirmed → Finalized`, with `Cancelled`
//! reachable from `Scheduled` and `Confirmed`. Finalize is the only guarded
//! transition (it requires `Confirmed`); confirm, cancel, and edit apply no
//! current-state precondition, matching the behaviour of the product this
//! replaces. Permission checks always run before any write:
//!
//! - schedule: caller must be a patient
//! - confirm, finalize: caller must be the appointment's doctor
//! - cancel, edit: caller must be a party to the appointment

use chrono::NaiveDateTime;
use serde::Deserialize;
use uuid::Uuid;

use super::{lock_store, SharedDatabase};
use crate::db::Database;
use crate::error::{ClinicError, ClinicResult};
use crate::models::{Appointment, AppointmentStatus, Identity, Role};
use crate::window::validate_scheduling_window;

/// Edit input: doctor, time, and status may all be reassigned.
#[derive(Debug, Clone, Deserialize)]
pub struct EditAppointment {
    pub doctor_id: Uuid,
    pub scheduled_at: NaiveDateTime,
    pub status: AppointmentStatus,
}

/// Lifecycle operations over appointments.
#[derive(Clone)]
pub struct AppointmentService {
    store: SharedDatabase,
}

impl AppointmentService {
    pub fn new(store: SharedDatabase) -> Self {
        Self { store }
    }

    /// Books a new appointment in `Scheduled` status.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` unless the caller is a patient;
    /// `OutsideSchedulingWindow` when the time fails the window check;
    /// `NotFound("doctor")` when `doctor_id` is not a registered doctor.
    pub fn schedule(
        &self,
        caller: Identity,
        doctor_id: Uuid,
        scheduled_at: NaiveDateTime,
    ) -> ClinicResult<Appointment> {
        if caller.role != Role::Patient {
            return Err(ClinicError::PermissionDenied);
        }
        validate_scheduling_window(scheduled_at)?;

        let db = lock_store(&self.store);
        require_doctor(&db, doctor_id)?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            scheduled_at,
            status: AppointmentStatus::Scheduled,
            patient_id: caller.user_id,
            doctor_id,
        };
        db.insert_appointment(&appointment)?;
        tracing::info!(
            appointment_id = %appointment.id,
            patient_id = %caller.user_id,
            doctor_id = %doctor_id,
            "appointment scheduled"
        );
        Ok(appointment)
    }

    /// Reassigns doctor, time, and status of an existing appointment.
    ///
    /// Any of the four statuses may be assigned here, including moving out of
    /// a terminal state; callers wanting guarded transitions use the
    /// dedicated operations.
    ///
    /// # Errors
    ///
    /// `NotFound` when the appointment or new doctor is missing;
    /// `PermissionDenied` unless the caller is a party;
    /// `OutsideSchedulingWindow` when the new time fails the window check.
    /// Existence and party checks run before input validation, so a bad time
    /// never masks a 404 or 403.
    pub fn edit(
        &self,
        caller: Identity,
        appointment_id: Uuid,
        changes: EditAppointment,
    ) -> ClinicResult<Appointment> {
        let db = lock_store(&self.store);
        let mut appointment = require_party(&db, appointment_id, caller)?;
        validate_scheduling_window(changes.scheduled_at)?;
        require_doctor(&db, changes.doctor_id)?;

        appointment.doctor_id = changes.doctor_id;
        appointment.scheduled_at = changes.scheduled_at;
        appointment.status = changes.status;
        db.update_appointment(&appointment)?;
        tracing::info!(
            appointment_id = %appointment.id,
            caller = %caller.user_id,
            status = %appointment.status,
            "appointment edited"
        );
        Ok(appointment)
    }

    /// Marks the appointment `Confirmed`.
    ///
    /// No current-state guard: confirming an already confirmed (or even
    /// cancelled) appointment sets `Confirmed` again.
    ///
    /// # Errors
    ///
    /// `NotFound` when the appointment is missing; `PermissionDenied` unless
    /// the caller is the appointment's doctor.
    pub fn confirm(&self, caller: Identity, appointment_id: Uuid) -> ClinicResult<Appointment> {
        self.set_status(caller, appointment_id, AppointmentStatus::Confirmed, Party::Doctor)
    }

    /// Marks the appointment `Cancelled`, from any prior state.
    ///
    /// # Errors
    ///
    /// `NotFound` when the appointment is missing; `PermissionDenied` unless
    /// the caller is a party to the appointment.
    pub fn cancel(&self, caller: Identity, appointment_id: Uuid) -> ClinicResult<Appointment> {
        self.set_status(caller, appointment_id, AppointmentStatus::Cancelled, Party::Either)
    }

    /// Marks the appointment `Finalized`.
    ///
    /// # Errors
    ///
    /// `NotFound` when the appointment is missing; `PermissionDenied` unless
    /// the caller is the appointment's doctor; `InvalidTransition` unless the
    /// current status is `Confirmed`.
    pub fn finalize(&self, caller: Identity, appointment_id: Uuid) -> ClinicResult<Appointment> {
        let db = lock_store(&self.store);
        let mut appointment = require_appointment(&db, appointment_id)?;
        if appointment.doctor_id != caller.user_id {
            return Err(ClinicError::PermissionDenied);
        }
        if appointment.status != AppointmentStatus::Confirmed {
            return Err(ClinicError::InvalidTransition(
                "only confirmed appointments may be finalized".into(),
            ));
        }
        appointment.status = AppointmentStatus::Finalized;
        db.update_appointment_status(appointment.id, appointment.status)?;
        tracing::info!(appointment_id = %appointment.id, "appointment finalized");
        Ok(appointment)
    }

    /// The caller's own appointments, newest first.
    ///
    /// Patients see appointments where they are the patient; doctors where
    /// they are the doctor.
    pub fn list_for(&self, caller: Identity) -> ClinicResult<Vec<Appointment>> {
        let db = lock_store(&self.store);
        match caller.role {
            Role::Patient => db.list_appointments_for_patient(caller.user_id),
            Role::Doctor => db.list_appointments_for_doctor(caller.user_id),
        }
    }

    /// Loads one appointment, for a party only (backs the edit view).
    ///
    /// # Errors
    ///
    /// `NotFound` when the appointment is missing; `PermissionDenied` unless
    /// the caller is a party.
    pub fn get_for_party(&self, caller: Identity, appointment_id: Uuid) -> ClinicResult<Appointment> {
        let db = lock_store(&self.store);
        require_party(&db, appointment_id, caller)
    }

    fn set_status(
        &self,
        caller: Identity,
        appointment_id: Uuid,
        status: AppointmentStatus,
        who: Party,
    ) -> ClinicResult<Appointment> {
        let db = lock_store(&self.store);
        let mut appointment = require_appointment(&db, appointment_id)?;
        let allowed = match who {
            Party::Doctor => appointment.doctor_id == caller.user_id,
            Party::Either => appointment.is_party(caller.user_id),
        };
        if !allowed {
            return Err(ClinicError::PermissionDenied);
        }
        appointment.status = status;
        db.update_appointment_status(appointment.id, status)?;
        tracing::info!(appointment_id = %appointment.id, status = %status, "status updated");
        Ok(appointment)
    }
}

enum Party {
    Doctor,
    Either,
}

fn require_appointment(db: &Database, id: Uuid) -> ClinicResult<Appointment> {
    db.get_appointment(id)?
        .ok_or(ClinicError::NotFound("appointment"))
}

fn require_party(db: &Database, id: Uuid, caller: Identity) -> ClinicResult<Appointment> {
    let appointment = require_appointment(db, id)?;
    if !appointment.is_party(caller.user_id) {
        return Err(ClinicError::PermissionDenied);
    }
    Ok(appointment)
}

fn require_doctor(db: &Database, doctor_id: Uuid) -> ClinicResult<()> {
    match db.get_user(doctor_id)? {
        Some(user) if user.role() == Role::Doctor => Ok(()),
        _ => Err(ClinicError::NotFound("doctor")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{IdentityService, RegisterDoctor, RegisterPatient};
    use crate::session::SessionStore;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};

    struct Fixture {
        appointments: AppointmentService,
        patient: Identity,
        doctor: Identity,
        other_doctor: Identity,
        other_patient: Identity,
    }

    fn fixture() -> Fixture {
        let store: SharedDatabase = Arc::new(Mutex::new(Database::open_in_memory().unwrap()));
        let identity = IdentityService::new(store.clone(), Arc::new(SessionStore::new()));

        let patient = identity
            .register_patient(RegisterPatient {
                name: "Ana".into(),
                email: "ana@example.com".into(),
                national_id: "12345678901".into(),
                birth_date: NaiveDate::from_ymd_opt(1990, 5, 1).unwrap(),
                password: "s3nha".into(),
                password_confirmation: "s3nha".into(),
            })
            .unwrap();
        let other_patient = identity
            .register_patient(RegisterPatient {
                name: "Carla".into(),
                email: "carla@example.com".into(),
                national_id: "98765432109".into(),
                birth_date: NaiveDate::from_ymd_opt(1985, 2, 20).unwrap(),
                password: "s3nha".into(),
                password_confirmation: "s3nha".into(),
            })
            .unwrap();
        let doctor = identity
            .register_doctor(RegisterDoctor {
                name: "Bruno".into(),
                email: "bruno@example.com".into(),
                license_number: "CRM-1".into(),
                specialty: "Cardiologia".into(),
                password: "s3nha".into(),
                password_confirmation: "s3nha".into(),
            })
            .unwrap();
        let other_doctor = identity
            .register_doctor(RegisterDoctor {
                name: "Diego".into(),
                email: "diego@example.com".into(),
                license_number: "CRM-2".into(),
                specialty: "Ortopedia".into(),
                password: "s3nha".into(),
                password_confirmation: "s3nha".into(),
            })
            .unwrap();

        let as_identity = |u: &crate::models::User| Identity {
            user_id: u.id,
            role: u.role(),
        };

        Fixture {
            appointments: AppointmentService::new(store),
            patient: as_identity(&patient),
            doctor: as_identity(&doctor),
            other_doctor: as_identity(&other_doctor),
            other_patient: as_identity(&other_patient),
        }
    }

    fn morning_slot() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 9)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn book(fx: &Fixture) -> Appointment {
        fx.appointments
            .schedule(fx.patient, fx.doctor.user_id, morning_slot())
            .unwrap()
    }

    #[test]
    fn schedule_creates_scheduled_appointment() {
        let fx = fixture();
        let appt = book(&fx);
        assert_eq!(appt.status, AppointmentStatus::Scheduled);
        assert_eq!(appt.patient_id, fx.patient.user_id);
        assert_eq!(appt.doctor_id, fx.doctor.user_id);
    }

    #[test]
    fn doctors_cannot_schedule() {
        let fx = fixture();
        let result = fx
            .appointments
            .schedule(fx.doctor, fx.doctor.user_id, morning_slot());
        assert!(matches!(result, Err(ClinicError::PermissionDenied)));
    }

    #[test]
    fn schedule_rejects_times_outside_clinic_hours() {
        let fx = fixture();
        let lunch = NaiveDate::from_ymd_opt(2026, 3, 9)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let result = fx.appointments.schedule(fx.patient, fx.doctor.user_id, lunch);
        assert!(matches!(result, Err(ClinicError::OutsideSchedulingWindow)));
        assert!(fx.appointments.list_for(fx.patient).unwrap().is_empty());
    }

    #[test]
    fn schedule_rejects_unknown_or_non_doctor_target() {
        let fx = fixture();
        assert!(matches!(
            fx.appointments
                .schedule(fx.patient, Uuid::new_v4(), morning_slot()),
            Err(ClinicError::NotFound("doctor"))
        ));
        assert!(matches!(
            fx.appointments
                .schedule(fx.patient, fx.other_patient.user_id, morning_slot()),
            Err(ClinicError::NotFound("doctor"))
        ));
    }

    #[test]
    fn confirm_requires_the_appointments_doctor() {
        let fx = fixture();
        let appt = book(&fx);

        assert!(matches!(
            fx.appointments.confirm(fx.other_doctor, appt.id),
            Err(ClinicError::PermissionDenied)
        ));
        assert!(matches!(
            fx.appointments.confirm(fx.patient, appt.id),
            Err(ClinicError::PermissionDenied)
        ));

        let confirmed = fx.appointments.confirm(fx.doctor, appt.id).unwrap();
        assert_eq!(confirmed.status, AppointmentStatus::Confirmed);
    }

    #[test]
    fn confirm_has_no_current_state_guard() {
        let fx = fixture();
        let appt = book(&fx);
        fx.appointments.cancel(fx.patient, appt.id).unwrap();

        // cancelled appointment can still be confirmed; the permissive
        // behaviour of the original is intentional here
        let reconfirmed = fx.appointments.confirm(fx.doctor, appt.id).unwrap();
        assert_eq!(reconfirmed.status, AppointmentStatus::Confirmed);
    }

    #[test]
    fn cancel_allowed_for_both_parties_from_any_state() {
        let fx = fixture();
        let appt = book(&fx);
        fx.appointments.confirm(fx.doctor, appt.id).unwrap();

        let cancelled = fx.appointments.cancel(fx.doctor, appt.id).unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

        // cancelling again is a no-op transition but still permitted
        let again = fx.appointments.cancel(fx.patient, appt.id).unwrap();
        assert_eq!(again.status, AppointmentStatus::Cancelled);

        assert!(matches!(
            fx.appointments.cancel(fx.other_patient, appt.id),
            Err(ClinicError::PermissionDenied)
        ));
    }

    #[test]
    fn finalize_requires_confirmed_status() {
        let fx = fixture();
        let appt = book(&fx);

        let premature = fx.appointments.finalize(fx.doctor, appt.id);
        assert!(matches!(premature, Err(ClinicError::InvalidTransition(_))));
        // failed finalize leaves the status untouched
        assert_eq!(
            fx.appointments
                .get_for_party(fx.patient, appt.id)
                .unwrap()
                .status,
            AppointmentStatus::Scheduled
        );

        fx.appointments.confirm(fx.doctor, appt.id).unwrap();
        let finalized = fx.appointments.finalize(fx.doctor, appt.id).unwrap();
        assert_eq!(finalized.status, AppointmentStatus::Finalized);

        // finalized is terminal for finalize itself
        assert!(matches!(
            fx.appointments.finalize(fx.doctor, appt.id),
            Err(ClinicError::InvalidTransition(_))
        ));
    }

    #[test]
    fn finalize_requires_the_appointments_doctor() {
        let fx = fixture();
        let appt = book(&fx);
        fx.appointments.confirm(fx.doctor, appt.id).unwrap();
        assert!(matches!(
            fx.appointments.finalize(fx.other_doctor, appt.id),
            Err(ClinicError::PermissionDenied)
        ));
    }

    #[test]
    fn edit_reassigns_doctor_time_and_status() {
        let fx = fixture();
        let appt = book(&fx);

        let new_time = NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        let edited = fx
            .appointments
            .edit(
                fx.patient,
                appt.id,
                EditAppointment {
                    doctor_id: fx.other_doctor.user_id,
                    scheduled_at: new_time,
                    status: AppointmentStatus::Confirmed,
                },
            )
            .unwrap();
        assert_eq!(edited.doctor_id, fx.other_doctor.user_id);
        assert_eq!(edited.scheduled_at, new_time);
        assert_eq!(edited.status, AppointmentStatus::Confirmed);
    }

    #[test]
    fn edit_can_leave_a_terminal_state() {
        let fx = fixture();
        let appt = book(&fx);
        fx.appointments.confirm(fx.doctor, appt.id).unwrap();
        fx.appointments.finalize(fx.doctor, appt.id).unwrap();

        // permissive by design: edit may move a finalized appointment back
        let revived = fx
            .appointments
            .edit(
                fx.doctor,
                appt.id,
                EditAppointment {
                    doctor_id: fx.doctor.user_id,
                    scheduled_at: morning_slot(),
                    status: AppointmentStatus::Scheduled,
                },
            )
            .unwrap();
        assert_eq!(revived.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn edit_rejects_non_parties_and_bad_windows() {
        let fx = fixture();
        let appt = book(&fx);
        let changes = EditAppointment {
            doctor_id: fx.doctor.user_id,
            scheduled_at: morning_slot(),
            status: AppointmentStatus::Scheduled,
        };

        assert!(matches!(
            fx.appointments.edit(fx.other_patient, appt.id, changes.clone()),
            Err(ClinicError::PermissionDenied)
        ));
        assert!(matches!(
            fx.appointments.edit(fx.patient, Uuid::new_v4(), changes.clone()),
            Err(ClinicError::NotFound("appointment"))
        ));

        let mut after_hours = changes;
        after_hours.scheduled_at = NaiveDate::from_ymd_opt(2026, 3, 9)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        assert!(matches!(
            fx.appointments.edit(fx.patient, appt.id, after_hours),
            Err(ClinicError::OutsideSchedulingWindow)
        ));
    }

    #[test]
    fn edit_reports_missing_or_foreign_appointments_before_bad_times() {
        let fx = fixture();
        let appt = book(&fx);
        let after_hours = EditAppointment {
            doctor_id: fx.doctor.user_id,
            scheduled_at: NaiveDate::from_ymd_opt(2026, 3, 9)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap(),
            status: AppointmentStatus::Scheduled,
        };

        // the target is checked first, so the caller learns 404/403, not 422
        assert!(matches!(
            fx.appointments
                .edit(fx.patient, Uuid::new_v4(), after_hours.clone()),
            Err(ClinicError::NotFound("appointment"))
        ));
        assert!(matches!(
            fx.appointments.edit(fx.other_patient, appt.id, after_hours),
            Err(ClinicError::PermissionDenied)
        ));
    }

    #[test]
    fn listings_are_scoped_to_the_caller() {
        let fx = fixture();
        let mine = book(&fx);
        fx.appointments
            .schedule(fx.other_patient, fx.other_doctor.user_id, morning_slot())
            .unwrap();

        let patient_view = fx.appointments.list_for(fx.patient).unwrap();
        assert_eq!(patient_view.len(), 1);
        assert_eq!(patient_view[0].id, mine.id);

        let doctor_view = fx.appointments.list_for(fx.doctor).unwrap();
        assert_eq!(doctor_view.len(), 1);
        assert_eq!(doctor_view[0].id, mine.id);
    }
}
