//! Appointment store operations.

use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::Database;
use crate::error::ClinicResult;
use crate::models::{Appointment, AppointmentStatus};

const APPOINTMENT_COLUMNS: &str = "id, scheduled_at, status, patient_id, doctor_id";

fn row_to_appointment(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    let status_text: String = row.get(2)?;
    let status = AppointmentStatus::parse(&status_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown status: {status_text}").into(),
        )
    })?;

    Ok(Appointment {
        id: row.get(0)?,
        scheduled_at: row.get(1)?,
        status,
        patient_id: row.get(3)?,
        doctor_id: row.get(4)?,
    })
}

impl Database {
    /// Insert a new appointment.
    pub fn insert_appointment(&self, appointment: &Appointment) -> ClinicResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO appointments (id, scheduled_at, status, patient_id, doctor_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                appointment.id,
                appointment.scheduled_at,
                appointment.status.as_str(),
                appointment.patient_id,
                appointment.doctor_id,
            ],
        )?;
        Ok(())
    }

    /// Get an appointment by id.
    pub fn get_appointment(&self, id: Uuid) -> ClinicResult<Option<Appointment>> {
        self.conn
            .query_row(
                &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?"),
                [id],
                row_to_appointment,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Rewrite doctor, time, and status of an existing appointment.
    ///
    /// Returns whether a row was updated.
    pub fn update_appointment(&self, appointment: &Appointment) -> ClinicResult<bool> {
        let rows = self.conn.execute(
            r#"
            UPDATE appointments
            SET scheduled_at = ?2, status = ?3, doctor_id = ?4
            WHERE id = ?1
            "#,
            params![
                appointment.id,
                appointment.scheduled_at,
                appointment.status.as_str(),
                appointment.doctor_id,
            ],
        )?;
        Ok(rows > 0)
    }

    /// Set only the status of an appointment. Returns whether a row was updated.
    pub fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> ClinicResult<bool> {
        let rows = self.conn.execute(
            "UPDATE appointments SET status = ?2 WHERE id = ?1",
            params![id, status.as_str()],
        )?;
        Ok(rows > 0)
    }

    /// All appointments where `patient_id` is the patient, newest first.
    pub fn list_appointments_for_patient(&self, patient_id: Uuid) -> ClinicResult<Vec<Appointment>> {
        self.list_appointments_by("patient_id", patient_id)
    }

    /// All appointments where `doctor_id` is the doctor, newest first.
    pub fn list_appointments_for_doctor(&self, doctor_id: Uuid) -> ClinicResult<Vec<Appointment>> {
        self.list_appointments_by("doctor_id", doctor_id)
    }

    fn list_appointments_by(&self, column: &str, user_id: Uuid) -> ClinicResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE {column} = ? ORDER BY scheduled_at DESC"
        ))?;
        let appointments = stmt
            .query_map([user_id], row_to_appointment)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(appointments)
    }
}
