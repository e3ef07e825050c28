//! Clinical note and prescription store operations.
//!
//! Both tables are append-only: there are no update or delete statements
//! here, and none exist anywhere else in the crate.

use rusqlite::{params, Row};
use uuid::Uuid;

use super::Database;
use crate::error::ClinicResult;
use crate::models::{ClinicalNote, Prescription};

fn row_to_note(row: &Row<'_>) -> rusqlite::Result<ClinicalNote> {
    Ok(ClinicalNote {
        id: row.get(0)?,
        content: row.get(1)?,
        created_at: row.get(2)?,
        appointment_id: row.get(3)?,
        doctor_id: row.get(4)?,
    })
}

fn row_to_prescription(row: &Row<'_>) -> rusqlite::Result<Prescription> {
    Ok(Prescription {
        id: row.get(0)?,
        description: row.get(1)?,
        created_at: row.get(2)?,
        appointment_id: row.get(3)?,
    })
}

impl Database {
    /// Append a clinical note.
    pub fn insert_note(&self, note: &ClinicalNote) -> ClinicResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO clinical_notes (id, content, created_at, appointment_id, doctor_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                note.id,
                note.content,
                note.created_at,
                note.appointment_id,
                note.doctor_id,
            ],
        )?;
        Ok(())
    }

    /// Append a prescription.
    pub fn insert_prescription(&self, prescription: &Prescription) -> ClinicResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO prescriptions (id, description, created_at, appointment_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                prescription.id,
                prescription.description,
                prescription.created_at,
                prescription.appointment_id,
            ],
        )?;
        Ok(())
    }

    /// Notes for an appointment, oldest first (chart reading order).
    pub fn list_notes(&self, appointment_id: Uuid) -> ClinicResult<Vec<ClinicalNote>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, content, created_at, appointment_id, doctor_id
             FROM clinical_notes WHERE appointment_id = ? ORDER BY created_at ASC",
        )?;
        let notes = stmt
            .query_map([appointment_id], row_to_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    /// Prescriptions for an appointment, newest first (display order).
    pub fn list_prescriptions(&self, appointment_id: Uuid) -> ClinicResult<Vec<Prescription>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, created_at, appointment_id
             FROM prescriptions WHERE appointment_id = ? ORDER BY created_at DESC",
        )?;
        let prescriptions = stmt
            .query_map([appointment_id], row_to_prescription)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(prescriptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Appointment, AppointmentStatus, Profile, User};
    use chrono::{Duration, NaiveDate, Utc};

    fn seed_appointment(db: &Database) -> (Uuid, Uuid) {
        let patient = User {
            id: Uuid::new_v4(),
            email: "ana@example.com".into(),
            name: "Ana".into(),
            password_hash: "sha256$00$00".into(),
            profile: Profile::Patient {
                national_id: "12345678901".into(),
                birth_date: NaiveDate::from_ymd_opt(1990, 5, 1).unwrap(),
            },
        };
        let doctor = User {
            id: Uuid::new_v4(),
            email: "bruno@example.com".into(),
            name: "Bruno".into(),
            password_hash: "sha256$00$00".into(),
            profile: Profile::Doctor {
                license_number: "CRM-1".into(),
                specialty: "Clínica geral".into(),
            },
        };
        db.insert_user(&patient).unwrap();
        db.insert_user(&doctor).unwrap();

        let appt = Appointment {
            id: Uuid::new_v4(),
            scheduled_at: NaiveDate::from_ymd_opt(2026, 3, 9)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            status: AppointmentStatus::Confirmed,
            patient_id: patient.id,
            doctor_id: doctor.id,
        };
        db.insert_appointment(&appt).unwrap();
        (appt.id, doctor.id)
    }

    #[test]
    fn notes_come_back_oldest_first() {
        let db = Database::open_in_memory().unwrap();
        let (appointment_id, doctor_id) = seed_appointment(&db);

        let base = Utc::now();
        for (offset, text) in [(2, "terceira"), (0, "primeira"), (1, "segunda")] {
            db.insert_note(&ClinicalNote {
                id: Uuid::new_v4(),
                content: text.into(),
                created_at: base + Duration::minutes(offset),
                appointment_id,
                doctor_id,
            })
            .unwrap();
        }

        let notes = db.list_notes(appointment_id).unwrap();
        let contents: Vec<_> = notes.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(contents, vec!["primeira", "segunda", "terceira"]);
    }

    #[test]
    fn prescriptions_come_back_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let (appointment_id, _) = seed_appointment(&db);

        let base = Utc::now();
        for (offset, text) in [(0, "antiga"), (5, "recente")] {
            db.insert_prescription(&Prescription {
                id: Uuid::new_v4(),
                description: text.into(),
                created_at: base + Duration::minutes(offset),
                appointment_id,
            })
            .unwrap();
        }

        let prescriptions = db.list_prescriptions(appointment_id).unwrap();
        let descriptions: Vec<_> = prescriptions.iter().map(|p| p.description.as_str()).collect();
        assert_eq!(descriptions, vec!["recente", "antiga"]);
    }

    #[test]
    fn note_requires_existing_appointment() {
        let db = Database::open_in_memory().unwrap();
        let (_, doctor_id) = seed_appointment(&db);

        let orphan = db.insert_note(&ClinicalNote {
            id: Uuid::new_v4(),
            content: "sem consulta".into(),
            created_at: Utc::now(),
            appointment_id: Uuid::new_v4(),
            doctor_id,
        });
        assert!(orphan.is_err());
    }
}
