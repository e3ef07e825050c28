//! User store operations.

use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::Database;
use crate::error::ClinicResult;
use crate::models::{Profile, Role, User};

const USER_COLUMNS: &str =
    "id, email, name, password_hash, role, license_number, specialty, cpf, birth_date";

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let role_text: String = row.get(4)?;
    let role = Role::parse(&role_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("unknown role: {role_text}").into(),
        )
    })?;

    let profile = match role {
        Role::Doctor => Profile::Doctor {
            license_number: row.get(5)?,
            specialty: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        },
        Role::Patient => Profile::Patient {
            national_id: row.get(7)?,
            birth_date: row.get(8)?,
        },
    };

    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        profile,
    })
}

impl Database {
    /// Insert a new user (patient or doctor, decided by the profile tag).
    pub fn insert_user(&self, user: &User) -> ClinicResult<()> {
        let (license_number, specialty, cpf, birth_date) = match &user.profile {
            Profile::Doctor {
                license_number,
                specialty,
            } => (
                Some(license_number.as_str()),
                Some(specialty.as_str()),
                None,
                None,
            ),
            Profile::Patient {
                national_id,
                birth_date,
            } => (None, None, Some(national_id.as_str()), Some(*birth_date)),
        };

        self.conn.execute(
            r#"
            INSERT INTO users (
                id, email, name, password_hash, role,
                license_number, specialty, cpf, birth_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                user.id,
                user.email,
                user.name,
                user.password_hash,
                user.role().as_str(),
                license_number,
                specialty,
                cpf,
                birth_date,
            ],
        )?;
        Ok(())
    }

    /// Get a user by id.
    pub fn get_user(&self, id: Uuid) -> ClinicResult<Option<User>> {
        self.conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"),
                [id],
                row_to_user,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a user by email (the login lookup).
    pub fn get_user_by_email(&self, email: &str) -> ClinicResult<Option<User>> {
        self.conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"),
                [email],
                row_to_user,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Whether any user already has this email.
    pub fn email_taken(&self, email: &str) -> ClinicResult<bool> {
        self.column_taken("email", email)
    }

    /// Whether any doctor already has this license number.
    pub fn license_number_taken(&self, license_number: &str) -> ClinicResult<bool> {
        self.column_taken("license_number", license_number)
    }

    /// Whether any patient already has this national id.
    pub fn national_id_taken(&self, national_id: &str) -> ClinicResult<bool> {
        self.column_taken("cpf", national_id)
    }

    fn column_taken(&self, column: &str, value: &str) -> ClinicResult<bool> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM users WHERE {column} = ?"),
            [value],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// All doctors, ordered by name, for the booking picker.
    pub fn list_doctors(&self) -> ClinicResult<Vec<User>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = 'doctor' ORDER BY name ASC"
        ))?;
        let doctors = stmt
            .query_map([], row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(doctors)
    }
}
