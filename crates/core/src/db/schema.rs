//! SQLite schema definition.

/// Complete database schema for the clinic store.
pub const SCHEMA: &str = r#"
-- Enable foreign keys (per-connection pragma; the wrapper holds one
-- long-lived connection, so running it here is sufficient)
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Users (single table, role discriminator + per-role column groups)
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    id BLOB PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('patient', 'doctor')),
    -- doctor fields
    license_number TEXT UNIQUE,
    specialty TEXT,
    -- patient fields
    cpf TEXT UNIQUE,
    birth_date TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    CHECK (
        (role = 'doctor' AND license_number IS NOT NULL AND cpf IS NULL)
        OR
        (role = 'patient' AND cpf IS NOT NULL AND license_number IS NULL)
    )
);

CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);

-- ============================================================================
-- Appointments
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    id BLOB PRIMARY KEY,
    scheduled_at TEXT NOT NULL,
    status TEXT NOT NULL
        CHECK (status IN ('scheduled', 'confirmed', 'finalized', 'cancelled')),
    patient_id BLOB NOT NULL REFERENCES users(id),
    doctor_id BLOB NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_appointments_patient ON appointments(patient_id);
CREATE INDEX IF NOT EXISTS idx_appointments_doctor ON appointments(doctor_id);

-- ============================================================================
-- Clinical records (append-only, cascade with their appointment)
-- ============================================================================

CREATE TABLE IF NOT EXISTS clinical_notes (
    id BLOB PRIMARY KEY,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    appointment_id BLOB NOT NULL REFERENCES appointments(id) ON DELETE CASCADE,
    doctor_id BLOB NOT NULL REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_notes_appointment ON clinical_notes(appointment_id);

CREATE TABLE IF NOT EXISTS prescriptions (
    id BLOB PRIMARY KEY,
    description TEXT NOT NULL,
    created_at TEXT NOT NULL,
    appointment_id BLOB NOT NULL REFERENCES appointments(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_prescriptions_appointment ON prescriptions(appointment_id);
"#;
