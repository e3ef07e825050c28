//! SQLite-backed store.
//!
//! One [`Database`] wraps one connection; callers share it behind
//! `Arc<Mutex<_>>` so each operation is a single atomic read-modify-write
//! (last write wins, no optimistic versioning). Per-entity operations live in
//! the sibling modules.

mod appointments;
mod records;
mod schema;
mod users;

pub use schema::SCHEMA;

use std::path::Path;

use rusqlite::Connection;

use crate::error::ClinicResult;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `path`, creating the file and schema if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> ClinicResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> ClinicResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    fn initialize(&self) -> ClinicResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Raw connection, for queries the typed operations do not cover.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}
