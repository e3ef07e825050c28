//! Domain services.
//!
//! Each service receives the caller's [`Identity`](crate::models::Identity)
//! explicitly on every operation; nothing here reads ambient session state.
//! Services share the store behind a mutex, so each operation is one atomic
//! read-modify-write against SQLite.

mod identity;
mod lifecycle;
mod records;

pub use identity::{IdentityService, LoginSession, RegisterDoctor, RegisterPatient};
pub use lifecycle::{AppointmentService, EditAppointment};
pub use records::{AppointmentRecords, RecordService};

use std::sync::{Arc, Mutex, MutexGuard};

use crate::db::Database;

/// Shared handle to the store.
pub type SharedDatabase = Arc<Mutex<Database>>;

/// Locks the store, recovering from poisoning.
///
/// Every store operation is a single statement or transaction, so a panic
/// while holding the lock cannot leave half-applied state behind.
pub(crate) fn lock_store(store: &SharedDatabase) -> MutexGuard<'_, Database> {
    store.lock().unwrap_or_else(|e| e.into_inner())
}
