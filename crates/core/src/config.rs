//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! core services. The intent is to avoid reading process-wide environment
//! variables during request handling, which can lead to inconsistent
//! behaviour in multi-threaded runtimes and test harnesses.

use std::path::{Path, PathBuf};

/// Default location of the clinic database file.
pub const DEFAULT_DB_PATH: &str = "medeasy.db";

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    db_path: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig` pointing at the given database file.
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Resolve configuration from an optional environment override.
    ///
    /// `db_path_override` is typically `std::env::var("MEDEASY_DB_PATH").ok()`,
    /// read once in `main`.
    pub fn from_env_value(db_path_override: Option<String>) -> Self {
        let db_path = db_path_override.unwrap_or_else(|| DEFAULT_DB_PATH.into());
        Self::new(PathBuf::from(db_path))
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}
