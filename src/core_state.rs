//! Shared application state for the API layer.
//!
//! `CoreState` owns the single SQLite connection and the alert notifier.
//! It is wrapped in `Arc` at startup and handed to every handler; the
//! connection sits behind a `Mutex` held for one request's database work.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use rusqlite::Connection;

use crate::db;
use crate::monitoring::{AlertNotifier, LogNotifier};

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    conn: Mutex<Connection>,
    notifier: Arc<dyn AlertNotifier>,
    started_at: Instant,
}

impl CoreState {
    /// Wrap an already-migrated connection.
    pub fn new(conn: Connection, notifier: Arc<dyn AlertNotifier>) -> Self {
        Self {
            conn: Mutex::new(conn),
            notifier,
            started_at: Instant::now(),
        }
    }

    /// Open (and migrate) the database at `path`, logging alerts via tracing.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = db::open_database(path)?;
        tracing::info!(path = %path.display(), "Database opened");
        Ok(Self::new(conn, Arc::new(LogNotifier)))
    }

    /// In-memory database (for testing).
    pub fn in_memory() -> Result<Self, CoreError> {
        let conn = db::open_memory_database()?;
        Ok(Self::new(conn, Arc::new(LogNotifier)))
    }

    /// Acquire the connection for the duration of one unit of work.
    pub fn lock_db(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.conn.lock().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn notifier(&self) -> &dyn AlertNotifier {
        self.notifier.as_ref()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
}
