//! SQLite result store
//!
//! Each worker process opens its own connection. The connection sits behind a
//! mutex owned by the sink, so every statement runs with the guard held and the
//! guard is dropped on every exit path. Cross-process exclusion is left to
//! SQLite's exclusive transactions and the busy timeout.

use super::{ResultRecord, ResultSink, SinkError};
use log::{debug, error, warn};
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags, params};
use std::path::Path;
use std::time::Duration;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS answers (
    middle_letter TEXT NOT NULL,
    puzzle TEXT NOT NULL,
    matches TEXT NOT NULL,
    pid INTEGER NOT NULL
)";

const INSERT: &str = "INSERT INTO answers (middle_letter, puzzle, matches, pid) VALUES (?1, ?2, ?3, ?4)";

/// How long a worker waits for another worker's exclusive transaction
const BUSY_TIMEOUT: Duration = Duration::from_secs(60);

/// Append-only store backed by the `answers` table
#[derive(Debug)]
pub struct SqliteSink {
    conn: Mutex<Connection>,
}

impl SqliteSink {
    /// Open an existing database file in WAL mode
    ///
    /// The file must already exist (an empty file is fine); the `answers`
    /// table is created if it is missing.
    ///
    /// # Errors
    /// Returns `SinkError::Open` if the file is missing, is not a database, or
    /// cannot be switched to WAL mode.
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(SinkError::Open)?;

        // Sibling workers open the same file at the same moment
        conn.busy_timeout(BUSY_TIMEOUT).map_err(SinkError::Open)?;

        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(SinkError::Open)?;
        debug!("{} opened with journal_mode={mode}", path.display());

        // Constraints declared on an existing answers table are enforced at COMMIT
        conn.pragma_update(None, "foreign_keys", true).map_err(SinkError::Open)?;

        conn.execute_batch(CREATE_TABLE).map_err(SinkError::Open)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl ResultSink for SqliteSink {
    fn begin(&self) -> Result<(), SinkError> {
        let conn = self.conn.lock();
        conn.execute_batch("BEGIN EXCLUSIVE TRANSACTION")
            .map_err(SinkError::Begin)
    }

    fn write(&self, record: &ResultRecord) -> Result<(), SinkError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(INSERT).map_err(SinkError::Write)?;
        stmt.execute(params![
            record.middle_letter.to_string(),
            record.pangram,
            record.joined_matches(),
            record.pid,
        ])
        .map_err(SinkError::Write)?;
        Ok(())
    }

    fn commit(&self) -> Result<(), SinkError> {
        let conn = self.conn.lock();
        conn.execute_batch("COMMIT").map_err(|e| {
            if !conn.is_autocommit() {
                if let Err(rollback) = conn.execute_batch("ROLLBACK") {
                    error!("rollback after failed commit also failed: {rollback}");
                }
            }
            SinkError::Commit(e)
        })
    }

    fn close(self) -> Result<(), SinkError> {
        self.conn
            .into_inner()
            .close()
            .map_err(|(_, e)| SinkError::Close(e))
    }
}

/// Open the configured store, or explain why results will not be saved
///
/// Returns `None` when no path was given or the store is unreachable; the
/// caller carries on without persistence.
#[must_use]
pub fn open_sink(path: Option<&Path>) -> Option<SqliteSink> {
    let path = path?;
    match SqliteSink::open(path) {
        Ok(sink) => Some(sink),
        Err(e) => {
            warn!(
                "{} not found or is not a database ({e}); results will not be saved",
                path.display()
            );
            None
        }
    }
}
