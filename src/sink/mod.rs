//! Result persistence
//!
//! Workers hand every [`ResultRecord`] to a [`ResultSink`]. Without a database the
//! [`NullSink`] swallows them; with one, [`SqliteSink`] appends them to the
//! `answers` table, one exclusive transaction per pangram.

mod sqlite;

pub use sqlite::{SqliteSink, open_sink};

use crate::core::Word;
use thiserror::Error;

/// One rotation's answers, as persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub middle_letter: char,
    /// Canonical (sorted) pangram letters
    pub pangram: String,
    /// Accepted words, sorted
    pub matches: Vec<String>,
    pub pid: u32,
}

impl ResultRecord {
    #[must_use]
    pub fn new(middle_letter: char, pangram: String, matches: &[&Word], pid: u32) -> Self {
        Self {
            middle_letter,
            pangram,
            matches: matches.iter().map(|w| w.text().to_string()).collect(),
            pid,
        }
    }

    /// Matches joined with single spaces, the stored form
    #[must_use]
    pub fn joined_matches(&self) -> String {
        self.matches.join(" ")
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("could not open result store: {0}")]
    Open(#[source] rusqlite::Error),
    #[error("could not begin transaction: {0}")]
    Begin(#[source] rusqlite::Error),
    #[error("could not write record: {0}")]
    Write(#[source] rusqlite::Error),
    #[error("could not commit: {0}")]
    Commit(#[source] rusqlite::Error),
    #[error("could not close result store: {0}")]
    Close(#[source] rusqlite::Error),
}

/// Destination for worker results
///
/// Implementations serialise their own access; callers bracket each pangram
/// with `begin` and `commit`.
pub trait ResultSink {
    /// Start the transaction that will hold one pangram's seven records
    ///
    /// # Errors
    /// Returns `SinkError::Begin` if the store refuses the transaction.
    fn begin(&self) -> Result<(), SinkError>;

    /// Append one record to the open transaction
    ///
    /// # Errors
    /// Returns `SinkError::Write` if the record cannot be stored.
    fn write(&self, record: &ResultRecord) -> Result<(), SinkError>;

    /// Make the open transaction durable
    ///
    /// # Errors
    /// Returns `SinkError::Commit`; workers treat this as fatal.
    fn commit(&self) -> Result<(), SinkError>;

    /// Release the underlying handle
    ///
    /// # Errors
    /// Returns `SinkError::Close` if the store reports an error on close.
    fn close(self) -> Result<(), SinkError>
    where
        Self: Sized;

    /// Whether records actually go anywhere
    fn is_persistent(&self) -> bool {
        true
    }
}

/// Sink used when no database is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ResultSink for NullSink {
    fn begin(&self) -> Result<(), SinkError> {
        Ok(())
    }

    fn write(&self, _record: &ResultRecord) -> Result<(), SinkError> {
        Ok(())
    }

    fn commit(&self) -> Result<(), SinkError> {
        Ok(())
    }

    fn close(self) -> Result<(), SinkError> {
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}

/// Either a real store or nothing, chosen at startup
#[derive(Debug)]
pub enum AnySink {
    Sqlite(SqliteSink),
    Null(NullSink),
}

impl AnySink {
    /// Open the store at `path`, degrading to [`NullSink`] when it is absent or unreachable
    #[must_use]
    pub fn open(path: Option<&std::path::Path>) -> Self {
        open_sink(path).map_or(Self::Null(NullSink), Self::Sqlite)
    }
}

impl ResultSink for AnySink {
    fn begin(&self) -> Result<(), SinkError> {
        match self {
            Self::Sqlite(sink) => sink.begin(),
            Self::Null(sink) => sink.begin(),
        }
    }

    fn write(&self, record: &ResultRecord) -> Result<(), SinkError> {
        match self {
            Self::Sqlite(sink) => sink.write(record),
            Self::Null(sink) => sink.write(record),
        }
    }

    fn commit(&self) -> Result<(), SinkError> {
        match self {
            Self::Sqlite(sink) => sink.commit(),
            Self::Null(sink) => sink.commit(),
        }
    }

    fn close(self) -> Result<(), SinkError> {
        match self {
            Self::Sqlite(sink) => sink.close(),
            Self::Null(sink) => sink.close(),
        }
    }

    fn is_persistent(&self) -> bool {
        matches!(self, Self::Sqlite(_))
    }
}
