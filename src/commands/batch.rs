//! All-pangram batch command

use crate::batch::{BatchConfig, BatchReport, Beehive, OrchestratorError};
use crate::core::Word;
use crate::sink::{ResultSink, open_sink};
use log::warn;

/// Run the batch engine over `dictionary`
///
/// The database is probed once here so an unreachable store produces a single
/// warning and the workers run without persistence instead of each failing to
/// open it.
///
/// # Errors
///
/// Returns `OrchestratorError` if the workers cannot be started or reaped.
pub fn run_batch(mut config: BatchConfig, dictionary: &[Word]) -> Result<BatchReport, OrchestratorError> {
    if config.database.is_some() {
        match open_sink(config.database.as_deref()) {
            Some(probe) => {
                if let Err(e) = probe.close() {
                    warn!("{e}");
                }
            }
            None => config.database = None,
        }
    }

    Beehive::new(config)?.run(dictionary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordlists::DictionaryFilter;
    use std::fs;
    use tempfile::TempDir;

    fn config(database: Option<std::path::PathBuf>) -> BatchConfig {
        BatchConfig {
            dictionary: "words".into(),
            filter: DictionaryFilter::default(),
            database,
            workers: 1,
            verbose: false,
        }
    }

    #[test]
    fn unreachable_database_degrades() {
        let dir = TempDir::new().unwrap();
        let words = DictionaryFilter::default().words_from_text("cordial");

        let report = run_batch(config(Some(dir.path().join("missing.db"))), &words).unwrap();

        assert!(report.all_succeeded());
        assert_eq!(report.pangrams, 1);
    }

    #[test]
    fn single_worker_persists_all_rotations() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("bee.db");
        fs::File::create(&db).unwrap();
        let words = DictionaryFilter::default().words_from_text("cordial accord pelican");

        let report = run_batch(config(Some(db.clone())), &words).unwrap();
        assert!(report.all_succeeded());

        let conn = rusqlite::Connection::open(&db).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM answers", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 14);
    }
}
