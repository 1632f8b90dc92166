use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::Local;
use limit_book::Trade;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("failed to open journal `{path}`: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("journal write failed: {0}")]
    Write(#[from] std::io::Error),
}

/// Append-only event sink, one timestamped line per entry. Shared with the
/// matcher worker through the trade callback, hence the internal mutex.
/// Every line is flushed so a crash loses at most the line being written.
pub struct Journal {
    sink: Mutex<BufWriter<std::fs::File>>,
}

impl Journal {
    /// Opening the sink is fatal at startup when it fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| JournalError::Open {
                path: path.display().to_string(),
                source,
            })?;

        let journal = Self {
            sink: Mutex::new(BufWriter::new(file)),
        };
        journal.event(&format!("journal opened - {}", path.display()))?;
        Ok(journal)
    }

    pub fn event(&self, event: &str) -> Result<(), JournalError> {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let mut sink = self.sink.lock().unwrap();
        writeln!(sink, "[{stamp}] {event}")?;
        sink.flush()?;
        Ok(())
    }

    pub fn trade(&self, trade: &Trade) -> Result<(), JournalError> {
        self.event(&format!("TRADE: {trade}"))
    }
}
