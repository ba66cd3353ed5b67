use crate::error::LogError;
use ssvep_core::LogRecord;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const STATE_FILE_NAME: &str = "state.csv";
pub const STATE_HEADER: [&str; 4] = ["timestamp", "iteration", "state", "notes"];

/// Append-only sink for state transitions
pub trait TrialLogger {
    /// Persists one record after every record appended before it.
    fn append(&mut self, record: &LogRecord) -> Result<(), LogError>;
}

/// Writes `state.csv`, flushing after every row.
pub struct CsvTrialLogger {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl CsvTrialLogger {
    /// Creates the file (truncating any previous one) and writes the header row.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, LogError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(STATE_HEADER)?;
        writer.flush()?;
        debug!(path = %path.display(), "opened trial log");
        Ok(Self { path, writer })
    }

    /// `state.csv` inside an experiment directory
    pub fn create_in<P: AsRef<Path>>(dir: P) -> Result<Self, LogError> {
        Self::create(dir.as_ref().join(STATE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TrialLogger for CsvTrialLogger {
    fn append(&mut self, record: &LogRecord) -> Result<(), LogError> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps records in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryLogger {
    pub records: Vec<LogRecord>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrialLogger for MemoryLogger {
    fn append(&mut self, record: &LogRecord) -> Result<(), LogError> {
        self.records.push(record.clone());
        Ok(())
    }
}
