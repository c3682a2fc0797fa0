//! Append-only error log adapter.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::ports::log_port::ErrorLogPort;

/// Appends one line per failure. Logging is best-effort: if the log file
/// itself cannot be written the entry is dropped rather than failing the
/// operation being logged.
pub struct FileLogAdapter {
    path: PathBuf,
}

impl FileLogAdapter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ErrorLogPort for FileLogAdapter {
    fn log(&self, ticker: &str, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("{timestamp}: {ticker} - {message}\n");
        let _ = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
    }
}
