//! JSON persistence adapters for the paper portfolio and watchlist.
//!
//! Writes go to a temporary file in the same directory and then rename over
//! the target, so a crash mid-write never leaves a torn snapshot behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::error::ScreenerError;
use crate::domain::portfolio::Portfolio;
use crate::ports::store_port::{PortfolioStore, WatchlistStore};

fn read_or_default<T: DeserializeOwned>(path: &Path, default: T) -> Result<T, ScreenerError> {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).map_err(|e| ScreenerError::Persistence {
            reason: format!("malformed {}: {}", path.display(), e),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(default),
        Err(e) => Err(ScreenerError::Persistence {
            reason: format!("failed to read {}: {}", path.display(), e),
        }),
    }
}

fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), ScreenerError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| ScreenerError::Persistence {
        reason: format!("failed to encode {}: {}", path.display(), e),
    })?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json).map_err(|e| ScreenerError::Persistence {
        reason: format!("failed to write {}: {}", tmp.display(), e),
    })?;
    fs::rename(&tmp, path).map_err(|e| ScreenerError::Persistence {
        reason: format!("failed to replace {}: {}", path.display(), e),
    })
}

pub struct JsonPortfolioStore {
    path: PathBuf,
}

impl JsonPortfolioStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PortfolioStore for JsonPortfolioStore {
    fn load(&self) -> Result<Portfolio, ScreenerError> {
        read_or_default(&self.path, Portfolio::default())
    }

    fn save(&self, portfolio: &Portfolio) -> Result<(), ScreenerError> {
        write_atomic(&self.path, portfolio)
    }
}

pub struct JsonWatchlistStore {
    path: PathBuf,
}

impl JsonWatchlistStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl WatchlistStore for JsonWatchlistStore {
    fn load(&self) -> Result<Vec<String>, ScreenerError> {
        read_or_default(&self.path, Vec::new())
    }

    fn save(&self, tickers: &[String]) -> Result<(), ScreenerError> {
        write_atomic(&self.path, &tickers)
    }
}
