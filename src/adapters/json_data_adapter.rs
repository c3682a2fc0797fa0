//! JSON universe file adapter.
//!
//! Reads the snapshot written by the data fetcher: a `last_fetch` timestamp
//! and a `stocks` map of ticker to history plus fundamentals. The whole file
//! is loaded once at construction; lookups after that are in-memory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::domain::error::ScreenerError;
use crate::domain::stock_record::StockRecord;
use crate::ports::data_port::StockDataPort;

#[derive(Debug, Deserialize)]
struct UniverseFile {
    #[serde(default)]
    last_fetch: Option<String>,
    #[serde(default)]
    stocks: BTreeMap<String, StockRecord>,
}

#[derive(Debug)]
pub struct JsonDataAdapter {
    path: PathBuf,
    universe: UniverseFile,
}

impl JsonDataAdapter {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ScreenerError> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path).map_err(|e| ScreenerError::Persistence {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        let universe: UniverseFile =
            serde_json::from_str(&content).map_err(|e| ScreenerError::Persistence {
                reason: format!("malformed universe file {}: {}", path.display(), e),
            })?;
        Ok(Self { path, universe })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record, with tickers filled in, in ticker order.
    pub fn all_records(&self) -> Vec<StockRecord> {
        self.universe
            .stocks
            .iter()
            .map(|(ticker, record)| {
                let mut record = record.clone();
                record.ticker = ticker.clone();
                record
            })
            .collect()
    }
}

impl StockDataPort for JsonDataAdapter {
    fn fetch(&self, ticker: &str) -> Result<Option<StockRecord>, ScreenerError> {
        Ok(self.universe.stocks.get(ticker).map(|record| {
            let mut record = record.clone();
            record.ticker = ticker.to_string();
            record
        }))
    }

    fn tickers(&self) -> Result<Vec<String>, ScreenerError> {
        Ok(self.universe.stocks.keys().cloned().collect())
    }

    fn last_fetch(&self) -> Result<Option<NaiveDateTime>, ScreenerError> {
        let Some(raw) = &self.universe.last_fetch else {
            return Ok(None);
        };
        // ISO 8601 first, then the space-separated form.
        let parsed = raw
            .parse::<NaiveDateTime>()
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
            .map_err(|e| ScreenerError::Persistence {
                reason: format!("bad last_fetch timestamp '{raw}': {e}"),
            })?;
        Ok(Some(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn universe_json() -> &'static str {
        r#"{
  "last_fetch": "2024-06-03T18:30:00",
  "stocks": {
    "AAPL": {
      "hist": [
        {"Date": "2024-05-31", "Open": 190.0, "High": 193.0, "Low": 189.0, "Close": 192.25, "Volume": 75000000},
        {"Date": "2024-06-03", "Open": 192.9, "High": 194.99, "Low": 192.52, "Close": 194.03, "Volume": 50080500}
      ],
      "fundamentals": {
        "eps_growth": 0.08,
        "roe": 1.47,
        "market_cap": 2980000000000.0,
        "sector": "Technology",
        "pe_ratio": 30.1,
        "price": 194.03,
        "fiftyTwoWeekHigh": 199.62,
        "twoHundredDayAverage": 181.5
      }
    },
    "XOM": {
      "hist": [],
      "fundamentals": {
        "eps_growth": null,
        "roe": null,
        "market_cap": null,
        "price": 110.0
      }
    }
  }
}"#
    }

    fn write_universe(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn fetch_returns_record_with_ticker() {
        let file = write_universe(universe_json());
        let adapter = JsonDataAdapter::open(file.path()).unwrap();

        let record = adapter.fetch("AAPL").unwrap().unwrap();
        assert_eq!(record.ticker, "AAPL");
        assert_eq!(record.hist.len(), 2);
        assert!((record.hist[1].close - 194.03).abs() < 1e-9);
        assert_eq!(record.fundamentals.sector, "Technology");
        assert!((record.fundamentals.fifty_two_week_high.unwrap() - 199.62).abs() < 1e-9);
    }

    #[test]
    fn fetch_unknown_ticker_is_none() {
        let file = write_universe(universe_json());
        let adapter = JsonDataAdapter::open(file.path()).unwrap();
        assert!(adapter.fetch("MSFT").unwrap().is_none());
    }

    #[test]
    fn missing_optional_fundamentals_default() {
        let file = write_universe(universe_json());
        let adapter = JsonDataAdapter::open(file.path()).unwrap();

        let record = adapter.fetch("XOM").unwrap().unwrap();
        assert_eq!(record.fundamentals.sector, "Unknown");
        assert_eq!(record.fundamentals.eps_growth, None);
        assert_eq!(record.fundamentals.fifty_two_week_high, None);
    }

    #[test]
    fn tickers_sorted() {
        let file = write_universe(universe_json());
        let adapter = JsonDataAdapter::open(file.path()).unwrap();
        assert_eq!(adapter.tickers().unwrap(), vec!["AAPL", "XOM"]);
    }

    #[test]
    fn last_fetch_parses_iso_timestamp() {
        let file = write_universe(universe_json());
        let adapter = JsonDataAdapter::open(file.path()).unwrap();
        let when = adapter.last_fetch().unwrap().unwrap();
        assert_eq!(when.to_string(), "2024-06-03 18:30:00");
    }

    #[test]
    fn last_fetch_absent_is_none() {
        let file = write_universe(r#"{"stocks": {}}"#);
        let adapter = JsonDataAdapter::open(file.path()).unwrap();
        assert_eq!(adapter.last_fetch().unwrap(), None);
    }

    #[test]
    fn missing_file_is_persistence_error() {
        let err = JsonDataAdapter::open("/nonexistent/stock_data.json").unwrap_err();
        assert!(matches!(err, ScreenerError::Persistence { .. }));
    }

    #[test]
    fn malformed_json_is_persistence_error() {
        let file = write_universe("{ not json");
        let err = JsonDataAdapter::open(file.path()).unwrap_err();
        assert!(matches!(err, ScreenerError::Persistence { .. }));
    }

    #[test]
    fn all_records_fills_tickers() {
        let file = write_universe(universe_json());
        let adapter = JsonDataAdapter::open(file.path()).unwrap();
        let records = adapter.all_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].ticker, "AAPL");
        assert_eq!(records[1].ticker, "XOM");
    }
}
