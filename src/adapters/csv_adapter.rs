//! CSV price history adapter.
//!
//! Reads `Date,Open,High,Low,Close,Volume` files, one bar per row, for
//! backtesting tickers that are not in the universe snapshot.

use std::path::Path;

use crate::domain::bar::Bar;
use crate::domain::error::ScreenerError;
use crate::domain::fundamentals::FundamentalsSnapshot;
use crate::domain::stock_record::StockRecord;

pub fn read_bars<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>, ScreenerError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|e| ScreenerError::Persistence {
        reason: format!("failed to open {}: {}", path.display(), e),
    })?;

    let mut bars = Vec::new();
    for row in reader.deserialize() {
        let bar: Bar = row.map_err(|e| ScreenerError::Persistence {
            reason: format!("bad row in {}: {}", path.display(), e),
        })?;
        bars.push(bar);
    }
    Ok(bars)
}

/// Build a record from a CSV history. Fundamentals are unknown apart from
/// the latest close, so only technical scoring applies.
pub fn read_record<P: AsRef<Path>>(ticker: &str, path: P) -> Result<StockRecord, ScreenerError> {
    let bars = read_bars(path)?;
    let price = bars.last().map_or(0.0, |bar| bar.close);
    Ok(StockRecord::new(
        ticker,
        bars,
        FundamentalsSnapshot::unknown(price),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    const SAMPLE: &str = "\
Date,Open,High,Low,Close,Volume
2024-06-03,100.0,102.0,99.0,101.5,1000000
2024-06-04,101.5,103.0,101.0,102.75,900000
";

    #[test]
    fn reads_bars_in_order() {
        let file = write_csv(SAMPLE);
        let bars = read_bars(file.path()).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date.to_string(), "2024-06-03");
        assert!((bars[0].close - 101.5).abs() < 1e-9);
        assert_eq!(bars[1].volume, 900000);
    }

    #[test]
    fn read_record_uses_last_close_as_price() {
        let file = write_csv(SAMPLE);
        let record = read_record("AAPL", file.path()).unwrap();

        assert_eq!(record.ticker, "AAPL");
        assert_eq!(record.bar_count(), 2);
        assert!((record.fundamentals.price - 102.75).abs() < 1e-9);
        assert_eq!(record.fundamentals.market_cap, None);
    }

    #[test]
    fn missing_file_is_persistence_error() {
        let err = read_bars("/nonexistent/history.csv").unwrap_err();
        assert!(matches!(err, ScreenerError::Persistence { .. }));
    }

    #[test]
    fn malformed_row_is_persistence_error() {
        let file = write_csv("Date,Open,High,Low,Close,Volume\nnot-a-date,1,2,3,4,5\n");
        let err = read_bars(file.path()).unwrap_err();
        assert!(matches!(err, ScreenerError::Persistence { .. }));
    }

    #[test]
    fn empty_file_yields_no_bars() {
        let file = write_csv("Date,Open,High,Low,Close,Volume\n");
        assert!(read_bars(file.path()).unwrap().is_empty());
    }
}
