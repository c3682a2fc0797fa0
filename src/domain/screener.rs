//! Universe screening: score, filter, rank.

use super::bar::validate_bars;
use super::score::{score, MomentumFilter, ScoreResult};
use super::stock_record::StockRecord;
use crate::ports::log_port::ErrorLogPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketCapTier {
    Large,
    Mid,
    Small,
}

impl MarketCapTier {
    /// Tier boundaries match the scoring thresholds: large above 10B, mid
    /// above 2B.
    pub fn classify(market_cap: f64) -> Self {
        if market_cap > 10e9 {
            MarketCapTier::Large
        } else if market_cap > 2e9 {
            MarketCapTier::Mid
        } else {
            MarketCapTier::Small
        }
    }
}

impl std::str::FromStr for MarketCapTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "large" => Ok(MarketCapTier::Large),
            "mid" => Ok(MarketCapTier::Mid),
            "small" => Ok(MarketCapTier::Small),
            other => Err(format!("unknown market cap tier '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScreenFilters {
    pub market_cap: Option<MarketCapTier>,
    pub sector: Option<String>,
    pub momentum: MomentumFilter,
    pub limit: Option<usize>,
}

impl ScreenFilters {
    fn keeps(&self, record: &StockRecord, result: &ScoreResult) -> bool {
        if let Some(tier) = self.market_cap {
            // Unknown caps cannot prove membership in any tier.
            match record.fundamentals.market_cap {
                Some(cap) if MarketCapTier::classify(cap) == tier => {}
                _ => return false,
            }
        }
        if let Some(sector) = &self.sector {
            if !record.fundamentals.sector.eq_ignore_ascii_case(sector) {
                return false;
            }
        }
        self.momentum.keeps(result.technical)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenRow {
    pub ticker: String,
    pub total: i32,
    pub fundamental: i32,
    pub technical: i32,
    pub sector: String,
    pub market_cap: Option<f64>,
    pub price: f64,
}

/// Score and rank a universe. Malformed records are logged against their
/// ticker and skipped; the rest of the universe still ranks. Ties on total
/// score break alphabetically so output is stable.
pub fn rank(
    records: &[StockRecord],
    filters: &ScreenFilters,
    log: &dyn ErrorLogPort,
    mut progress: impl FnMut(usize, usize, &str),
) -> Vec<ScreenRow> {
    let total = records.len();
    let mut rows = Vec::new();

    for (i, record) in records.iter().enumerate() {
        progress(i + 1, total, &record.ticker);

        if let Err(err) = validate_bars(&record.ticker, &record.hist) {
            log.log(&record.ticker, &err.to_string());
            continue;
        }

        let result = score(record);
        if !filters.keeps(record, &result) {
            continue;
        }

        rows.push(ScreenRow {
            ticker: record.ticker.clone(),
            total: result.total,
            fundamental: result.fundamental,
            technical: result.technical,
            sector: record.fundamentals.sector.clone(),
            market_cap: record.fundamentals.market_cap,
            price: record.fundamentals.price,
        });
    }

    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.ticker.cmp(&b.ticker)));
    if let Some(limit) = filters.limit {
        rows.truncate(limit);
    }
    rows
}
