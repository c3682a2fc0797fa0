//! INI file configuration adapter.

use std::path::{Path, PathBuf};

use configparser::ini::Ini;

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::ScreenerError;
use crate::domain::strategy::{PositionSizing, StrategyParams, DEFAULT_FIXED_SHARES};
use crate::ports::config_port::ConfigPort;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScreenerError> {
        let mut config = Ini::new();
        config
            .load(path.as_ref())
            .map_err(|reason| ScreenerError::ConfigParse {
                file: path.as_ref().display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, ScreenerError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| ScreenerError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// Empty configuration; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

/// Typed view of the configuration the application actually needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_file: PathBuf,
    pub portfolio_file: PathBuf,
    pub watchlist_file: PathBuf,
    pub error_log_file: PathBuf,
    pub strategy: StrategyParams,
    pub backtest: BacktestConfig,
}

impl Settings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, ScreenerError> {
        let path = |key: &str, default: &str| {
            PathBuf::from(
                config
                    .get_string("paths", key)
                    .unwrap_or_else(|| default.to_string()),
            )
        };

        let stop_loss_pct = config.get_double("strategy", "stop_loss_pct", 0.07);
        let trail_pct = config.get_double("strategy", "trail_pct", 0.10);
        for (key, value) in [("stop_loss_pct", stop_loss_pct), ("trail_pct", trail_pct)] {
            if value <= 0.0 || value >= 1.0 {
                return Err(ScreenerError::ConfigInvalid {
                    section: "strategy".into(),
                    key: key.into(),
                    reason: format!("{value} is not in (0, 1)"),
                });
            }
        }

        let sizing = match config.get_string("strategy", "sizing").as_deref() {
            None | Some("fixed_shares") => PositionSizing::FixedShares(
                config
                    .get_int("strategy", "shares", DEFAULT_FIXED_SHARES as i64)
                    .max(0) as u64,
            ),
            Some("cash_fraction") => {
                let fraction = config.get_double("strategy", "fraction", 0.1);
                if fraction <= 0.0 || fraction > 1.0 {
                    return Err(ScreenerError::ConfigInvalid {
                        section: "strategy".into(),
                        key: "fraction".into(),
                        reason: format!("{fraction} is not in (0, 1]"),
                    });
                }
                PositionSizing::CashFraction(fraction)
            }
            Some(other) => {
                return Err(ScreenerError::ConfigInvalid {
                    section: "strategy".into(),
                    key: "sizing".into(),
                    reason: format!("unknown sizing '{other}'"),
                });
            }
        };

        let initial_cash = config.get_double("backtest", "initial_cash", 100_000.0);
        let commission_rate = config.get_double("backtest", "commission_rate", 0.001);
        if initial_cash <= 0.0 {
            return Err(ScreenerError::ConfigInvalid {
                section: "backtest".into(),
                key: "initial_cash".into(),
                reason: format!("{initial_cash} must be positive"),
            });
        }
        if commission_rate < 0.0 {
            return Err(ScreenerError::ConfigInvalid {
                section: "backtest".into(),
                key: "commission_rate".into(),
                reason: format!("{commission_rate} must not be negative"),
            });
        }

        Ok(Settings {
            data_file: path("data_file", "stock_data.json"),
            portfolio_file: path("portfolio_file", "paper_portfolio.json"),
            watchlist_file: path("watchlist_file", "watchlist.json"),
            error_log_file: path("error_log_file", "errors.log"),
            strategy: StrategyParams {
                stop_loss_pct,
                trail_pct,
                sizing,
            },
            backtest: BacktestConfig {
                initial_cash,
                commission_rate,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[paths]
data_file = /var/data/stock_data.json

[strategy]
stop_loss_pct = 0.05
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("paths", "data_file"),
            Some("/var/data/stock_data.json".to_string())
        );
        assert_eq!(adapter.get_double("strategy", "stop_loss_pct", 0.07), 0.05);
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[paths]\n").unwrap();
        assert_eq!(adapter.get_string("paths", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nshares = abc\n").unwrap();
        assert_eq!(adapter.get_int("strategy", "shares", 42), 42);
    }

    #[test]
    fn get_bool_parses_common_spellings() {
        let adapter =
            FileConfigAdapter::from_string("[misc]\na = true\nb = no\nc = 1\n").unwrap();
        assert!(adapter.get_bool("misc", "a", false));
        assert!(!adapter.get_bool("misc", "b", true));
        assert!(adapter.get_bool("misc", "c", false));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[paths]\nerror_log_file = /tmp/errors.log\n").unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("paths", "error_log_file"),
            Some("/tmp/errors.log".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(matches!(result, Err(ScreenerError::ConfigParse { .. })));
    }

    #[test]
    fn settings_defaults_without_config() {
        let settings = Settings::from_config(&FileConfigAdapter::empty()).unwrap();
        assert_eq!(settings.data_file, PathBuf::from("stock_data.json"));
        assert_eq!(settings.portfolio_file, PathBuf::from("paper_portfolio.json"));
        assert_eq!(settings.watchlist_file, PathBuf::from("watchlist.json"));
        assert_eq!(settings.error_log_file, PathBuf::from("errors.log"));
        assert!((settings.strategy.stop_loss_pct - 0.07).abs() < 1e-12);
        assert!((settings.strategy.trail_pct - 0.10).abs() < 1e-12);
        assert_eq!(settings.strategy.sizing, PositionSizing::FixedShares(100));
        assert!((settings.backtest.initial_cash - 100_000.0).abs() < 1e-9);
        assert!((settings.backtest.commission_rate - 0.001).abs() < 1e-12);
    }

    #[test]
    fn settings_reads_overrides() {
        let content = r#"
[paths]
portfolio_file = /var/ledger.json

[strategy]
stop_loss_pct = 0.05
trail_pct = 0.15
sizing = cash_fraction
fraction = 0.25

[backtest]
initial_cash = 50000
commission_rate = 0.002
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        let settings = Settings::from_config(&adapter).unwrap();

        assert_eq!(settings.portfolio_file, PathBuf::from("/var/ledger.json"));
        assert!((settings.strategy.stop_loss_pct - 0.05).abs() < 1e-12);
        assert!((settings.strategy.trail_pct - 0.15).abs() < 1e-12);
        assert_eq!(settings.strategy.sizing, PositionSizing::CashFraction(0.25));
        assert!((settings.backtest.initial_cash - 50_000.0).abs() < 1e-9);
        assert!((settings.backtest.commission_rate - 0.002).abs() < 1e-12);
    }

    #[test]
    fn settings_rejects_out_of_range_stop() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\nstop_loss_pct = 1.5\n").unwrap();
        let err = Settings::from_config(&adapter).unwrap_err();
        assert!(matches!(err, ScreenerError::ConfigInvalid { .. }));
    }

    #[test]
    fn settings_rejects_unknown_sizing() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nsizing = martingale\n").unwrap();
        assert!(Settings::from_config(&adapter).is_err());
    }

    #[test]
    fn settings_rejects_zero_fraction() {
        let adapter = FileConfigAdapter::from_string(
            "[strategy]\nsizing = cash_fraction\nfraction = 0\n",
        )
        .unwrap();
        assert!(Settings::from_config(&adapter).is_err());
    }

    #[test]
    fn settings_rejects_negative_commission() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\ncommission_rate = -0.001\n").unwrap();
        assert!(Settings::from_config(&adapter).is_err());
    }
}
