//! Domain error taxonomy.

/// Top-level error type for canscreen.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error("no usable data for {ticker}")]
    DataUnavailable { ticker: String },

    #[error("insufficient history for {ticker}: have {bars} bars, need {minimum}")]
    InsufficientHistory {
        ticker: String,
        bars: usize,
        minimum: usize,
    },

    #[error("insufficient funds: need ${needed:.2}, have ${available:.2}")]
    InsufficientFunds { needed: f64, available: f64 },

    #[error("insufficient shares of {ticker}: requested {requested}, holding {held}")]
    InsufficientShares {
        ticker: String,
        requested: u64,
        held: u64,
    },

    #[error("persistence failure: {reason}")]
    Persistence { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ScreenerError> for std::process::ExitCode {
    fn from(err: &ScreenerError) -> Self {
        let code: u8 = match err {
            ScreenerError::Io(_) => 1,
            ScreenerError::ConfigParse { .. }
            | ScreenerError::ConfigMissing { .. }
            | ScreenerError::ConfigInvalid { .. } => 2,
            ScreenerError::Persistence { .. } => 3,
            ScreenerError::InsufficientFunds { .. }
            | ScreenerError::InsufficientShares { .. } => 4,
            ScreenerError::DataUnavailable { .. }
            | ScreenerError::InsufficientHistory { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
