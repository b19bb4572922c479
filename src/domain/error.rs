//! Domain error types.

/// Top-level error type for coinbucket.
///
/// The allocation pipeline itself never returns these; they surface only from
/// adapters (config files, price directories, report output) and the CLI.
#[derive(Debug, thiserror::Error)]
pub enum CoinbucketError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("price data error for {symbol}: {reason}")]
    PriceData { symbol: String, reason: String },

    #[error("symbol catalog error: {reason}")]
    Catalog { reason: String },

    #[error("insufficient data for {symbol}: have {rows} rows, need {minimum}")]
    InsufficientData {
        symbol: String,
        rows: usize,
        minimum: usize,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CoinbucketError> for std::process::ExitCode {
    fn from(err: &CoinbucketError) -> Self {
        let code: u8 = match err {
            CoinbucketError::Io(_) | CoinbucketError::Report { .. } => 1,
            CoinbucketError::ConfigParse { .. } | CoinbucketError::ConfigInvalid { .. } => 2,
            CoinbucketError::PriceData { .. } | CoinbucketError::Catalog { .. } => 3,
            CoinbucketError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
