//! Historical price access port trait.

use crate::domain::error::CoinbucketError;
use crate::domain::price::PriceSeries;

pub trait PricePort {
    /// Full close history for `symbol`, ascending by date. Unknown symbols
    /// are an error.
    fn load_history(&self, symbol: &str) -> Result<PriceSeries, CoinbucketError>;

    /// Default implementation: last close of the history.
    fn latest_price(&self, symbol: &str) -> Result<f64, CoinbucketError> {
        let series = self.load_history(symbol)?;
        series
            .last_close()
            .ok_or_else(|| CoinbucketError::InsufficientData {
                symbol: symbol.to_string(),
                rows: 0,
                minimum: 1,
            })
    }
}
