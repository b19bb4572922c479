//! Allocation pipeline: preferences, universe, buckets, backtest.

use crate::domain::backtest::{self, BucketBacktestResult};
use crate::domain::bucket::{self, Bucket, SELECTION_SEED};
use crate::domain::preferences::{self, Preferences};
use crate::domain::universe;
use crate::ports::catalog_port::SymbolCatalogPort;
use crate::ports::price_port::PricePort;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    pub preferences: Preferences,
    pub buckets: Vec<Bucket>,
    pub evaluation: Vec<BucketBacktestResult>,
}

/// The four stages wired to their collaborators. Holds no state between
/// runs, so one value can serve any number of queries.
pub struct Pipeline<'a> {
    catalog: Option<&'a dyn SymbolCatalogPort>,
    prices: &'a dyn PricePort,
    seed: u64,
}

impl<'a> Pipeline<'a> {
    pub fn new(catalog: Option<&'a dyn SymbolCatalogPort>, prices: &'a dyn PricePort) -> Self {
        Self {
            catalog,
            prices,
            seed: SELECTION_SEED,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Run every stage in order. Always returns a complete result; data
    /// problems degrade individual numbers rather than failing the run.
    pub fn run(&self, user_text: &str) -> PipelineResult {
        let preferences = preferences::parse(user_text);
        info!(
            risk = %preferences.risk,
            num_coins = preferences.num_coins,
            horizon_days = preferences.horizon_days,
            "preferences parsed"
        );

        let universe = universe::get_universe(self.catalog);
        info!(symbols = universe.len(), "universe resolved");

        let buckets = bucket::build_buckets_with_seed(&universe, &preferences, self.seed);
        let evaluation = backtest::backtest(&buckets, &preferences, self.prices);

        PipelineResult {
            preferences,
            buckets,
            evaluation,
        }
    }
}
