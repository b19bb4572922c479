//! Buy-and-hold bucket backtest.
//!
//! Every coin is scored by its simple close-to-close return over the horizon
//! window, and a bucket's return is the weight-sum of its coins' returns.
//! Missing or malformed data degrades a single coin to a zero return instead
//! of failing the bucket.

use crate::domain::bucket::Bucket;
use crate::domain::preferences::{Preferences, Risk};
use crate::domain::price::{PricePoint, PriceSeries, parse_date};
use crate::ports::price_port::PricePort;
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoinBacktestResult {
    pub symbol: String,
    pub weight: f64,
    pub return_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketBacktestResult {
    pub name: String,
    pub risk: Risk,
    pub total_return_pct: f64,
    pub coins: Vec<CoinBacktestResult>,
}

/// Reason a coin return could not be computed as requested.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReturnFallback {
    #[error("price fetch failed: {reason}")]
    FetchFailed { reason: String },

    #[error("unparseable date {value:?}")]
    UnparseableDate { value: String },
}

/// Round to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

fn parse_all_dates(points: &[PricePoint]) -> Result<Vec<NaiveDateTime>, ReturnFallback> {
    points
        .iter()
        .map(|p| {
            parse_date(&p.date).ok_or_else(|| ReturnFallback::UnparseableDate {
                value: p.date.clone(),
            })
        })
        .collect()
}

/// Closes sorted ascending by date: by timestamp when every date parses,
/// by raw date text otherwise.
fn ordered_closes(points: &[PricePoint]) -> Vec<f64> {
    match parse_all_dates(points) {
        Ok(dates) => {
            let mut dated: Vec<(NaiveDateTime, f64)> =
                dates.into_iter().zip(points.iter().map(|p| p.close)).collect();
            dated.sort_by_key(|(d, _)| *d);
            dated.into_iter().map(|(_, c)| c).collect()
        }
        Err(_) => {
            let mut sorted: Vec<&PricePoint> = points.iter().collect();
            sorted.sort_by(|a, b| a.date.cmp(&b.date));
            sorted.into_iter().map(|p| p.close).collect()
        }
    }
}

/// Closes on or after `last_date - horizon_days`, ascending by date.
fn horizon_closes(points: &[PricePoint], horizon_days: u32) -> Result<Vec<f64>, ReturnFallback> {
    let dates = parse_all_dates(points)?;
    let mut dated: Vec<(NaiveDateTime, f64)> =
        dates.into_iter().zip(points.iter().map(|p| p.close)).collect();
    dated.sort_by_key(|(d, _)| *d);

    let Some(&(last, _)) = dated.last() else {
        return Ok(Vec::new());
    };
    let cutoff = last
        .checked_sub_signed(Duration::days(i64::from(horizon_days)))
        .unwrap_or(NaiveDateTime::MIN);

    Ok(dated
        .into_iter()
        .filter(|(d, _)| *d >= cutoff)
        .map(|(_, c)| c)
        .collect())
}

fn simple_return(closes: &[f64]) -> f64 {
    if closes.len() < 2 {
        return 0.0;
    }
    let start = closes[0];
    let end = closes[closes.len() - 1];
    if start.is_nan() || start <= 0.0 {
        return 0.0;
    }
    (end - start) / start
}

/// Fractional return of `series` over the last `horizon_days` (e.g. 0.25 for
/// +25%). `None` evaluates the whole series.
///
/// Returns 0.0 for an empty series, fewer than two rows in the window, or a
/// non-positive starting close. Unparseable dates disable the horizon filter.
pub fn coin_return(series: &PriceSeries, horizon_days: Option<u32>) -> f64 {
    if series.is_empty() {
        return 0.0;
    }

    let closes = match horizon_days {
        Some(days) => match horizon_closes(&series.points, days) {
            Ok(closes) => closes,
            Err(fallback) => {
                warn!(symbol = %series.symbol, %fallback, "horizon filter skipped, using full series");
                ordered_closes(&series.points)
            }
        },
        None => ordered_closes(&series.points),
    };

    simple_return(&closes)
}

fn fetch_history(prices: &dyn PricePort, symbol: &str) -> Result<PriceSeries, ReturnFallback> {
    prices
        .load_history(symbol)
        .map_err(|e| ReturnFallback::FetchFailed {
            reason: e.to_string(),
        })
}

fn backtest_bucket(bucket: &Bucket, horizon_days: u32, prices: &dyn PricePort) -> BucketBacktestResult {
    let mut total = 0.0;
    let mut coins = Vec::with_capacity(bucket.coins.len());

    for coin in &bucket.coins {
        let r = match fetch_history(prices, &coin.symbol) {
            Ok(series) => coin_return(&series, Some(horizon_days)),
            Err(fallback) => {
                warn!(symbol = %coin.symbol, %fallback, "counting coin as zero return");
                0.0
            }
        };

        total += coin.weight * r;
        coins.push(CoinBacktestResult {
            symbol: coin.symbol.clone(),
            weight: round_to(coin.weight, 4),
            return_pct: round_to(r * 100.0, 2),
        });
    }

    debug!(bucket = %bucket.name, total_return = total, "bucket evaluated");

    BucketBacktestResult {
        name: bucket.name.clone(),
        risk: bucket.risk,
        total_return_pct: round_to(total * 100.0, 2),
        coins,
    }
}

/// Evaluate each bucket over `preferences.horizon_days`, preserving bucket
/// and coin order. Price fetches run one at a time.
pub fn backtest(
    buckets: &[Bucket],
    preferences: &Preferences,
    prices: &dyn PricePort,
) -> Vec<BucketBacktestResult> {
    buckets
        .iter()
        .map(|bucket| backtest_bucket(bucket, preferences.horizon_days, prices))
        .collect()
}
