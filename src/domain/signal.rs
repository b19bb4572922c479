//! Short-window momentum signal.

use crate::domain::error::CoinbucketError;
use crate::domain::price::PriceSeries;
use std::fmt;

pub const DEFAULT_SIGNAL_WINDOW: usize = 7;
pub const DEFAULT_THRESHOLD_PCT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    Bullish,
    Bearish,
    Sideways,
}

impl Stance {
    pub fn advice(&self) -> &'static str {
        match self {
            Stance::Bullish => "consider buying",
            Stance::Bearish => "consider selling",
            Stance::Sideways => "hold for now",
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stance::Bullish => "bullish",
            Stance::Bearish => "bearish",
            Stance::Sideways => "sideways",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MomentumSignal {
    pub symbol: String,
    pub pct_change: f64,
    pub stance: Stance,
}

/// Percentage change across the last `window` rows of `series`, classified
/// against `threshold_pct` in either direction.
pub fn momentum_signal(
    series: &PriceSeries,
    window: usize,
    threshold_pct: f64,
) -> Result<MomentumSignal, CoinbucketError> {
    let tail = &series.points[series.len().saturating_sub(window)..];

    let insufficient = || CoinbucketError::InsufficientData {
        symbol: series.symbol.clone(),
        rows: tail.len(),
        minimum: 2,
    };

    let (first, last) = match (tail.first(), tail.last()) {
        (Some(first), Some(last)) if tail.len() >= 2 => (first.close, last.close),
        _ => return Err(insufficient()),
    };
    if first.is_nan() || first <= 0.0 {
        return Err(insufficient());
    }

    let pct_change = (last - first) / first * 100.0;
    let stance = if pct_change > threshold_pct {
        Stance::Bullish
    } else if pct_change < -threshold_pct {
        Stance::Bearish
    } else {
        Stance::Sideways
    };

    Ok(MomentumSignal {
        symbol: series.symbol.clone(),
        pct_change,
        stance,
    })
}
