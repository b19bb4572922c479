//! Free-text preference extraction.
//!
//! Every preference field is resolved from an ordered keyword table. Rules are
//! evaluated top to bottom against the lower-cased input and the first rule
//! with a matching keyword wins; unmatched fields take their defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    Conservative,
    Balanced,
    Aggressive,
}

impl Risk {
    /// Tiers in bucket output order.
    pub const ALL: [Risk; 3] = [Risk::Conservative, Risk::Balanced, Risk::Aggressive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Risk::Conservative => "conservative",
            Risk::Balanced => "balanced",
            Risk::Aggressive => "aggressive",
        }
    }

    /// Display name used for the bucket of this tier.
    pub fn bucket_name(&self) -> &'static str {
        match self {
            Risk::Conservative => "Conservative",
            Risk::Balanced => "Balanced",
            Risk::Aggressive => "Aggressive",
        }
    }
}

impl fmt::Display for Risk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_RISK: Risk = Risk::Balanced;
pub const DEFAULT_NUM_COINS: usize = 5;
pub const DEFAULT_HORIZON_DAYS: u32 = 30;

/// Coin counts recognised in text, scanned in ascending order.
pub const COIN_COUNT_RANGE: RangeInclusive<usize> = 3..=10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub risk: Risk,
    pub num_coins: usize,
    pub horizon_days: u32,
    /// Reserved; always empty.
    pub themes: Vec<String>,
    /// Reserved; always empty.
    pub exclude: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            risk: DEFAULT_RISK,
            num_coins: DEFAULT_NUM_COINS,
            horizon_days: DEFAULT_HORIZON_DAYS,
            themes: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

struct KeywordRule<T> {
    keywords: &'static [&'static str],
    value: T,
}

const RISK_RULES: &[KeywordRule<Risk>] = &[
    KeywordRule {
        keywords: &["conservative", "low risk"],
        value: Risk::Conservative,
    },
    KeywordRule {
        keywords: &["aggressive", "high risk"],
        value: Risk::Aggressive,
    },
];

const HORIZON_RULES: &[KeywordRule<u32>] = &[
    KeywordRule {
        keywords: &["90 day", "3 month", "quarter"],
        value: 90,
    },
    KeywordRule {
        keywords: &["7 day", "1 week"],
        value: 7,
    },
    KeywordRule {
        keywords: &["year", "12 month"],
        value: 365,
    },
];

fn first_match<T: Copy>(text: &str, rules: &[KeywordRule<T>]) -> Option<T> {
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| text.contains(k)))
        .map(|rule| rule.value)
}

fn coin_count_patterns(n: usize) -> [String; 3] {
    [format!("{n} coin"), format!("{n} coins"), format!("top {n}")]
}

fn match_coin_count(text: &str) -> Option<usize> {
    COIN_COUNT_RANGE
        .into_iter()
        .find(|&n| coin_count_patterns(n).iter().any(|p| text.contains(p.as_str())))
}

/// Extract preferences from free text. Never fails.
pub fn parse(text: &str) -> Preferences {
    let t = text.to_lowercase();

    Preferences {
        risk: first_match(&t, RISK_RULES).unwrap_or(DEFAULT_RISK),
        num_coins: match_coin_count(&t).unwrap_or(DEFAULT_NUM_COINS),
        horizon_days: first_match(&t, HORIZON_RULES).unwrap_or(DEFAULT_HORIZON_DAYS),
        themes: Vec::new(),
        exclude: Vec::new(),
    }
}
