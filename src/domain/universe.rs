//! Universe resolution.
//!
//! The universe is the ordered list of symbols the bucket builder slices by
//! position. It comes from a symbol catalog when one is available and usable,
//! and from a fixed list of well-known symbols otherwise.

use crate::ports::catalog_port::SymbolCatalogPort;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

pub const FALLBACK_SYMBOLS: [&str; 9] = [
    "btc", "eth", "sol", "ada", "dot", "xrp", "ltc", "link", "matic",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Universe {
    symbols: Vec<String>,
}

impl Universe {
    /// Build a universe from symbols in order, dropping repeats after their
    /// first occurrence and blank entries.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let symbols = symbols
            .into_iter()
            .map(Into::into)
            .map(|s: String| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();
        Self { symbols }
    }

    pub fn fallback() -> Self {
        Self::from_symbols(FALLBACK_SYMBOLS)
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

fn fallback_rank(symbol: &str) -> usize {
    FALLBACK_SYMBOLS
        .iter()
        .position(|s| *s == symbol)
        .unwrap_or(FALLBACK_SYMBOLS.len())
}

/// Move well-known symbols to the front in fallback order. Other symbols
/// follow, keeping their relative order.
pub fn rank_by_fallback(mut symbols: Vec<String>) -> Vec<String> {
    symbols.sort_by_key(|s| fallback_rank(s));
    symbols
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

/// Parse a comma-separated symbol list, lower-casing each symbol.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_lowercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

/// Resolve the universe. Never fails and never returns an empty universe.
pub fn get_universe(catalog: Option<&dyn SymbolCatalogPort>) -> Universe {
    let Some(catalog) = catalog else {
        debug!("no symbol catalog configured, using fallback universe");
        return Universe::fallback();
    };

    match catalog.list_symbols() {
        Ok(symbols) => {
            let universe = Universe::from_symbols(symbols);
            if universe.is_empty() {
                warn!("symbol catalog is empty, using fallback universe");
                Universe::fallback()
            } else {
                debug!(symbols = universe.len(), "universe loaded from catalog");
                universe
            }
        }
        Err(e) => {
            warn!(error = %e, "symbol catalog unavailable, using fallback universe");
            Universe::fallback()
        }
    }
}
