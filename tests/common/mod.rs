#![allow(dead_code)]

use coinbucket::domain::error::CoinbucketError;
pub use coinbucket::domain::price::{PricePoint, PriceSeries};
use coinbucket::ports::catalog_port::SymbolCatalogPort;
use coinbucket::ports::price_port::PricePort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockPricePort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
    pub requests: RefCell<Vec<String>>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_points(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_closes(self, symbol: &str, closes: &[f64]) -> Self {
        self.with_points(symbol, daily_points("2024-01-01", closes))
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn load_history(&self, symbol: &str) -> Result<PriceSeries, CoinbucketError> {
        self.requests.borrow_mut().push(symbol.to_string());
        if let Some(reason) = self.errors.get(symbol) {
            return Err(CoinbucketError::PriceData {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(points) => Ok(PriceSeries::new(symbol, points.clone())),
            None => Err(CoinbucketError::PriceData {
                symbol: symbol.to_string(),
                reason: "unknown symbol".to_string(),
            }),
        }
    }
}

pub struct MockCatalog {
    pub symbols: Result<Vec<String>, String>,
}

impl MockCatalog {
    pub fn with_symbols(symbols: &[&str]) -> Self {
        Self {
            symbols: Ok(symbols.iter().map(|s| s.to_string()).collect()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            symbols: Err(reason.to_string()),
        }
    }
}

impl SymbolCatalogPort for MockCatalog {
    fn list_symbols(&self) -> Result<Vec<String>, CoinbucketError> {
        self.symbols
            .clone()
            .map_err(|reason| CoinbucketError::Catalog { reason })
    }
}

/// One point per calendar day starting at `start_date`.
pub fn daily_points(start_date: &str, closes: &[f64]) -> Vec<PricePoint> {
    let start = chrono::NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            let date = start + chrono::Duration::days(i as i64);
            PricePoint::new(date.format("%Y-%m-%d").to_string(), *close)
        })
        .collect()
}

pub fn symbols(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("c{i}")).collect()
}
