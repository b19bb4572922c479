//! CSV file price adapter.
//!
//! One `<symbol>.csv` file per symbol with a header row. The `date` and
//! `close` columns are found by name (case-insensitive); other columns are
//! ignored.

use crate::domain::error::CoinbucketError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::domain::universe::rank_by_fallback;
use crate::ports::catalog_port::SymbolCatalogPort;
use crate::ports::price_port::PricePort;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

impl PricePort for CsvAdapter {
    fn load_history(&self, symbol: &str) -> Result<PriceSeries, CoinbucketError> {
        let price_error = |reason: String| CoinbucketError::PriceData {
            symbol: symbol.to_string(),
            reason,
        };

        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| price_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| price_error(format!("CSV header error: {}", e)))?
            .clone();

        let date_idx =
            column_index(&headers, "date").ok_or_else(|| price_error("missing date column".into()))?;
        let close_idx = column_index(&headers, "close")
            .ok_or_else(|| price_error("missing close column".into()))?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| price_error(format!("CSV parse error: {}", e)))?;

            let date = record
                .get(date_idx)
                .ok_or_else(|| price_error("missing date value".into()))?
                .trim()
                .to_string();

            let close: f64 = record
                .get(close_idx)
                .ok_or_else(|| price_error("missing close value".into()))?
                .trim()
                .parse()
                .map_err(|e| price_error(format!("invalid close value: {}", e)))?;

            points.push(PricePoint { date, close });
        }

        points.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(PriceSeries::new(symbol, points))
    }
}

impl SymbolCatalogPort for CsvAdapter {
    fn list_symbols(&self) -> Result<Vec<String>, CoinbucketError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| CoinbucketError::Catalog {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| CoinbucketError::Catalog {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                if !symbol.is_empty() {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        Ok(rank_by_fallback(symbols))
    }
}
