//! Symbol catalog read from the `[universe]` section of the config file.

use crate::domain::error::CoinbucketError;
use crate::domain::universe::parse_symbols;
use crate::ports::catalog_port::SymbolCatalogPort;
use crate::ports::config_port::ConfigPort;

pub struct ConfigCatalog {
    symbols: String,
}

impl ConfigCatalog {
    /// `None` when the config has no `[universe] symbols` entry.
    pub fn from_config(config: &dyn ConfigPort) -> Option<Self> {
        config
            .get_string("universe", "symbols")
            .map(|symbols| Self { symbols })
    }
}

impl SymbolCatalogPort for ConfigCatalog {
    fn list_symbols(&self) -> Result<Vec<String>, CoinbucketError> {
        parse_symbols(&self.symbols).map_err(|e| CoinbucketError::Catalog {
            reason: e.to_string(),
        })
    }
}
