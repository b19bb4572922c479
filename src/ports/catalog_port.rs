//! Symbol catalog port trait.

use crate::domain::error::CoinbucketError;

/// Source of eligible symbols. Order is significant: the bucket builder
/// slices the resulting universe by position.
pub trait SymbolCatalogPort {
    fn list_symbols(&self) -> Result<Vec<String>, CoinbucketError>;
}
