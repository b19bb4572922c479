//! Core domain types and logic.

pub mod backtest;
pub mod bucket;
pub mod config_validation;
pub mod error;
pub mod pipeline;
pub mod preferences;
pub mod price;
pub mod router;
pub mod signal;
pub mod universe;
