//! Configuration validation.
//!
//! Every key is optional; present keys must hold usable values.

use crate::domain::error::CoinbucketError;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), CoinbucketError> {
    validate_price_dir(config)?;
    validate_symbols(config)?;
    validate_seed(config)?;
    validate_signal_window(config)?;
    validate_signal_threshold(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> CoinbucketError {
    CoinbucketError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_price_dir(config: &dyn ConfigPort) -> Result<(), CoinbucketError> {
    match config.get_string("data", "price_dir") {
        Some(s) if s.trim().is_empty() => {
            Err(invalid("data", "price_dir", "price_dir must not be empty"))
        }
        _ => Ok(()),
    }
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), CoinbucketError> {
    let Some(symbols) = config.get_string("universe", "symbols") else {
        return Ok(());
    };
    parse_symbols(&symbols)
        .map(|_| ())
        .map_err(|e| invalid("universe", "symbols", &e.to_string()))
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), CoinbucketError> {
    match config.get_string("buckets", "seed") {
        Some(s) if s.trim().parse::<u64>().is_err() => Err(invalid(
            "buckets",
            "seed",
            "seed must be a non-negative integer",
        )),
        _ => Ok(()),
    }
}

fn validate_signal_window(config: &dyn ConfigPort) -> Result<(), CoinbucketError> {
    if config.get_string("signal", "window").is_none() {
        return Ok(());
    }
    let value = config.get_int("signal", "window", 0);
    if value < 2 {
        return Err(invalid("signal", "window", "window must be at least 2"));
    }
    Ok(())
}

fn validate_signal_threshold(config: &dyn ConfigPort) -> Result<(), CoinbucketError> {
    if config.get_string("signal", "threshold_pct").is_none() {
        return Ok(());
    }
    let value = config.get_double("signal", "threshold_pct", -1.0);
    if value < 0.0 {
        return Err(invalid(
            "signal",
            "threshold_pct",
            "threshold_pct must be a non-negative number",
        ));
    }
    Ok(())
}
