//! Risk-tiered bucket construction.
//!
//! Each tier takes a positional window of the ordered universe (head for
//! conservative, a middle slice for balanced, the tail for aggressive), picks
//! coins from it with a seeded shuffle, and weights the picks uniformly.
//! Windows may overlap when the universe is small, so tiers can share coins.

use crate::domain::preferences::{Preferences, Risk};
use crate::domain::universe::Universe;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Seed for the selection shuffle. Fixed so equal windows always yield
/// equal picks.
pub const SELECTION_SEED: u64 = 42;

pub const WEIGHT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoinAllocation {
    pub symbol: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub name: String,
    pub risk: Risk,
    pub coins: Vec<CoinAllocation>,
}

impl Bucket {
    pub fn weight_sum(&self) -> f64 {
        self.coins.iter().map(|c| c.weight).sum()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.coins.iter().map(|c| c.symbol.as_str()).collect()
    }
}

pub fn selection_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Shuffle a copy of `window` and keep the first `num_coins`, clamped to
/// `[1, window.len()]`.
pub fn select_coins<R: Rng + ?Sized>(window: &[String], num_coins: usize, rng: &mut R) -> Vec<String> {
    let mut coins = window.to_vec();
    coins.shuffle(rng);
    let count = num_coins.min(coins.len()).max(1);
    coins.truncate(count);
    coins
}

fn conservative_window(symbols: &[String], num_coins: usize) -> &[String] {
    let end = symbols.len().min(num_coins.max(3));
    &symbols[..end]
}

fn balanced_window(symbols: &[String], num_coins: usize) -> &[String] {
    let end = symbols.len().min(num_coins.saturating_mul(2));
    if end > 1 {
        &symbols[1..end]
    } else {
        symbols
    }
}

fn aggressive_window(symbols: &[String], num_coins: usize) -> &[String] {
    if symbols.len() > num_coins {
        let take = symbols.len().min(num_coins.saturating_mul(2).max(3));
        &symbols[symbols.len() - take..]
    } else {
        symbols
    }
}

fn tier_window(risk: Risk, symbols: &[String], num_coins: usize) -> &[String] {
    match risk {
        Risk::Conservative => conservative_window(symbols, num_coins),
        Risk::Balanced => balanced_window(symbols, num_coins),
        Risk::Aggressive => aggressive_window(symbols, num_coins),
    }
}

fn equal_weight(selected: Vec<String>) -> Vec<CoinAllocation> {
    if selected.is_empty() {
        return Vec::new();
    }
    let weight = 1.0 / selected.len() as f64;
    selected
        .into_iter()
        .map(|symbol| CoinAllocation { symbol, weight })
        .collect()
}

/// Build the conservative, balanced and aggressive buckets, in that order.
///
/// `preferences.risk` does not filter the output; all three tiers are always
/// returned for comparison.
pub fn build_buckets(universe: &Universe, preferences: &Preferences) -> Vec<Bucket> {
    build_buckets_with_seed(universe, preferences, SELECTION_SEED)
}

pub fn build_buckets_with_seed(
    universe: &Universe,
    preferences: &Preferences,
    seed: u64,
) -> Vec<Bucket> {
    let symbols = universe.symbols();
    let num_coins = preferences.num_coins;

    Risk::ALL
        .iter()
        .map(|&risk| {
            let window = tier_window(risk, symbols, num_coins);
            let mut rng = selection_rng(seed);
            let selected = select_coins(window, num_coins, &mut rng);
            Bucket {
                name: risk.bucket_name().to_string(),
                risk,
                coins: equal_weight(selected),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn symbols(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("c{i}")).collect()
    }

    fn prefs(num_coins: usize) -> Preferences {
        Preferences {
            num_coins,
            ..Preferences::default()
        }
    }

    #[test]
    fn three_buckets_in_tier_order() {
        let buckets = build_buckets(&Universe::fallback(), &prefs(5));
        let names: Vec<_> = buckets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Conservative", "Balanced", "Aggressive"]);
        let risks: Vec<_> = buckets.iter().map(|b| b.risk).collect();
        assert_eq!(risks, Risk::ALL.to_vec());
    }

    #[test]
    fn user_risk_does_not_filter_buckets() {
        let p = Preferences {
            risk: Risk::Aggressive,
            ..prefs(5)
        };
        assert_eq!(build_buckets(&Universe::fallback(), &p).len(), 3);
    }

    #[test]
    fn weights_uniform_and_sum_to_one() {
        for n in [1, 3, 5, 7, 10, 25] {
            for bucket in build_buckets(&Universe::fallback(), &prefs(n)) {
                assert_relative_eq!(bucket.weight_sum(), 1.0, epsilon = WEIGHT_TOLERANCE);
                let expected = 1.0 / bucket.coins.len() as f64;
                for coin in &bucket.coins {
                    assert_relative_eq!(coin.weight, expected);
                }
            }
        }
    }

    #[test]
    fn deterministic_across_calls() {
        let universe = Universe::fallback();
        let first = build_buckets(&universe, &prefs(4));
        let second = build_buckets(&universe, &prefs(4));
        assert_eq!(first, second);
    }

    #[test]
    fn select_coins_is_repeatable_for_same_seed() {
        let window = symbols(8);
        let a = select_coins(&window, 4, &mut selection_rng(SELECTION_SEED));
        let b = select_coins(&window, 4, &mut selection_rng(SELECTION_SEED));
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
        assert!(a.iter().all(|s| window.contains(s)));
    }

    #[test]
    fn select_coins_clamps_count() {
        let window = symbols(3);
        let mut rng = selection_rng(SELECTION_SEED);
        assert_eq!(select_coins(&window, 10, &mut rng).len(), 3);
        let mut rng = selection_rng(SELECTION_SEED);
        assert_eq!(select_coins(&window, 0, &mut rng).len(), 1);
    }

    #[test]
    fn select_coins_picks_distinct_symbols() {
        let window = symbols(6);
        let mut picked = select_coins(&window, 6, &mut selection_rng(7));
        picked.sort();
        let mut expected = window.clone();
        expected.sort();
        assert_eq!(picked, expected);
    }

    #[test]
    fn conservative_window_is_head() {
        let u = symbols(9);
        assert_eq!(conservative_window(&u, 2), &u[..3]);
        assert_eq!(conservative_window(&u, 5), &u[..5]);
        assert_eq!(conservative_window(&u, 20), &u[..]);
    }

    #[test]
    fn balanced_window_is_middle_slice() {
        let u = symbols(9);
        assert_eq!(balanced_window(&u, 3), &u[1..6]);
        assert_eq!(balanced_window(&u, 5), &u[1..9]);
    }

    #[test]
    fn balanced_window_falls_back_to_full_universe() {
        let single = symbols(1);
        assert_eq!(balanced_window(&single, 5), &single[..]);
        let u = symbols(9);
        assert_eq!(balanced_window(&u, 0), &u[..]);
    }

    #[test]
    fn aggressive_window_is_tail() {
        let u = symbols(9);
        assert_eq!(aggressive_window(&u, 3), &u[3..]);
        assert_eq!(aggressive_window(&u, 1), &u[6..]);
        // tail longer than the universe takes everything
        assert_eq!(aggressive_window(&u, 5), &u[..]);
        assert_eq!(aggressive_window(&u, 9), &u[..]);
    }

    #[test]
    fn count_limited_by_window_size() {
        let universe = Universe::from_symbols(symbols(4));
        let buckets = build_buckets(&universe, &prefs(10));
        let counts: Vec<_> = buckets.iter().map(|b| b.coins.len()).collect();
        // balanced window skips the head symbol
        assert_eq!(counts, vec![4, 3, 4]);
    }

    #[test]
    fn zero_coins_clamped_to_one() {
        let buckets = build_buckets(&Universe::fallback(), &prefs(0));
        for bucket in &buckets {
            assert_eq!(bucket.coins.len(), 1);
            assert_relative_eq!(bucket.coins[0].weight, 1.0);
        }
    }

    #[test]
    fn single_symbol_universe_shared_by_all_tiers() {
        let universe = Universe::from_symbols(["btc"]);
        let buckets = build_buckets(&universe, &prefs(5));
        for bucket in &buckets {
            assert_eq!(bucket.symbols(), vec!["btc"]);
            assert_relative_eq!(bucket.coins[0].weight, 1.0);
        }
    }

    #[test]
    fn tiers_draw_from_their_windows() {
        let universe = Universe::from_symbols(symbols(20));
        let u = universe.symbols();
        let buckets = build_buckets(&universe, &prefs(3));

        assert!(buckets[0].symbols().iter().all(|s| u[..3].iter().any(|w| w == s)));
        assert!(buckets[1].symbols().iter().all(|s| u[1..6].iter().any(|w| w == s)));
        assert!(buckets[2].symbols().iter().all(|s| u[14..].iter().any(|w| w == s)));
    }

    #[test]
    fn empty_universe_yields_empty_buckets() {
        let universe = Universe::from_symbols(Vec::<String>::new());
        let buckets = build_buckets(&universe, &prefs(5));
        assert_eq!(buckets.len(), 3);
        assert!(buckets.iter().all(|b| b.coins.is_empty()));
    }
}
