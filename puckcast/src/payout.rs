//! Settlement of a single bet.

use crate::odds::AmericanOdds;

/// Signed profit of a bet of `stake` at `odds`: the whole stake is lost on a loss; a win returns the
/// stake times the net odds.
pub fn calculate_payout(stake: f64, odds: AmericanOdds, won: bool) -> f64 {
    debug_assert!(stake >= 0.0, "stake {stake} must be non-negative");
    if !won {
        return -stake;
    }
    if odds.is_favourite() {
        stake * (100.0 / odds.value().abs())
    } else {
        stake * (odds.value() / 100.0)
    }
}
