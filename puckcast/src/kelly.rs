//! Kelly-optimal sizing.

use crate::odds::AmericanOdds;

/// Fraction of the bankroll that maximises the expected log-growth of a bet won with probability
/// `model_prob` at `odds`, floored at zero: a negative fraction signals negative expected value and
/// never becomes a short position.
pub fn kelly_criterion(model_prob: f64, odds: AmericanOdds) -> f64 {
    let b = odds.net();
    let p = model_prob;
    let q = 1.0 - p;
    f64::max(0.0, (p * b - q) / b)
}
