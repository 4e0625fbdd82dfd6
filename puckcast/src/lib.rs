//! Betting-edge engine for NHL moneylines. Converts American odds to de-vigged market
//! probabilities, compares them with a model's home win probabilities, and backtests fixed-stake
//! and fractional-Kelly strategies over a season of games.

pub mod calibration;
pub mod compare;
pub mod config;
pub mod csv;
pub mod file;
pub mod game;
pub mod grade;
pub mod kelly;
pub mod ledger;
pub mod metrics;
pub mod odds;
pub mod payout;
pub mod print;
pub mod probs;
pub mod simulate;
pub mod synthetic;

#[doc = include_str!("../../README.md")]
#[cfg(doc)]
fn readme() {}
