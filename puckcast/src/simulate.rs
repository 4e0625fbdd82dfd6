//! Bankroll simulation of staking strategies over an ordered sequence of games.
//!
//! Both strategies share one decision loop: for each game, in order, the home side is considered
//! first and the away side only if home does not qualify. A qualifying side is then sized; a
//! suppressed stake means no bet for that game. Placed bets are settled against the realised
//! outcome and their profit is carried into the running bankroll, so the ledger depends on the
//! order of the games.

use std::thread;

use anyhow::bail;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::game::{GameOdds, Side};
use crate::kelly::kelly_criterion;
use crate::ledger::{Bet, Ledger, Outcome, RunningState};
use crate::odds::AmericanOdds;
use crate::payout::calculate_payout;

/// Smallest stake the Kelly strategy will place.
pub const MIN_STAKE: f64 = 1.0;

pub trait Staking {
    fn starting_bankroll(&self) -> f64;

    /// Whether a side with the given `edge` is worth betting.
    fn qualifies(&self, edge: f64) -> bool;

    /// The stake on a qualifying side, or `None` if the bet is suppressed.
    fn stake(&self, model_prob: f64, odds: AmericanOdds, bankroll: f64) -> Option<f64>;

    fn running_state(&self, bankroll: f64) -> RunningState;
}

/// Bets a fixed amount whenever the edge reaches a threshold. The bankroll starts at zero and
/// amounts to the cumulative profit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedStake {
    pub edge_threshold: f64,
    pub bet_size: f64,
}
impl FixedStake {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.edge_threshold.is_finite() {
            bail!("edge threshold must be finite");
        }
        if !self.bet_size.is_finite() || self.bet_size <= 0.0 {
            bail!("bet size must be positive");
        }
        Ok(())
    }
}

impl Default for FixedStake {
    fn default() -> Self {
        Self {
            edge_threshold: 0.05,
            bet_size: 100.0,
        }
    }
}

impl Staking for FixedStake {
    fn starting_bankroll(&self) -> f64 {
        0.0
    }

    fn qualifies(&self, edge: f64) -> bool {
        edge >= self.edge_threshold
    }

    fn stake(&self, _: f64, _: AmericanOdds, _: f64) -> Option<f64> {
        if self.bet_size > 0.0 {
            Some(self.bet_size)
        } else {
            None
        }
    }

    fn running_state(&self, bankroll: f64) -> RunningState {
        RunningState::Cumulative {
            cumulative_profit: bankroll,
        }
    }
}

/// Bets a fraction of the full Kelly stake on any positive edge, compounding the bankroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractionalKelly {
    pub kelly_fraction: f64,
    pub starting_bankroll: f64,
}
impl FractionalKelly {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.kelly_fraction.is_finite() || self.kelly_fraction <= 0.0 {
            bail!("Kelly fraction must be positive");
        }
        if !self.starting_bankroll.is_finite() || self.starting_bankroll <= 0.0 {
            bail!("starting bankroll must be positive");
        }
        Ok(())
    }

    /// Return on the starting bankroll, in percent.
    pub fn roi(&self, bankroll: f64) -> f64 {
        (bankroll - self.starting_bankroll) / self.starting_bankroll * 100.0
    }
}

impl Default for FractionalKelly {
    fn default() -> Self {
        Self {
            kelly_fraction: 0.25,
            starting_bankroll: 10_000.0,
        }
    }
}

impl Staking for FractionalKelly {
    fn starting_bankroll(&self) -> f64 {
        self.starting_bankroll
    }

    fn qualifies(&self, edge: f64) -> bool {
        edge > 0.0
    }

    fn stake(&self, model_prob: f64, odds: AmericanOdds, bankroll: f64) -> Option<f64> {
        let stake = bankroll * kelly_criterion(model_prob, odds) * self.kelly_fraction;
        if stake >= MIN_STAKE {
            Some(stake)
        } else {
            None
        }
    }

    fn running_state(&self, bankroll: f64) -> RunningState {
        RunningState::Bankroll {
            bankroll,
            roi: self.roi(bankroll),
        }
    }
}

/// Walks the games in order under the given staking strategy.
pub fn simulate(games: &[GameOdds], staking: &impl Staking) -> Ledger {
    let mut bankroll = staking.starting_bankroll();
    let mut bets = vec![];
    for game in games {
        let edges = game.edges();
        let side = if staking.qualifies(edges.home) {
            Side::Home
        } else if staking.qualifies(edges.away) {
            Side::Away
        } else {
            trace!("no edge on game {}", game.game_id);
            continue;
        };

        let view = game.view(side);
        let Some(bet_size) = staking.stake(view.model_prob, view.odds, bankroll) else {
            debug!(
                "suppressed {side} bet on game {} (edge {:.4}, bankroll {bankroll:.2})",
                game.game_id, view.edge
            );
            continue;
        };

        let won = game.winner() == side;
        let profit = calculate_payout(bet_size, view.odds, won);
        if won && profit <= 0.0 {
            // a vanishingly short quote can settle a win to zero profit
            debug!(
                "suppressed {side} bet on game {}: win at {} pays nothing on {bet_size}",
                game.game_id, view.odds
            );
            continue;
        }
        bankroll += profit;
        debug!(
            "bet {bet_size:.2} on {side} in game {} at {}: profit {profit:.2}, bankroll {bankroll:.2}",
            game.game_id, view.odds
        );
        bets.push(Bet {
            game_id: game.game_id.clone(),
            bet_on: side,
            edge: view.edge,
            model_prob: view.model_prob,
            market_prob: view.market_prob,
            odds: view.odds,
            bet_size,
            outcome: Outcome::from(won),
            profit,
            running: staking.running_state(bankroll),
        });
    }
    debug!(
        "placed {} bets over {} games, final bankroll {bankroll:.2}",
        bets.len(),
        games.len()
    );
    Ledger {
        bets,
        final_bankroll: bankroll,
    }
}

/// Fixed-stake betting on every side whose edge reaches `edge_threshold`.
pub fn simulate_threshold_betting(games: &[GameOdds], edge_threshold: f64, bet_size: f64) -> Ledger {
    simulate(
        games,
        &FixedStake {
            edge_threshold,
            bet_size,
        },
    )
}

/// Fractional-Kelly betting on every side with a positive edge.
pub fn simulate_kelly_betting(
    games: &[GameOdds],
    kelly_fraction: f64,
    starting_bankroll: f64,
) -> Ledger {
    simulate(
        games,
        &FractionalKelly {
            kelly_fraction,
            starting_bankroll,
        },
    )
}

/// Runs an independent Kelly simulation for each fraction, concurrently. Results are returned in
/// the order of `fractions`.
pub fn sweep_kelly_fractions(
    games: &[GameOdds],
    fractions: &[f64],
    starting_bankroll: f64,
) -> Vec<(FractionalKelly, Ledger)> {
    thread::scope(|scope| {
        let handles: Vec<_> = fractions
            .iter()
            .map(|&kelly_fraction| {
                let staking = FractionalKelly {
                    kelly_fraction,
                    starting_bankroll,
                };
                scope.spawn(move || {
                    let ledger = simulate(games, &staking);
                    (staking, ledger)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}
