//! Return-on-investment metrics over a bet ledger.

use serde::Serialize;

use crate::ledger::{Bet, Outcome};
use crate::probs::SliceExt;

/// Relative magnitude below which the standard deviation of profits is treated as zero.
const STDEV_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoiMetrics {
    pub n_bets: usize,
    pub total_wagered: f64,
    pub total_profit: f64,
    pub roi_percent: f64,
    pub win_rate: f64,
    pub avg_profit_per_bet: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
}

impl RoiMetrics {
    pub fn entries(&self) -> [(&'static str, f64); 8] {
        [
            ("n_bets", self.n_bets as f64),
            ("total_wagered", self.total_wagered),
            ("total_profit", self.total_profit),
            ("roi_percent", self.roi_percent),
            ("win_rate", self.win_rate),
            ("avg_profit_per_bet", self.avg_profit_per_bet),
            ("sharpe_ratio", self.sharpe_ratio),
            ("max_drawdown", self.max_drawdown),
        ]
    }
}

/// Evaluates a ledger. When `bet_size` is given, the amount wagered is taken to be that size for
/// every bet; otherwise the recorded stakes are summed.
pub fn calculate_roi_metrics(bets: &[Bet], bet_size: Option<f64>) -> RoiMetrics {
    if bets.is_empty() {
        return RoiMetrics::default();
    }

    let n_bets = bets.len();
    let profits: Vec<_> = bets.iter().map(|bet| bet.profit).collect();
    let total_wagered = match bet_size {
        Some(bet_size) => n_bets as f64 * bet_size,
        None => bets.iter().map(|bet| bet.bet_size).sum(),
    };
    let total_profit = profits.sum();
    let roi_percent = if total_wagered > 0.0 {
        total_profit / total_wagered * 100.0
    } else {
        0.0
    };
    let wins = bets.iter().filter(|bet| bet.outcome == Outcome::Win).count();

    let cumulative = bets
        .iter()
        .map(Bet::cumulative_profit)
        .collect::<Option<Vec<_>>>()
        .unwrap_or_else(|| profits.cumulative());

    RoiMetrics {
        n_bets,
        total_wagered,
        total_profit,
        roi_percent,
        win_rate: wins as f64 / n_bets as f64,
        avg_profit_per_bet: profits.mean(),
        sharpe_ratio: sharpe_ratio(&profits),
        max_drawdown: max_drawdown(&cumulative),
    }
}

/// Mean over sample standard deviation, scaled by the square root of the number of bets. Zero
/// when there are fewer than two bets or the profits do not vary.
pub fn sharpe_ratio(profits: &[f64]) -> f64 {
    let Some(stdev) = profits.sample_stdev() else {
        return 0.0;
    };
    let mean = profits.mean();
    if stdev <= STDEV_EPSILON * f64::max(mean.abs(), 1.0) {
        return 0.0;
    }
    mean / stdev * (profits.len() as f64).sqrt()
}

/// The largest fall from a running peak of `cumulative`. The first value is the initial peak.
pub fn max_drawdown(cumulative: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_drawdown = 0.0;
    for &value in cumulative {
        peak = f64::max(peak, value);
        max_drawdown = f64::max(max_drawdown, peak - value);
    }
    max_drawdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameId, Side};
    use crate::ledger::RunningState;
    use crate::odds::AmericanOdds;
    use crate::simulate::{simulate_kelly_betting, simulate_threshold_betting};
    use crate::synthetic::Generator;
    use assert_float_eq::*;
    use tinyrand::StdRand;

    fn bet(bet_size: f64, profit: f64, running: RunningState) -> Bet {
        Bet {
            game_id: GameId::from("g"),
            bet_on: Side::Home,
            edge: 0.1,
            model_prob: 0.6,
            market_prob: 0.5,
            odds: AmericanOdds::try_from(100.0).unwrap(),
            bet_size,
            outcome: Outcome::from(profit > 0.0),
            profit,
            running,
        }
    }

    fn cumulative_bets(profits: &[f64]) -> Vec<Bet> {
        profits
            .cumulative()
            .into_iter()
            .zip(profits)
            .map(|(cumulative_profit, &profit)| {
                bet(
                    100.0,
                    profit,
                    RunningState::Cumulative { cumulative_profit },
                )
            })
            .collect()
    }

    #[test]
    fn empty_ledger_is_all_zero() {
        let metrics = calculate_roi_metrics(&[], None);
        assert_eq!(RoiMetrics::default(), metrics);
        assert!(metrics.entries().iter().all(|(_, value)| *value == 0.0));
        assert_eq!(RoiMetrics::default(), calculate_roi_metrics(&[], Some(100.0)));
    }

    #[test]
    fn drawdown_from_peak_to_trough() {
        assert_eq!(60.0, max_drawdown(&[50.0, 100.0, 40.0, 80.0]));
        assert_eq!(0.0, max_drawdown(&[]));
        assert_eq!(0.0, max_drawdown(&[10.0, 20.0, 30.0]));
        assert_eq!(70.0, max_drawdown(&[-30.0, -100.0, 0.0]));
    }

    #[test]
    fn drawdown_follows_cumulative_profit() {
        let bets = cumulative_bets(&[50.0, 50.0, -60.0, 40.0]);
        assert_eq!(60.0, calculate_roi_metrics(&bets, None).max_drawdown);
    }

    #[test]
    fn drawdown_sums_profits_without_cumulative_state() {
        let bets: Vec<_> = [50.0, 50.0, -60.0, 40.0]
            .into_iter()
            .map(|profit| {
                bet(
                    100.0,
                    profit,
                    RunningState::Bankroll {
                        bankroll: 0.0,
                        roi: 0.0,
                    },
                )
            })
            .collect();
        assert_eq!(60.0, calculate_roi_metrics(&bets, None).max_drawdown);
    }

    #[test]
    fn threshold_metrics() {
        let bets = cumulative_bets(&[100.0, -100.0, 90.0, -100.0]);
        let metrics = calculate_roi_metrics(&bets, Some(100.0));
        assert_eq!(4, metrics.n_bets);
        assert_eq!(400.0, metrics.total_wagered);
        assert_float_absolute_eq!(-10.0, metrics.total_profit, 1e-9);
        assert_float_absolute_eq!(-2.5, metrics.roi_percent, 1e-9);
        assert_eq!(0.5, metrics.win_rate);
        assert_float_absolute_eq!(-2.5, metrics.avg_profit_per_bet, 1e-9);
        assert_float_absolute_eq!(-0.0443824, metrics.sharpe_ratio, 1e-6);
        assert_eq!(110.0, metrics.max_drawdown);
    }

    #[test]
    fn wagered_from_stakes_or_fixed_size() {
        let bets = vec![
            bet(
                50.0,
                50.0,
                RunningState::Bankroll {
                    bankroll: 1_050.0,
                    roi: 5.0,
                },
            ),
            bet(
                150.0,
                -150.0,
                RunningState::Bankroll {
                    bankroll: 900.0,
                    roi: -10.0,
                },
            ),
        ];
        let summed = calculate_roi_metrics(&bets, None);
        assert_eq!(200.0, summed.total_wagered);
        assert_float_absolute_eq!(-50.0, summed.roi_percent, 1e-9);

        let fixed = calculate_roi_metrics(&bets, Some(100.0));
        assert_eq!(200.0, fixed.total_wagered);

        let fixed = calculate_roi_metrics(&bets, Some(25.0));
        assert_eq!(50.0, fixed.total_wagered);
        assert_float_absolute_eq!(-200.0, fixed.roi_percent, 1e-9);
    }

    #[test]
    fn zero_wagered_has_zero_roi() {
        let bets = cumulative_bets(&[100.0]);
        assert_eq!(0.0, calculate_roi_metrics(&bets, Some(0.0)).roi_percent);
    }

    #[test]
    fn negative_wagered_has_zero_roi() {
        let bets = cumulative_bets(&[100.0, -50.0]);
        let metrics = calculate_roi_metrics(&bets, Some(-100.0));
        assert_eq!(-200.0, metrics.total_wagered);
        assert_eq!(0.0, metrics.roi_percent);
    }

    #[test]
    fn sharpe_degenerate_cases() {
        assert_eq!(0.0, sharpe_ratio(&[]));
        assert_eq!(0.0, sharpe_ratio(&[100.0]));
        assert_eq!(0.0, sharpe_ratio(&[100.0, 100.0, 100.0]));
        assert_eq!(0.0, sharpe_ratio(&[0.1 + 0.2, 0.3, 0.3]));
        assert_float_absolute_eq!(0.0, sharpe_ratio(&[100.0, -100.0]), 1e-12);
    }

    #[test]
    fn metrics_over_simulated_ledgers() {
        let games = Generator::new(StdRand::default()).games(1_000);

        let ledger = simulate_threshold_betting(&games, 0.05, 100.0);
        let metrics = calculate_roi_metrics(&ledger.bets, Some(100.0));
        assert_eq!(ledger.bets.len(), metrics.n_bets);
        assert_float_absolute_eq!(ledger.final_bankroll, metrics.total_profit, 1e-6);
        assert!((0.0..=1.0).contains(&metrics.win_rate));
        assert!(metrics.max_drawdown >= 0.0);

        let ledger = simulate_kelly_betting(&games, 0.25, 10_000.0);
        let metrics = calculate_roi_metrics(&ledger.bets, None);
        assert_float_absolute_eq!(
            ledger.final_bankroll - 10_000.0,
            metrics.total_profit,
            1e-6
        );
        assert!(metrics.max_drawdown >= 0.0);
    }
}
