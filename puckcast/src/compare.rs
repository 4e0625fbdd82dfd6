//! Scoring of the model's home win probabilities against the market's, over realised outcomes.

use serde::Serialize;
use thiserror::Error;

use crate::game::GameOdds;
use crate::probs::{clip, SliceExt};

/// Probabilities are clipped to `[LOG_LOSS_EPSILON, 1 - LOG_LOSS_EPSILON]` before taking logs.
pub const LOG_LOSS_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("no games to evaluate")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelMarketComparison {
    pub model_brier_score: f64,
    pub market_brier_score: f64,
    pub model_log_loss: f64,
    pub market_log_loss: f64,
    pub mean_prob_diff: f64,
    pub abs_mean_prob_diff: f64,
    pub correlation: f64,
}

impl ModelMarketComparison {
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("model_brier_score", self.model_brier_score),
            ("market_brier_score", self.market_brier_score),
            ("model_log_loss", self.model_log_loss),
            ("market_log_loss", self.market_log_loss),
            ("mean_prob_diff", self.mean_prob_diff),
            ("abs_mean_prob_diff", self.abs_mean_prob_diff),
            ("correlation", self.correlation),
        ]
    }
}

pub fn compare_model_vs_market(
    games: &[GameOdds],
) -> Result<ModelMarketComparison, EvaluationError> {
    if games.is_empty() {
        return Err(EvaluationError::Empty);
    }

    let outcomes: Vec<_> = games.iter().map(|game| game.home_win).collect();
    let model: Vec<_> = games.iter().map(|game| game.model_prob_home).collect();
    let market: Vec<_> = games.iter().map(|game| game.market_prob_home).collect();
    let diffs: Vec<_> = model.iter().zip(&market).map(|(a, b)| a - b).collect();
    let abs_diffs: Vec<_> = diffs.iter().map(|diff| diff.abs()).collect();

    Ok(ModelMarketComparison {
        model_brier_score: brier_score(&model, &outcomes),
        market_brier_score: brier_score(&market, &outcomes),
        model_log_loss: log_loss(&model, &outcomes),
        market_log_loss: log_loss(&market, &outcomes),
        mean_prob_diff: diffs.mean(),
        abs_mean_prob_diff: abs_diffs.mean(),
        correlation: correlation(&model, &market),
    })
}

/// Mean squared difference between the probabilities and the outcomes.
pub fn brier_score(probs: &[f64], outcomes: &[bool]) -> f64 {
    let squares: Vec<_> = probs
        .iter()
        .zip(outcomes)
        .map(|(&prob, &outcome)| (prob - indicator(outcome)).powi(2))
        .collect();
    squares.mean()
}

/// Mean negative log-likelihood of the outcomes.
pub fn log_loss(probs: &[f64], outcomes: &[bool]) -> f64 {
    let losses: Vec<_> = probs
        .iter()
        .zip(outcomes)
        .map(|(&prob, &outcome)| {
            let prob = clip(prob, LOG_LOSS_EPSILON);
            if outcome {
                -prob.ln()
            } else {
                -(1.0 - prob).ln()
            }
        })
        .collect();
    losses.mean()
}

/// Pearson correlation coefficient; zero if either series is constant.
pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
    let (mean_x, mean_y) = (x.mean(), y.mean());
    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let (dx, dy) = (a - mean_x, b - mean_y);
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    covariance / (var_x * var_y).sqrt()
}

fn indicator(outcome: bool) -> f64 {
    if outcome {
        1.0
    } else {
        0.0
    }
}
