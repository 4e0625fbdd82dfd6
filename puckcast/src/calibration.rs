//! Analysis of the model's home win probabilities against realised outcomes: accuracy by
//! confidence, calibration, and a breakdown of the wrong calls.
//!
//! A prediction is correct when it favours the side that won, the home side being favoured only
//! when its probability exceeds one half.

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::game::GameOdds;
use crate::grade::{Grade, Lean};

/// Model probability at or above which a home call counts as high-confidence.
pub const HIGH_CONFIDENCE: f64 = 0.65;

/// Model probability below which a missed home win counts as a strong miss.
pub const STRONG_MISS: f64 = 0.55;

const CONFIDENCE_EDGES: [f64; 7] = [0.5, 0.55, 0.60, 0.65, 0.70, 0.75, 1.0];
const CONFIDENCE_LABELS: [&str; 6] = ["50-55%", "55-60%", "60-65%", "65-70%", "70-75%", "75%+"];

pub fn is_correct(game: &GameOdds) -> bool {
    (game.model_prob_home > 0.5) == game.home_win
}

/// Fraction of correct predictions; zero for no games.
pub fn accuracy<'a>(games: impl IntoIterator<Item = &'a GameOdds>) -> f64 {
    let mut count = 0;
    let mut correct = 0;
    for game in games {
        count += 1;
        if is_correct(game) {
            correct += 1;
        }
    }
    ratio(correct, count)
}

fn home_win_rate(games: &[&GameOdds]) -> f64 {
    ratio(games.iter().filter(|game| game.home_win).count(), games.len())
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceBin {
    pub label: &'static str,
    pub low: f64,
    pub high: f64,
    pub count: usize,
    pub home_win_rate: f64,
    pub accuracy: f64,
}

/// Groups games by the model's home win probability into fixed confidence bands. The first band
/// is closed, the rest are open below. Probabilities under one half belong to no band; empty bands
/// are omitted.
pub fn confidence_bins(games: &[GameOdds]) -> Vec<ConfidenceBin> {
    let mut binned = vec![vec![]; CONFIDENCE_LABELS.len()];
    for game in games {
        if let Some(index) = confidence_bin_index(game.model_prob_home) {
            binned[index].push(game);
        }
    }
    binned
        .into_iter()
        .enumerate()
        .filter(|(_, games)| !games.is_empty())
        .map(|(index, games)| ConfidenceBin {
            label: CONFIDENCE_LABELS[index],
            low: CONFIDENCE_EDGES[index],
            high: CONFIDENCE_EDGES[index + 1],
            count: games.len(),
            home_win_rate: home_win_rate(&games),
            accuracy: accuracy(games.iter().copied()),
        })
        .collect()
}

fn confidence_bin_index(prob: f64) -> Option<usize> {
    if prob < CONFIDENCE_EDGES[0] {
        return None;
    }
    CONFIDENCE_EDGES
        .windows(2)
        .position(|edges| prob <= edges[1])
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationBin {
    pub low: f64,
    pub high: f64,
    pub centre: f64,
    pub count: usize,
    /// Observed home win frequency; `None` for an empty bin.
    pub home_win_rate: Option<f64>,
}

/// Splits `[0.5, 1.0]` into `n_bins` equal-width bins, each open above except the last, and
/// reports the observed home win frequency in each.
pub fn calibration_curve(games: &[GameOdds], n_bins: usize) -> Vec<CalibrationBin> {
    equal_width_bins(games, n_bins)
        .into_iter()
        .map(|bin| CalibrationBin {
            low: bin.low,
            high: bin.high,
            centre: bin.centre(),
            count: bin.games.len(),
            home_win_rate: (!bin.games.is_empty()).then(|| home_win_rate(&bin.games)),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyBin {
    pub low: f64,
    pub high: f64,
    pub centre: f64,
    pub count: usize,
    /// Accuracy within the bin; `None` unless it holds at least the minimum count of games.
    pub accuracy: Option<f64>,
}

/// Accuracy over the same binning as [`calibration_curve`], reported only for bins holding at
/// least `min_count` games.
pub fn accuracy_curve(games: &[GameOdds], n_bins: usize, min_count: usize) -> Vec<AccuracyBin> {
    equal_width_bins(games, n_bins)
        .into_iter()
        .map(|bin| AccuracyBin {
            low: bin.low,
            high: bin.high,
            centre: bin.centre(),
            count: bin.games.len(),
            accuracy: (!bin.games.is_empty() && bin.games.len() >= min_count)
                .then(|| accuracy(bin.games.iter().copied())),
        })
        .collect()
}

struct Bin<'a> {
    low: f64,
    high: f64,
    games: Vec<&'a GameOdds>,
}
impl Bin<'_> {
    fn centre(&self) -> f64 {
        (self.low + self.high) / 2.0
    }
}

fn equal_width_bins(games: &[GameOdds], n_bins: usize) -> Vec<Bin<'_>> {
    let edge = |index: usize| 0.5 + 0.5 * index as f64 / n_bins as f64;
    let mut bins: Vec<_> = (0..n_bins)
        .map(|index| Bin {
            low: edge(index),
            high: edge(index + 1),
            games: vec![],
        })
        .collect();
    for game in games {
        let prob = game.model_prob_home;
        let last = n_bins.saturating_sub(1);
        if let Some(bin) = bins.iter_mut().enumerate().find_map(|(index, bin)| {
            let within = prob >= bin.low && (prob < bin.high || (index == last && prob <= bin.high));
            within.then_some(bin)
        }) {
            bin.games.push(game);
        }
    }
    bins
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum OutcomeCategory {
    #[strum(serialize = "Correct (High Conf)")]
    CorrectHighConfidence,
    #[strum(serialize = "Correct (Low Conf)")]
    CorrectLowConfidence,
    #[strum(serialize = "Wrong (High Conf)")]
    WrongHighConfidence,
    #[strum(serialize = "Wrong (Low Conf)")]
    WrongLowConfidence,
}

pub fn categorise(game: &GameOdds) -> OutcomeCategory {
    let high = game.model_prob_home >= HIGH_CONFIDENCE;
    match (is_correct(game), high) {
        (true, true) => OutcomeCategory::CorrectHighConfidence,
        (true, false) => OutcomeCategory::CorrectLowConfidence,
        (false, true) => OutcomeCategory::WrongHighConfidence,
        (false, false) => OutcomeCategory::WrongLowConfidence,
    }
}

/// A wrong call, by direction and severity. A false negative missed a home win; a false positive
/// backed a home side that lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum ErrorType {
    #[strum(serialize = "Strong Wrong (FN)")]
    StrongWrongFalseNegative,
    #[strum(serialize = "Close Call (FN)")]
    CloseCallFalseNegative,
    #[strum(serialize = "Strong Wrong (FP)")]
    StrongWrongFalsePositive,
    #[strum(serialize = "Close Call (FP)")]
    CloseCallFalsePositive,
}

/// Classifies a wrong call; `None` if the prediction was correct.
pub fn error_type(game: &GameOdds) -> Option<ErrorType> {
    if is_correct(game) {
        return None;
    }
    let prob = game.model_prob_home;
    Some(if game.home_win {
        if prob < STRONG_MISS {
            ErrorType::StrongWrongFalseNegative
        } else {
            ErrorType::CloseCallFalseNegative
        }
    } else if prob >= HIGH_CONFIDENCE {
        ErrorType::StrongWrongFalsePositive
    } else {
        ErrorType::CloseCallFalsePositive
    })
}

/// Number of games in each outcome category, including empty ones.
pub fn category_counts(games: &[GameOdds]) -> Vec<(OutcomeCategory, usize)> {
    OutcomeCategory::iter()
        .map(|category| {
            let count = games.iter().filter(|game| categorise(game) == category).count();
            (category, count)
        })
        .collect()
}

/// Number of wrong calls of each type, including empty ones.
pub fn error_counts(games: &[GameOdds]) -> Vec<(ErrorType, usize)> {
    ErrorType::iter()
        .map(|error| {
            let count = games
                .iter()
                .filter(|game| error_type(game) == Some(error))
                .count();
            (error, count)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeSummary {
    pub grade: Grade,
    pub count: usize,
    pub accuracy: f64,
}

/// Accuracy of the predictions at each grade, strongest first. Grades with no games are omitted.
pub fn grade_breakdown(games: &[GameOdds]) -> Vec<GradeSummary> {
    Grade::iter()
        .filter_map(|grade| {
            let graded: Vec<_> = games
                .iter()
                .filter(|game| Lean::from_home_prob(game.model_prob_home).grade == grade)
                .collect();
            (!graded.is_empty()).then(|| GradeSummary {
                grade,
                count: graded.len(),
                accuracy: accuracy(graded),
            })
        })
        .collect()
}
