//! Letter grading of a prediction's distance from a coin flip.

use serde::Serialize;
use strum_macros::{Display, EnumCount, EnumIter};

use crate::game::Side;

/// Grades from strongest to weakest, each with the minimum edge, in probability points, that
/// earns it.
const THRESHOLDS: [(f64, Grade); 7] = [
    (20.0, Grade::APlus),
    (17.0, Grade::A),
    (14.0, Grade::AMinus),
    (10.0, Grade::BPlus),
    (7.0, Grade::B),
    (4.0, Grade::BMinus),
    (2.0, Grade::CPlus),
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumCount, EnumIter, Display, Serialize,
)]
pub enum Grade {
    #[strum(serialize = "A+")]
    #[serde(rename = "A+")]
    APlus,
    #[strum(serialize = "A")]
    #[serde(rename = "A")]
    A,
    #[strum(serialize = "A-")]
    #[serde(rename = "A-")]
    AMinus,
    #[strum(serialize = "B+")]
    #[serde(rename = "B+")]
    BPlus,
    #[strum(serialize = "B")]
    #[serde(rename = "B")]
    B,
    #[strum(serialize = "B-")]
    #[serde(rename = "B-")]
    BMinus,
    #[strum(serialize = "C+")]
    #[serde(rename = "C+")]
    CPlus,
    #[strum(serialize = "C")]
    #[serde(rename = "C")]
    C,
}

/// Grades the magnitude of `edge`, a probability delta; its sign is ignored.
pub fn grade_from_edge(edge: f64) -> Grade {
    let points = edge.abs() * 100.0;
    THRESHOLDS
        .iter()
        .find(|(min_points, _)| points >= *min_points)
        .map(|&(_, grade)| grade)
        .unwrap_or(Grade::C)
}

/// The side a home win probability leans towards, and by how much.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Lean {
    pub side: Side,
    /// Win probability of the favoured side.
    pub prob: f64,
    /// Home win probability less one half.
    pub edge: f64,
    /// Distance from a coin flip, rescaled to `[0, 1]`.
    pub confidence: f64,
    pub grade: Grade,
}

impl Lean {
    pub fn from_home_prob(prob_home: f64) -> Self {
        let (side, prob) = if prob_home >= 0.5 {
            (Side::Home, prob_home)
        } else {
            (Side::Away, 1.0 - prob_home)
        };
        let edge = prob_home - 0.5;
        Self {
            side,
            prob,
            edge,
            confidence: edge.abs() * 2.0,
            grade: grade_from_edge(edge),
        }
    }
}
