//! American odds, implied probabilities and removal of the bookmaker's overround.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::GameId;
use crate::probs::SliceExt;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OddsError {
    #[error("american odds of zero are not a valid quote")]
    ZeroOdds,

    #[error("american odds {0} are not finite")]
    NonFinite(f64),

    #[error("implied probabilities {home} and {away} do not form a positive booksum")]
    ZeroBooksum { home: f64, away: f64 },

    #[error("probability {0} cannot be quoted")]
    Unquotable(f64),
}

pub trait MarketPrice {
    fn decimal(&self) -> f64;
}

/// A validated American-format quote. Negative for favourites (the stake needed to win 100),
/// positive for underdogs (the profit on a stake of 100). Never zero, never non-finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct AmericanOdds(f64);

impl AmericanOdds {
    /// Quotes an implied probability, rounded to the nearest whole number as bookmakers do. Only
    /// probabilities strictly between zero and one can be quoted.
    pub fn from_probability(prob: f64) -> Result<Self, OddsError> {
        if !(prob > 0.0 && prob < 1.0) {
            return Err(OddsError::Unquotable(prob));
        }
        let value = if prob >= 0.5 {
            -(100.0 * prob / (1.0 - prob)).round()
        } else {
            (100.0 * (1.0 - prob) / prob).round()
        };
        Self::try_from(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_favourite(&self) -> bool {
        self.0 < 0.0
    }

    pub fn implied_probability(&self) -> f64 {
        if self.is_favourite() {
            let magnitude = self.0.abs();
            magnitude / (magnitude + 100.0)
        } else {
            100.0 / (self.0 + 100.0)
        }
    }

    /// Net odds: the profit per unit staked.
    pub fn net(&self) -> f64 {
        if self.is_favourite() {
            100.0 / self.0.abs()
        } else {
            self.0 / 100.0
        }
    }
}

impl MarketPrice for AmericanOdds {
    fn decimal(&self) -> f64 {
        1.0 + self.net()
    }
}

impl TryFrom<f64> for AmericanOdds {
    type Error = OddsError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            Err(OddsError::NonFinite(value))
        } else if value == 0.0 {
            Err(OddsError::ZeroOdds)
        } else {
            Ok(Self(value))
        }
    }
}

impl From<AmericanOdds> for f64 {
    fn from(odds: AmericanOdds) -> Self {
        odds.0
    }
}

impl Display for AmericanOdds {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

/// Converts American odds to the implied (vigged) probability of the quoted outcome.
pub fn american_to_probability(odds: f64) -> Result<f64, OddsError> {
    Ok(AmericanOdds::try_from(odds)?.implied_probability())
}

/// Rescales a pair of implied probabilities proportionally so that they sum to one.
pub fn remove_vig_proportional(prob_home: f64, prob_away: f64) -> Result<(f64, f64), OddsError> {
    let mut probs = [prob_home, prob_away];
    let total = probs.sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(OddsError::ZeroBooksum {
            home: prob_home,
            away: prob_away,
        });
    }
    probs.normalise(1.0);
    Ok((probs[0], probs[1]))
}

#[derive(Debug, Clone, PartialEq)]
pub struct OddsQuote {
    pub game_id: GameId,
    pub home_odds: AmericanOdds,
    pub away_odds: AmericanOdds,
}

/// A quote together with its raw and de-vigged probabilities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketLine {
    pub game_id: GameId,
    pub home_odds: AmericanOdds,
    pub away_odds: AmericanOdds,
    pub home_prob_raw: f64,
    pub away_prob_raw: f64,
    pub total_prob: f64,
    pub vig_percent: f64,
    pub market_prob_home: f64,
    pub market_prob_away: f64,
}

impl TryFrom<&OddsQuote> for MarketLine {
    type Error = OddsError;

    fn try_from(quote: &OddsQuote) -> Result<Self, Self::Error> {
        let home_prob_raw = quote.home_odds.implied_probability();
        let away_prob_raw = quote.away_odds.implied_probability();
        let total_prob = home_prob_raw + away_prob_raw;
        let (market_prob_home, market_prob_away) =
            remove_vig_proportional(home_prob_raw, away_prob_raw)?;
        Ok(Self {
            game_id: quote.game_id.clone(),
            home_odds: quote.home_odds,
            away_odds: quote.away_odds,
            home_prob_raw,
            away_prob_raw,
            total_prob,
            vig_percent: (total_prob - 1.0) * 100.0,
            market_prob_home,
            market_prob_away,
        })
    }
}

/// Derives a [`MarketLine`] for every quote, preserving order.
pub fn process_betting_odds(quotes: &[OddsQuote]) -> Result<Vec<MarketLine>, OddsError> {
    quotes.iter().map(MarketLine::try_from).collect()
}
