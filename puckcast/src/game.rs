//! Game-odds records and their validation at the boundary where upstream data enters the engine.

use std::fmt::{Display, Formatter};
use std::path::Path;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;
use thiserror::Error;
use tracing::{debug, warn};

use crate::csv::CsvReader;
use crate::odds::{remove_vig_proportional, AmericanOdds, OddsError};

/// Opaque game identifier. Defaults to the row position when the source omits it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl From<usize> for GameId {
    fn from(row: usize) -> Self {
        Self(row.to_string())
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for GameId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for GameId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}
impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidGame {
    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("{field} is not numeric: '{value}'")]
    NotNumeric { field: &'static str, value: String },

    #[error("{field}: {source}")]
    InvalidOdds {
        field: &'static str,
        #[source]
        source: OddsError,
    },

    #[error("{field} {value} is outside [0, 1]")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },

    #[error("home_win must be 0 or 1, got '{0}'")]
    InvalidOutcome(String),
}

/// One game as the engine sees it: the quoted odds for both sides, the model's and the market's
/// (de-vigged) home win probabilities, and the realised outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameOdds {
    pub game_id: GameId,
    pub home_odds: AmericanOdds,
    pub away_odds: AmericanOdds,
    pub model_prob_home: f64,
    pub market_prob_home: f64,
    pub home_win: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edges {
    pub home: f64,
    pub away: f64,
}

/// A game restated from the perspective of one side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideView {
    pub side: Side,
    pub model_prob: f64,
    pub market_prob: f64,
    pub odds: AmericanOdds,
    pub edge: f64,
}

impl GameOdds {
    pub fn new(
        game_id: impl Into<GameId>,
        home_odds: f64,
        away_odds: f64,
        model_prob_home: f64,
        market_prob_home: f64,
        home_win: bool,
    ) -> Result<Self, InvalidGame> {
        Ok(Self {
            game_id: game_id.into(),
            home_odds: validate_odds("home_odds", home_odds)?,
            away_odds: validate_odds("away_odds", away_odds)?,
            model_prob_home: validate_prob("model_prob_home", model_prob_home)?,
            market_prob_home: validate_prob("market_prob_home", market_prob_home)?,
            home_win,
        })
    }

    /// Probability edges of the model over the market. The away edge is derived from the complements
    /// rather than by negating the home edge.
    pub fn edges(&self) -> Edges {
        Edges {
            home: self.model_prob_home - self.market_prob_home,
            away: (1.0 - self.model_prob_home) - (1.0 - self.market_prob_home),
        }
    }

    pub fn view(&self, side: Side) -> SideView {
        let edges = self.edges();
        match side {
            Side::Home => SideView {
                side,
                model_prob: self.model_prob_home,
                market_prob: self.market_prob_home,
                odds: self.home_odds,
                edge: edges.home,
            },
            Side::Away => SideView {
                side,
                model_prob: 1.0 - self.model_prob_home,
                market_prob: 1.0 - self.market_prob_home,
                odds: self.away_odds,
                edge: edges.away,
            },
        }
    }

    pub fn winner(&self) -> Side {
        if self.home_win {
            Side::Home
        } else {
            Side::Away
        }
    }
}

fn validate_odds(field: &'static str, value: f64) -> Result<AmericanOdds, InvalidGame> {
    AmericanOdds::try_from(value).map_err(|source| InvalidGame::InvalidOdds { field, source })
}

fn validate_prob(field: &'static str, value: f64) -> Result<f64, InvalidGame> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(InvalidGame::ProbabilityOutOfRange { field, value })
    }
}

/// An unvalidated record, as read from a file. Blank fields are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGame {
    pub game_id: Option<String>,
    pub home_odds: Option<String>,
    pub away_odds: Option<String>,
    pub model_prob_home: Option<String>,
    pub market_prob_home: Option<String>,
    pub home_win: Option<String>,
}

impl RawGame {
    /// Validates the record found at position `row`. A missing market probability is derived from
    /// the two quotes by proportional vig removal.
    pub fn validate(self, row: usize) -> Result<GameOdds, InvalidGame> {
        let game_id = self.game_id.map(GameId::from).unwrap_or_else(|| GameId::from(row));
        let home_odds = validate_odds("home_odds", parse_number("home_odds", self.home_odds)?)?;
        let away_odds = validate_odds("away_odds", parse_number("away_odds", self.away_odds)?)?;
        let model_prob_home =
            validate_prob("model_prob_home", parse_number("model_prob_home", self.model_prob_home)?)?;
        let market_prob_home = match self.market_prob_home {
            Some(market_prob_home) => validate_prob(
                "market_prob_home",
                parse_number("market_prob_home", Some(market_prob_home))?,
            )?,
            None => {
                remove_vig_proportional(
                    home_odds.implied_probability(),
                    away_odds.implied_probability(),
                )
                .map_err(|source| InvalidGame::InvalidOdds {
                    field: "market_prob_home",
                    source,
                })?
                .0
            }
        };
        let home_win = parse_outcome(self.home_win)?;
        Ok(GameOdds {
            game_id,
            home_odds,
            away_odds,
            model_prob_home,
            market_prob_home,
            home_win,
        })
    }
}

fn parse_number(field: &'static str, value: Option<String>) -> Result<f64, InvalidGame> {
    let value = value.ok_or(InvalidGame::MissingField(field))?;
    value.trim().parse().map_err(|_| InvalidGame::NotNumeric {
        field,
        value: value.clone(),
    })
}

fn parse_outcome(value: Option<String>) -> Result<bool, InvalidGame> {
    let value = value.ok_or(InvalidGame::MissingField("home_win"))?;
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        number => match number.parse::<f64>() {
            Ok(flag) if flag == 1.0 => Ok(true),
            Ok(flag) if flag == 0.0 => Ok(false),
            _ => Err(InvalidGame::InvalidOutcome(value.clone())),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub row: usize,
    pub reason: InvalidGame,
}

impl Display for Rejected {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {}", self.row, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum GameSetError {
    #[error("all {rejected} games were rejected, the first at {first}")]
    AllRejected { rejected: usize, first: Rejected },
}

/// The validated games, in input order, alongside the rows that failed validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameSet {
    pub games: Vec<GameOdds>,
    pub rejected: Vec<Rejected>,
}

/// Validates each record, skipping (and reporting) the malformed ones. Fails only when records were
/// supplied and none of them survived.
pub fn load_games(rows: impl IntoIterator<Item = RawGame>) -> Result<GameSet, GameSetError> {
    let mut set = GameSet::default();
    for (row, raw) in rows.into_iter().enumerate() {
        match raw.validate(row) {
            Ok(game) => set.games.push(game),
            Err(reason) => {
                warn!("skipping row {row}: {reason}");
                set.rejected.push(Rejected { row, reason });
            }
        }
    }

    if set.games.is_empty() && !set.rejected.is_empty() {
        let rejected = set.rejected.len();
        let first = set.rejected.swap_remove(0);
        return Err(GameSetError::AllRejected { rejected, first });
    }
    debug!(
        "loaded {} games, rejected {}",
        set.games.len(),
        set.rejected.len()
    );
    Ok(set)
}

#[derive(Debug, Clone, PartialEq)]
struct Columns {
    game_id: Option<usize>,
    home_odds: usize,
    away_odds: usize,
    model_prob_home: usize,
    market_prob_home: Option<usize>,
    home_win: usize,
}
impl Columns {
    fn from_header(header: &[String]) -> anyhow::Result<Self> {
        let find = |name: &str| header.iter().position(|column| column.trim() == name);
        let require = |name: &str| find(name).ok_or(anyhow!("missing column '{name}'"));
        Ok(Self {
            game_id: find("game_id"),
            home_odds: require("home_odds")?,
            away_odds: require("away_odds")?,
            model_prob_home: require("model_prob_home")?,
            market_prob_home: find("market_prob_home"),
            home_win: require("home_win")?,
        })
    }

    fn extract(&self, record: &[String]) -> RawGame {
        let cell = |index: usize| {
            record
                .get(index)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(ToString::to_string)
        };
        RawGame {
            game_id: self.game_id.and_then(cell),
            home_odds: cell(self.home_odds),
            away_odds: cell(self.away_odds),
            model_prob_home: cell(self.model_prob_home),
            market_prob_home: self.market_prob_home.and_then(cell),
            home_win: cell(self.home_win),
        }
    }
}

/// Reads games from a CSV file with a header row naming the columns `game_id` (optional),
/// `home_odds`, `away_odds`, `model_prob_home`, `market_prob_home` (optional) and `home_win`.
pub fn read_csv(path: impl AsRef<Path>) -> anyhow::Result<GameSet> {
    let path = path.as_ref();
    let mut reader =
        CsvReader::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let header = reader
        .read()
        .ok_or(anyhow!("{} is empty", path.display()))??;
    let columns = Columns::from_header(&header)?;

    let mut rows = vec![];
    for record in reader {
        let record = record?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        rows.push(columns.extract(&record));
    }
    Ok(load_games(rows)?)
}

#[cfg(test)]
mod tests;
