//! Bet records and the ordered ledger a simulation run produces.

use std::io;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::csv::CsvWriter;
use crate::game::{GameId, Side};
use crate::odds::AmericanOdds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

impl From<bool> for Outcome {
    fn from(won: bool) -> Self {
        if won {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }
}

/// The running state recorded against each bet. The fixed-stake strategy tracks cumulative profit;
/// the Kelly strategy tracks its bankroll and the return on the starting bankroll, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RunningState {
    Cumulative { cumulative_profit: f64 },
    Bankroll { bankroll: f64, roi: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bet {
    pub game_id: GameId,
    pub bet_on: Side,
    pub edge: f64,
    pub model_prob: f64,
    pub market_prob: f64,
    pub odds: AmericanOdds,
    pub bet_size: f64,
    pub outcome: Outcome,
    pub profit: f64,
    #[serde(flatten)]
    pub running: RunningState,
}

impl Bet {
    pub fn cumulative_profit(&self) -> Option<f64> {
        match self.running {
            RunningState::Cumulative { cumulative_profit } => Some(cumulative_profit),
            RunningState::Bankroll { .. } => None,
        }
    }

    pub fn bankroll(&self) -> Option<f64> {
        match self.running {
            RunningState::Bankroll { bankroll, .. } => Some(bankroll),
            RunningState::Cumulative { .. } => None,
        }
    }
}

/// Bets in game order, together with the bankroll after the last game.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ledger {
    pub bets: Vec<Bet>,
    pub final_bankroll: f64,
}

impl Ledger {
    pub fn profits(&self) -> Vec<f64> {
        self.bets.iter().map(|bet| bet.profit).collect()
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), io::Error> {
        let mut writer = CsvWriter::create(path)?;
        self.write_to(&mut writer)?;
        writer.flush()
    }

    pub fn write_to<W: Write>(&self, writer: &mut CsvWriter<W>) -> Result<(), io::Error> {
        let mut header = vec![
            "game_id",
            "bet_on",
            "edge",
            "model_prob",
            "market_prob",
            "odds",
            "bet_size",
            "outcome",
            "profit",
        ];
        match self.bets.first().map(|bet| bet.running) {
            Some(RunningState::Bankroll { .. }) => header.extend(["bankroll", "roi"]),
            _ => header.push("cumulative_profit"),
        }
        writer.append(header)?;

        for bet in &self.bets {
            let mut record = vec![
                bet.game_id.to_string(),
                bet.bet_on.to_string(),
                format!("{:.6}", bet.edge),
                format!("{:.6}", bet.model_prob),
                format!("{:.6}", bet.market_prob),
                bet.odds.value().to_string(),
                format!("{:.2}", bet.bet_size),
                bet.outcome.to_string(),
                format!("{:.2}", bet.profit),
            ];
            match bet.running {
                RunningState::Cumulative { cumulative_profit } => {
                    record.push(format!("{cumulative_profit:.2}"))
                }
                RunningState::Bankroll { bankroll, roi } => {
                    record.push(format!("{bankroll:.2}"));
                    record.push(format!("{roi:.4}"));
                }
            }
            writer.append(record)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bet(running: RunningState) -> Bet {
        Bet {
            game_id: GameId::from("2023020001"),
            bet_on: Side::Home,
            edge: 0.12,
            model_prob: 0.7,
            market_prob: 0.58,
            odds: AmericanOdds::try_from(-150.0).unwrap(),
            bet_size: 100.0,
            outcome: Outcome::Win,
            profit: 200.0 / 3.0,
            running,
        }
    }

    #[test]
    fn outcome_from_bool() {
        assert_eq!(Outcome::Win, Outcome::from(true));
        assert_eq!(Outcome::Loss, Outcome::from(false));
        assert_eq!("loss", Outcome::Loss.to_string());
    }

    #[test]
    fn running_state_accessors() {
        let threshold = bet(RunningState::Cumulative {
            cumulative_profit: 66.0,
        });
        assert_eq!(Some(66.0), threshold.cumulative_profit());
        assert_eq!(None, threshold.bankroll());

        let kelly = bet(RunningState::Bankroll {
            bankroll: 10_066.0,
            roi: 0.66,
        });
        assert_eq!(None, kelly.cumulative_profit());
        assert_eq!(Some(10_066.0), kelly.bankroll());
    }

    #[test]
    fn serialises_flat() {
        let json = serde_json::to_value(bet(RunningState::Bankroll {
            bankroll: 10_066.0,
            roi: 0.66,
        }))
        .unwrap();
        assert_eq!("home", json["bet_on"]);
        assert_eq!("win", json["outcome"]);
        assert_eq!(-150.0, json["odds"]);
        assert_eq!(10_066.0, json["bankroll"]);
        assert_eq!(0.66, json["roi"]);
        assert!(json.get("running").is_none());
        assert!(json.get("cumulative_profit").is_none());
    }

    #[test]
    fn writes_csv() {
        let ledger = Ledger {
            bets: vec![bet(RunningState::Cumulative {
                cumulative_profit: 200.0 / 3.0,
            })],
            final_bankroll: 200.0 / 3.0,
        };
        let mut writer = CsvWriter::new(Vec::new());
        ledger.write_to(&mut writer).unwrap();
        assert_eq!(
            "game_id,bet_on,edge,model_prob,market_prob,odds,bet_size,outcome,profit,cumulative_profit\n\
             2023020001,home,0.120000,0.700000,0.580000,-150,100.00,win,66.67,66.67\n",
            String::from_utf8(writer.into_inner()).unwrap()
        );
    }
}
