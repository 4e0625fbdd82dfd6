//! Backtest parameters for both staking strategies.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::simulate::{FixedStake, FractionalKelly};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    pub threshold: FixedStake,
    pub kelly: FractionalKelly,
}
impl BacktestConfig {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.threshold.validate().context("invalid threshold strategy")?;
        self.kelly.validate().context("invalid Kelly strategy")?;
        Ok(())
    }
}
