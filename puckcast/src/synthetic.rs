//! Generation of plausible game sequences for benchmarking and randomised testing.
//!
//! Each game has a latent home win probability. The bookmaker quotes it with some noise and an
//! overround of a few percent, rounding to whole American odds; the model sees it with more noise.
//! The outcome is drawn from the latent probability.

use tinyrand::Rand;

use crate::game::{GameId, GameOdds};
use crate::odds::{remove_vig_proportional, AmericanOdds, OddsError};

pub struct Generator<R: Rand> {
    rand: R,
    next_id: usize,
    pub market_noise: f64,
    pub model_noise: f64,
    pub overround: (f64, f64),
}

impl<R: Rand> Generator<R> {
    pub fn new(rand: R) -> Self {
        Self {
            rand,
            next_id: 0,
            market_noise: 0.05,
            model_noise: 0.08,
            overround: (1.02, 1.06),
        }
    }

    pub fn games(&mut self, count: usize) -> Vec<GameOdds> {
        (0..count).filter_map(|_| self.game().ok()).collect()
    }

    pub fn game(&mut self) -> Result<GameOdds, OddsError> {
        let latent = self.uniform(0.30, 0.75);
        let fair_home = (latent + self.uniform(-self.market_noise, self.market_noise)).clamp(0.2, 0.8);
        let overround = self.uniform(self.overround.0, self.overround.1);
        let home_odds = AmericanOdds::from_probability(fair_home * overround)?;
        let away_odds = AmericanOdds::from_probability((1.0 - fair_home) * overround)?;
        let (market_prob_home, _) = remove_vig_proportional(
            home_odds.implied_probability(),
            away_odds.implied_probability(),
        )?;
        let model_prob_home =
            (latent + self.uniform(-self.model_noise, self.model_noise)).clamp(0.01, 0.99);
        let home_win = self.uniform(0.0, 1.0) < latent;

        let game_id = GameId::from(self.next_id);
        self.next_id += 1;
        Ok(GameOdds {
            game_id,
            home_odds,
            away_odds,
            model_prob_home,
            market_prob_home,
            home_win,
        })
    }

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        let unit = self.rand.next_u64() as f64 / u64::MAX as f64;
        low + unit * (high - low)
    }
}
