//! Running win/loss/tie counters.

use crate::games::Outcome;
use serde::{Deserialize, Serialize};

/// Counters for the current session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

/// Win/loss/tie shares in percent
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Percentages {
    pub win: f64,
    pub loss: f64,
    pub tie: f64,
}

impl Percentages {
    /// Round every share to two decimals, as the leaderboard expects
    pub fn rounded(&self) -> Self {
        Self {
            win: round_2dp(self.win),
            loss: round_2dp(self.loss),
            tie: round_2dp(self.tie),
        }
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one completed round and return the updated snapshot
    pub fn record(&mut self, outcome: Outcome) -> ScoreBoard {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
        *self
    }

    pub fn reset(&mut self) -> ScoreBoard {
        *self = Self::default();
        *self
    }

    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    pub fn win_percentage(&self) -> f64 {
        self.share(self.wins)
    }

    pub fn loss_percentage(&self) -> f64 {
        self.share(self.losses)
    }

    pub fn tie_percentage(&self) -> f64 {
        self.share(self.ties)
    }

    pub fn percentages(&self) -> Percentages {
        Percentages {
            win: self.win_percentage(),
            loss: self.loss_percentage(),
            tie: self.tie_percentage(),
        }
    }

    fn share(&self, count: u32) -> f64 {
        match self.total() {
            0 => 0.0,
            total => f64::from(count) / f64::from(total) * 100.0,
        }
    }
}
