//! Round verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict of a single round, from the player's perspective
///
/// The referee backend historically answered with the full verdict
/// sentences, so those are accepted when decoding as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "win", alias = "You win!")]
    Win,
    #[serde(rename = "loss", alias = "Computer wins!")]
    Loss,
    #[serde(rename = "tie", alias = "It's a tie!")]
    Tie,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Loss => "loss",
            Outcome::Tie => "tie",
        }
    }

    /// Sentence shown to the player
    pub fn verdict(&self) -> &'static str {
        match self {
            Outcome::Win => "You win!",
            Outcome::Loss => "Computer wins!",
            Outcome::Tie => "It's a tie!",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
