//! Game rules.

mod outcome;
mod rps;

pub use outcome::Outcome;
pub use rps::{resolve, Move, UnknownMove};
