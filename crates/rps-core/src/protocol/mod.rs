//! Wire types exchanged with the referee and leaderboard services.

mod messages;
mod types;

pub use messages::{LeaderboardEntry, LeaderboardReport, PlayRequest, PlayResponse};
pub use types::UserId;
