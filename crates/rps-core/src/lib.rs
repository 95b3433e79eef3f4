//! Rock-Paper-Scissors Session Core
//!
//! This crate provides the round rules, score aggregation, match history
//! and the session controller that sequences rounds against either a
//! local random opponent or a remote referee backend.

pub mod games;
pub mod history;
pub mod protocol;
pub mod referee;
pub mod score;
pub mod session;

pub use games::{resolve, Move, Outcome};
pub use history::{HistoryExport, HistoryLog, RoundRecord};
pub use protocol::{LeaderboardEntry, LeaderboardReport, PlayRequest, PlayResponse, UserId};
pub use referee::{HttpRefereeClient, MockRefereeClient, RefereeClient, RefereeError};
pub use score::{Percentages, ScoreBoard};
pub use session::{
    Confirmation, ModeToggle, RoundPhase, SessionConfig, SessionController, SessionError,
    SessionMode, SessionView,
};
