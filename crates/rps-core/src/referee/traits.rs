//! Referee client trait definition.

use crate::protocol::{LeaderboardEntry, LeaderboardReport, PlayRequest, PlayResponse};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from referee and leaderboard calls
#[derive(Debug, Error)]
pub enum RefereeError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Trait for the remote side of a session
///
/// Implementations can be:
/// - HttpRefereeClient talking to the real backend
/// - MockRefereeClient for testing
#[async_trait]
pub trait RefereeClient: Send + Sync {
    /// Ask the backend to pick a move and judge the round
    async fn play(&self, request: &PlayRequest) -> Result<PlayResponse, RefereeError>;

    /// Tell the backend about a round resolved locally in random mode
    async fn notify_random_play(&self, request: &PlayRequest) -> Result<(), RefereeError>;

    /// Push the session's aggregate statistics to the leaderboard
    async fn report_score(&self, report: &LeaderboardReport) -> Result<(), RefereeError>;

    /// Read the current public ranking
    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, RefereeError>;
}
