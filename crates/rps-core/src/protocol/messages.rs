//! Request and response bodies.

use crate::games::{Move, Outcome};
use crate::protocol::UserId;
use crate::score::ScoreBoard;
use serde::{Deserialize, Serialize};

/// Body of `POST /play`
///
/// In remote mode only `choice` is sent and the backend picks the
/// computer's move. In random mode the locally drawn move rides along
/// so the backend can keep its own tally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRequest {
    pub choice: Move,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub computer: Option<Move>,
    pub user_id: UserId,
    pub random: bool,
}

impl PlayRequest {
    pub fn remote(choice: Move, user_id: UserId) -> Self {
        Self {
            choice,
            computer: None,
            user_id,
            random: false,
        }
    }

    pub fn random(choice: Move, computer: Move, user_id: UserId) -> Self {
        Self {
            choice,
            computer: Some(computer),
            user_id,
            random: true,
        }
    }
}

/// Backend verdict for a remote round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayResponse {
    pub computer_choice: Move,
    pub result: Outcome,
}

/// Aggregate statistics pushed to the leaderboard after a round
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardReport {
    pub user_id: UserId,
    pub user_name: String,
    pub win: f64,
    pub tie: f64,
    pub loss: f64,
    pub total: u32,
}

impl LeaderboardReport {
    /// Build a report from the counters as they stand now
    pub fn from_score(user_id: UserId, user_name: String, score: &ScoreBoard) -> Self {
        let shares = score.percentages().rounded();
        Self {
            user_id,
            user_name,
            win: shares.win,
            tie: shares.tie,
            loss: shares.loss,
            total: score.total(),
        }
    }
}

/// One row of the public ranking
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "UserName")]
    pub user_name: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub total: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remote_play_request_shape() {
        let req = PlayRequest::remote(Move::Rock, UserId::from_string("user_a"));
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"choice": "rock", "user_id": "user_a", "random": false})
        );
    }

    #[test]
    fn test_random_play_request_carries_computer_move() {
        let req = PlayRequest::random(Move::Paper, Move::Scissors, UserId::from_string("user_a"));
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"choice": "paper", "computer": "scissors", "user_id": "user_a", "random": true})
        );
    }

    #[test]
    fn test_play_response_decodes_legacy_verdict() {
        let resp: PlayResponse =
            serde_json::from_value(json!({"computer_choice": "rock", "result": "Computer wins!"}))
                .unwrap();
        assert_eq!(resp.computer_choice, Move::Rock);
        assert_eq!(resp.result, Outcome::Loss);
    }

    #[test]
    fn test_leaderboard_report_shape() {
        let score = ScoreBoard { wins: 1, losses: 2, ties: 0 };
        let report =
            LeaderboardReport::from_score(UserId::from_string("user_a"), "Ada".to_string(), &score);

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "userId": "user_a",
                "userName": "Ada",
                "win": 33.33,
                "tie": 0.0,
                "loss": 66.67,
                "total": 3
            })
        );
    }

    #[test]
    fn test_leaderboard_entry_field_names() {
        let entry: LeaderboardEntry = serde_json::from_value(json!({
            "userId": "user_b",
            "UserName": "Grace",
            "wins": 5,
            "losses": 1,
            "ties": 2,
            "total": 8
        }))
        .unwrap();
        assert_eq!(entry.user_name, "Grace");
        assert_eq!(entry.total, 8);
    }
}
