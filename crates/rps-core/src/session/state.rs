//! Session state owned by the controller.

use super::debounce::DelayedTask;
use crate::games::{Move, Outcome};
use crate::history::{HistoryLog, RoundRecord};
use crate::protocol::UserId;
use crate::score::ScoreBoard;
use serde::{Deserialize, Serialize};

/// Result text shown when a round could not be completed
pub const GENERIC_ERROR: &str = "Error: Something went wrong! Please try again.";

/// Notice shown when the leaderboard did not accept a report
pub const REPORT_ERROR: &str = "Leaderboard update failed. Your score is still saved here.";

/// Where the computer's move comes from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Drawn locally, judged locally
    Random,
    /// Picked and judged by the referee backend
    Remote,
}

impl SessionMode {
    pub fn toggled(self) -> Self {
        match self {
            SessionMode::Random => SessionMode::Remote,
            SessionMode::Remote => SessionMode::Random,
        }
    }
}

/// Lifecycle of the current round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// Nothing pending
    Idle,
    /// A submission is waiting out the debounce window
    Debouncing,
    /// The round is being resolved (locally or by the backend)
    Resolving,
    /// Remote round applied, leaderboard report in flight
    AwaitingReport,
}

impl RoundPhase {
    /// Input gate: new submissions are refused in these phases
    pub fn is_in_flight(self) -> bool {
        matches!(self, RoundPhase::Resolving | RoundPhase::AwaitingReport)
    }
}

pub(crate) struct SessionState {
    pub user_id: UserId,
    pub user_name: Option<String>,
    pub mode: SessionMode,
    pub phase: RoundPhase,
    pub score: ScoreBoard,
    pub history: HistoryLog,
    pub player_move: Option<Move>,
    pub computer_move: Option<Move>,
    pub outcome: Option<Outcome>,
    pub result: Option<String>,
    pub notice: Option<String>,
    pub debounce: DelayedTask,
}

impl SessionState {
    pub fn new(user_id: UserId, mode: SessionMode) -> Self {
        Self {
            user_id,
            user_name: None,
            mode,
            phase: RoundPhase::Idle,
            score: ScoreBoard::new(),
            history: HistoryLog::new(),
            player_move: None,
            computer_move: None,
            outcome: None,
            result: None,
            notice: None,
            debounce: DelayedTask::new(),
        }
    }

    pub fn begin_round(&mut self, choice: Move) {
        self.player_move = Some(choice);
        self.computer_move = None;
        self.outcome = None;
        self.notice = None;
    }

    /// Commit a completed round to score and history
    pub fn apply_round(&mut self, round: RoundRecord) -> ScoreBoard {
        self.history.append(round);
        self.computer_move = Some(round.opponent_move);
        self.outcome = Some(round.outcome);
        self.result = Some(round.outcome.verdict().to_string());
        self.score.record(round.outcome)
    }

    pub fn fail_round(&mut self) {
        self.result = Some(GENERIC_ERROR.to_string());
    }

    /// Flip the mode and wipe everything the previous mode accumulated
    pub fn switch_mode(&mut self) -> SessionMode {
        self.mode = self.mode.toggled();
        self.score.reset();
        self.history.clear();
        self.player_move = None;
        self.computer_move = None;
        self.outcome = None;
        self.result = None;
        self.notice = None;
        self.mode
    }

    pub fn view(&self) -> SessionView {
        let shares = self.score.percentages();
        SessionView {
            user_id: self.user_id.clone(),
            user_name: self.user_name.clone(),
            mode: self.mode,
            phase: self.phase,
            input_locked: self.phase.is_in_flight(),
            player_move: self.player_move,
            computer_move: self.computer_move,
            outcome: self.outcome,
            result: self.result.clone(),
            notice: self.notice.clone(),
            wins: self.score.wins,
            losses: self.score.losses,
            ties: self.score.ties,
            total: self.score.total(),
            win_percentage: round_1dp(shares.win),
            loss_percentage: round_1dp(shares.loss),
            tie_percentage: round_1dp(shares.tie),
            can_export: !self.history.is_empty(),
        }
    }
}

fn round_1dp(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Read model handed to presentation code
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionView {
    pub user_id: UserId,
    pub user_name: Option<String>,
    pub mode: SessionMode,
    pub phase: RoundPhase,
    pub input_locked: bool,
    pub player_move: Option<Move>,
    pub computer_move: Option<Move>,
    pub outcome: Option<Outcome>,
    pub result: Option<String>,
    pub notice: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub total: u32,
    pub win_percentage: f64,
    pub loss_percentage: f64,
    pub tie_percentage: f64,
    pub can_export: bool,
}
