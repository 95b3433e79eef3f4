//! Mock referee client for testing.

use super::traits::{RefereeClient, RefereeError};
use crate::games::{resolve, Move};
use crate::protocol::{LeaderboardEntry, LeaderboardReport, PlayRequest, PlayResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted behaviour of the mock
#[derive(Default)]
struct MockBehaviour {
    /// Computer moves handed out in order; falls back to `Move::Scissors`
    computer_moves: VecDeque<Move>,
    fail_play: bool,
    fail_notify: bool,
    fail_report: bool,
    latency: Duration,
    leaderboard: Vec<LeaderboardEntry>,
}

/// Everything the mock has been sent
#[derive(Default)]
struct MockCalls {
    plays: Vec<PlayRequest>,
    notifications: Vec<PlayRequest>,
    reports: Vec<LeaderboardReport>,
}

/// In-memory referee that judges rounds with the local rules
#[derive(Clone, Default)]
pub struct MockRefereeClient {
    behaviour: Arc<Mutex<MockBehaviour>>,
    calls: Arc<Mutex<MockCalls>>,
}

impl MockRefereeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the computer's next move
    pub fn push_computer_move(&self, computer: Move) {
        self.behaviour
            .lock()
            .unwrap()
            .computer_moves
            .push_back(computer);
    }

    /// Make `play` fail with a network error
    pub fn set_fail_play(&self, fail: bool) {
        self.behaviour.lock().unwrap().fail_play = fail;
    }

    /// Make `notify_random_play` fail with a network error
    pub fn set_fail_notify(&self, fail: bool) {
        self.behaviour.lock().unwrap().fail_notify = fail;
    }

    /// Make `report_score` fail with a network error
    pub fn set_fail_report(&self, fail: bool) {
        self.behaviour.lock().unwrap().fail_report = fail;
    }

    /// Delay every call by `latency`
    pub fn set_latency(&self, latency: Duration) {
        self.behaviour.lock().unwrap().latency = latency;
    }

    pub fn set_leaderboard(&self, entries: Vec<LeaderboardEntry>) {
        self.behaviour.lock().unwrap().leaderboard = entries;
    }

    /// Requests received by `play`
    pub fn plays(&self) -> Vec<PlayRequest> {
        self.calls.lock().unwrap().plays.clone()
    }

    /// Requests received by `notify_random_play`
    pub fn notifications(&self) -> Vec<PlayRequest> {
        self.calls.lock().unwrap().notifications.clone()
    }

    /// Reports received by `report_score`
    pub fn reports(&self) -> Vec<LeaderboardReport> {
        self.calls.lock().unwrap().reports.clone()
    }

    async fn simulate_latency(&self) {
        let latency = self.behaviour.lock().unwrap().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn failure(what: &str) -> RefereeError {
        RefereeError::NetworkError(format!("mock {what} failure"))
    }
}

#[async_trait]
impl RefereeClient for MockRefereeClient {
    async fn play(&self, request: &PlayRequest) -> Result<PlayResponse, RefereeError> {
        self.calls.lock().unwrap().plays.push(request.clone());
        self.simulate_latency().await;

        let mut behaviour = self.behaviour.lock().unwrap();
        if behaviour.fail_play {
            return Err(Self::failure("play"));
        }

        let computer = behaviour
            .computer_moves
            .pop_front()
            .unwrap_or(Move::Scissors);

        Ok(PlayResponse {
            computer_choice: computer,
            result: resolve(request.choice, computer),
        })
    }

    async fn notify_random_play(&self, request: &PlayRequest) -> Result<(), RefereeError> {
        self.calls.lock().unwrap().notifications.push(request.clone());
        self.simulate_latency().await;

        if self.behaviour.lock().unwrap().fail_notify {
            return Err(Self::failure("notify"));
        }
        Ok(())
    }

    async fn report_score(&self, report: &LeaderboardReport) -> Result<(), RefereeError> {
        self.calls.lock().unwrap().reports.push(report.clone());
        self.simulate_latency().await;

        if self.behaviour.lock().unwrap().fail_report {
            return Err(Self::failure("report"));
        }
        Ok(())
    }

    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, RefereeError> {
        self.simulate_latency().await;
        Ok(self.behaviour.lock().unwrap().leaderboard.clone())
    }
}
