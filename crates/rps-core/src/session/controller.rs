//! Session controller: input gating, debouncing and round sequencing.

use super::config::SessionConfig;
use super::state::{RoundPhase, SessionMode, SessionState, SessionView, REPORT_ERROR};
use crate::games::{resolve, Move};
use crate::history::{HistoryExport, RoundRecord};
use crate::protocol::{LeaderboardEntry, LeaderboardReport, PlayRequest, UserId};
use crate::referee::{RefereeClient, RefereeError};
use crate::score::ScoreBoard;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Question asked before a mode switch wipes the session
pub const MODE_SWITCH_PROMPT: &str =
    "Switching modes will reset your score. Do you wish to continue?";

/// Errors surfaced to callers of the controller
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("A round is already in progress")]
    RoundInFlight,

    #[error("No rounds have been played yet")]
    NoRounds,

    #[error("Player name must not be empty")]
    EmptyName,

    #[error(transparent)]
    Referee(#[from] RefereeError),
}

/// Asks the human operator to approve a destructive action
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of a mode toggle request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeToggle {
    Switched(SessionMode),
    Declined,
}

type MovePicker = Box<dyn Fn() -> Move + Send + Sync>;

struct Inner {
    config: SessionConfig,
    client: Arc<dyn RefereeClient>,
    pick_computer_move: MovePicker,
    state: Mutex<SessionState>,
    phase_tx: watch::Sender<RoundPhase>,
}

impl Inner {
    fn set_phase(&self, state: &mut SessionState, phase: RoundPhase) {
        state.phase = phase;
        self.phase_tx.send_replace(phase);
    }
}

/// Drives one player's session. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

impl SessionController {
    /// Start a session in remote mode with a fresh user id
    pub fn new(config: SessionConfig, client: Arc<dyn RefereeClient>) -> Self {
        Self::with_user(config, client, UserId::generate(), SessionMode::Remote)
    }

    pub fn with_user(
        config: SessionConfig,
        client: Arc<dyn RefereeClient>,
        user_id: UserId,
        mode: SessionMode,
    ) -> Self {
        let (phase_tx, _) = watch::channel(RoundPhase::Idle);
        Self {
            inner: Arc::new(Inner {
                config,
                client,
                pick_computer_move: Box::new(Move::random),
                state: Mutex::new(SessionState::new(user_id, mode)),
                phase_tx,
            }),
        }
    }

    /// Replace the random-mode move source. Only valid before the
    /// controller has been cloned.
    pub fn with_move_picker(mut self, picker: impl Fn() -> Move + Send + Sync + 'static) -> Self {
        match Arc::get_mut(&mut self.inner) {
            Some(inner) => inner.pick_computer_move = Box::new(picker),
            None => warn!("move picker ignored: controller already shared"),
        }
        self
    }

    /// Submit a move. Within the debounce window a newer submission
    /// replaces the pending one; while a round is in flight submissions
    /// are refused.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit_move(&self, choice: Move) -> Result<(), SessionError> {
        let mut state = self.inner.state.lock().unwrap();
        if state.phase.is_in_flight() {
            debug!(%choice, "submission refused: round in flight");
            return Err(SessionError::RoundInFlight);
        }

        let controller = self.clone();
        let generation = state.debounce.arm(self.inner.config.debounce, move |generation| {
            async move { controller.run_round(generation, choice).await }
        });
        self.inner.set_phase(&mut state, RoundPhase::Debouncing);

        debug!(%choice, generation, "submission debounced");
        Ok(())
    }

    async fn run_round(self, generation: u64, choice: Move) {
        let (mode, user_id) = {
            let mut state = self.inner.state.lock().unwrap();
            if !state.debounce.is_current(generation) || state.phase != RoundPhase::Debouncing {
                debug!(generation, "stale submission dropped");
                return;
            }
            state.begin_round(choice);
            self.inner.set_phase(&mut state, RoundPhase::Resolving);
            (state.mode, state.user_id.clone())
        };

        match mode {
            SessionMode::Random => self.play_random(choice, user_id),
            SessionMode::Remote => {
                self.play_remote(choice, user_id).await;
                let mut state = self.inner.state.lock().unwrap();
                self.inner.set_phase(&mut state, RoundPhase::Idle);
            }
        }
    }

    /// Resolve locally and reopen input at once. The backend only hears
    /// about the round afterwards, so a slow notification never holds the
    /// gate.
    fn play_random(&self, choice: Move, user_id: UserId) {
        let computer = (self.inner.pick_computer_move)();
        let outcome = resolve(choice, computer);
        let score = {
            let mut state = self.inner.state.lock().unwrap();
            let score = state.apply_round(RoundRecord {
                player_move: choice,
                opponent_move: computer,
                outcome,
                random_mode: true,
            });
            self.inner.set_phase(&mut state, RoundPhase::Idle);
            score
        };
        info!(%choice, %computer, %outcome, total = score.total(), "random round played");

        let controller = self.clone();
        let request = PlayRequest::random(choice, computer, user_id);
        let round = score.total();
        tokio::spawn(async move { controller.notify_random_play(request, round).await });
    }

    /// A failed notification keeps the round but marks its result. It is
    /// ignored once a newer round or a reset has replaced that result.
    async fn notify_random_play(self, request: PlayRequest, round: u32) {
        if let Err(e) = self.inner.client.notify_random_play(&request).await {
            warn!(error = %e, "random play notification failed");
            let mut state = self.inner.state.lock().unwrap();
            if state.score.total() == round && state.mode == SessionMode::Random {
                state.fail_round();
            } else {
                debug!(round, "late notification failure ignored");
            }
        }
    }

    async fn play_remote(&self, choice: Move, user_id: UserId) {
        let score = match self.resolve_remote(choice, user_id.clone()).await {
            Ok(score) => score,
            Err(e) => {
                warn!(error = %e, %choice, "remote round failed");
                self.inner.state.lock().unwrap().fail_round();
                return;
            }
        };
        self.report_score(user_id, score).await;
    }

    /// Step one: ask the backend for the verdict and commit it.
    /// Nothing is applied unless the call succeeds.
    async fn resolve_remote(&self, choice: Move, user_id: UserId) -> Result<ScoreBoard, RefereeError> {
        let request = PlayRequest::remote(choice, user_id);
        let response = self.inner.client.play(&request).await?;

        let score = {
            let mut state = self.inner.state.lock().unwrap();
            let score = state.apply_round(RoundRecord {
                player_move: choice,
                opponent_move: response.computer_choice,
                outcome: response.result,
                random_mode: false,
            });
            self.inner.set_phase(&mut state, RoundPhase::AwaitingReport);
            score
        };
        info!(
            %choice,
            computer = %response.computer_choice,
            outcome = %response.result,
            total = score.total(),
            "remote round played"
        );
        Ok(score)
    }

    /// Step two: push the updated aggregate to the leaderboard. A failure
    /// leaves the committed round alone.
    async fn report_score(&self, user_id: UserId, score: ScoreBoard) {
        let user_name = self.inner.state.lock().unwrap().user_name.clone();
        let Some(user_name) = user_name else {
            debug!("no player name yet, leaderboard report skipped");
            return;
        };

        let report = LeaderboardReport::from_score(user_id, user_name, &score);
        match self.inner.client.report_score(&report).await {
            Ok(()) => debug!(total = report.total, "leaderboard updated"),
            Err(e) => {
                warn!(error = %e, "leaderboard report failed");
                self.inner.state.lock().unwrap().notice = Some(REPORT_ERROR.to_string());
            }
        }
    }

    /// Flip between random and remote mode after the operator confirms.
    /// Refused while a submission is pending or a round is in flight.
    pub fn toggle_mode(&self, confirmation: &dyn Confirmation) -> Result<ModeToggle, SessionError> {
        self.ensure_idle()?;

        if !confirmation.confirm(MODE_SWITCH_PROMPT) {
            debug!("mode switch declined");
            return Ok(ModeToggle::Declined);
        }

        let mut state = self.inner.state.lock().unwrap();
        if state.phase != RoundPhase::Idle {
            return Err(SessionError::RoundInFlight);
        }
        let mode = state.switch_mode();
        info!(?mode, "session mode switched, score and history reset");
        Ok(ModeToggle::Switched(mode))
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        match self.inner.state.lock().unwrap().phase {
            RoundPhase::Idle => Ok(()),
            _ => Err(SessionError::RoundInFlight),
        }
    }

    /// Render the history as a downloadable CSV report
    pub fn export_history(&self) -> Result<HistoryExport, SessionError> {
        let state = self.inner.state.lock().unwrap();
        if state.history.is_empty() {
            return Err(SessionError::NoRounds);
        }
        let export = state.history.export(Utc::now());
        debug!(file = %export.file_name, rounds = state.history.len(), "history exported");
        Ok(export)
    }

    /// Record the name supplied by the name prompt. Returns the trimmed name.
    pub fn set_player_name(&self, name: &str) -> Result<String, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        self.inner.state.lock().unwrap().user_name = Some(name.to_string());
        info!(name, "player name set");
        Ok(name.to_string())
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, SessionError> {
        Ok(self.inner.client.fetch_leaderboard().await?)
    }

    /// Resolve once no submission is pending and no round is in flight
    pub async fn wait_idle(&self) {
        let mut rx = self.inner.phase_tx.subscribe();
        let _ = rx.wait_for(|phase| *phase == RoundPhase::Idle).await;
    }

    pub fn view(&self) -> SessionView {
        self.inner.state.lock().unwrap().view()
    }

    pub fn score(&self) -> ScoreBoard {
        self.inner.state.lock().unwrap().score
    }

    pub fn mode(&self) -> SessionMode {
        self.inner.state.lock().unwrap().mode
    }

    pub fn phase(&self) -> RoundPhase {
        self.inner.state.lock().unwrap().phase
    }

    pub fn user_id(&self) -> UserId {
        self.inner.state.lock().unwrap().user_id.clone()
    }

    pub fn history(&self) -> Vec<RoundRecord> {
        self.inner.state.lock().unwrap().history.iter().copied().collect()
    }

    pub fn history_len(&self) -> usize {
        self.inner.state.lock().unwrap().history.len()
    }
}
