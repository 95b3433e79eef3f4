//! Append-only match history and its CSV export.

use crate::games::{Move, Outcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Header row of the exported report
pub const REPORT_HEADER: [&str; 4] = ["User Choice", "Computer Choice", "Result", "Random"];

/// MIME type of the exported report
pub const REPORT_MIME: &str = "text/csv;charset=utf-8";

/// One completed round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub player_move: Move,
    pub opponent_move: Move,
    pub outcome: Outcome,
    pub random_mode: bool,
}

impl RoundRecord {
    fn to_row(&self) -> String {
        [
            self.player_move.as_str(),
            self.opponent_move.as_str(),
            self.outcome.as_str(),
            if self.random_mode { "true" } else { "false" },
        ]
        .join(",")
    }
}

/// Ordered record of the rounds played in this session
#[derive(Clone, Debug, Default)]
pub struct HistoryLog {
    rounds: Vec<RoundRecord>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, round: RoundRecord) {
        self.rounds.push(round);
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoundRecord> {
        self.rounds.iter()
    }

    /// Drop every record. Only a mode switch does this.
    pub(crate) fn clear(&mut self) {
        self.rounds.clear();
    }

    /// Render the log as comma-separated rows, header first.
    ///
    /// Fields come from closed vocabularies, so no quoting is needed.
    pub fn to_delimited_report(&self) -> String {
        std::iter::once(REPORT_HEADER.join(","))
            .chain(self.rounds.iter().map(RoundRecord::to_row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build the downloadable artifact stamped with `at`
    pub fn export(&self, at: DateTime<Utc>) -> HistoryExport {
        HistoryExport {
            file_name: export_file_name(at),
            mime: REPORT_MIME,
            content: self.to_delimited_report(),
        }
    }
}

/// A rendered history report ready for download
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryExport {
    pub file_name: String,
    pub mime: &'static str,
    pub content: String,
}

/// `game_history_2024-05-01T12-30-45.csv`: ISO-8601 in UTC, colons
/// swapped for dashes, whole seconds
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("game_history_{}.csv", at.format("%Y-%m-%dT%H-%M-%S"))
}
