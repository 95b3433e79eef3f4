//! Session control: one player's rounds, score and history.

mod config;
mod controller;
mod debounce;
mod state;

pub use config::SessionConfig;
pub use controller::{Confirmation, ModeToggle, SessionController, SessionError, MODE_SWITCH_PROMPT};
pub use debounce::DelayedTask;
pub use state::{RoundPhase, SessionMode, SessionView, GENERIC_ERROR, REPORT_ERROR};
