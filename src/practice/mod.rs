//! Interactive practice mode.
//!
//! Provides a REPL-style conversation with the AI teacher and slash commands
//! for voice input, playback control and feedback.

/// Slash command parsing and autocomplete.
pub mod command;
mod session;
mod ui;

pub use session::PracticeSession;
