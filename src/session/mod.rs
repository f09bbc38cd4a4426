//! The conversation session: state machine, turn taking, and feedback.
//!
//! Each operation is split in three steps so a stale network answer can never
//! land in a newer session:
//!
//! 1. `begin_*` validates the state and snapshots what the request needs,
//! 2. the returned pending request runs against a [`ChatClient`] without
//!    borrowing the controller,
//! 3. `apply_*` checks the session token and folds the outcome back in.
//!
//! The `start_session` / `submit_student_turn` / `end_session` conveniences
//! run all three in sequence.
//!
//! [`ChatClient`]: crate::teacher::ChatClient

mod controller;
mod model;
mod pending;

use serde::{Deserialize, Serialize};

pub use controller::{Applied, SessionController, SessionSettings, SessionState, SessionStatus};
pub use model::{FeedbackScore, Message, PronunciationScore, Role, SessionSummary};
pub use pending::{
    OpeningOutcome, PendingOpening, PendingSummary, PendingTurn, StudentInput, SummaryOutcome,
    TurnFeedback, TurnOutcome,
};

/// Identifies one session; bumped on every start and reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SessionToken(u64);

impl SessionToken {
    const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Which scores to request for spoken student turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackMode {
    /// Grammar, pronunciation, vocabulary and fluency for every turn.
    #[default]
    Written,
    /// Pronunciation, fluency and accuracy for voice turns; written scores
    /// for typed turns.
    Spoken,
}

impl std::fmt::Display for FeedbackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Written => write!(f, "written"),
            Self::Spoken => write!(f, "spoken"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {operation} while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("unknown topic: {0}")]
    UnknownTopic(String),

    #[error("no topic selected")]
    NoTopic,

    #[error("message is empty")]
    EmptyMessage,

    #[error("still waiting for the teacher")]
    Busy,

    #[error("the conversation has no messages yet")]
    EmptyTranscript,

    #[error("the teacher is still speaking")]
    TeacherSpeaking,

    #[error("no teacher message to repeat")]
    NothingToRepeat,
}
