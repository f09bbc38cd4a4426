//! Student voice input.
//!
//! A [`SpeechRecognizer`] captures one English utterance; the [`Listener`]
//! around it owns the "is listening" flag, rejects overlapping captures, and
//! bounds every capture with an optional ceiling.

mod command;
mod listener;

use anyhow::Result;
use async_trait::async_trait;

pub use command::{CommandRecognizer, RECOGNITION_LANG, parse_recognizer_output};
pub use listener::{DEFAULT_LISTEN_CEILING, ListenOutcome, Listener};

/// One recognized utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    pub transcript: String,
    /// Recognizer confidence in `0.0..=1.0`, when reported.
    pub confidence: Option<f32>,
}

impl Recognition {
    pub fn new(transcript: impl Into<String>, confidence: Option<f32>) -> Self {
        Self {
            transcript: transcript.into(),
            confidence,
        }
    }
}

/// A single-utterance speech recognizer.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Whether this recognizer can run in the current environment.
    fn is_supported(&self) -> bool;

    /// Captures until the speaker stops. `Ok(None)` means nothing was said.
    ///
    /// Dropping the future must stop the capture.
    async fn recognize(&self) -> Result<Option<Recognition>>;
}

#[derive(Debug, thiserror::Error)]
pub enum ListenError {
    #[error("speech recognition is not available")]
    Unsupported,

    #[error("already listening")]
    AlreadyListening,
}
