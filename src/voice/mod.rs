//! The teacher's voice.
//!
//! Two interchangeable strategies implement [`TeacherVoice`]: a local
//! synthesis engine with British voice selection, and the remote TTS endpoint
//! with a synthetic word highlight. Both hold their playback in a single
//! [`PlaybackSlot`], so at most one utterance is ever active.

mod espeak;
mod highlight;
mod local;
mod playback;
mod remote;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

pub use espeak::{ESPEAK_PROGRAM, EspeakEngine, parse_voice_list};
pub use highlight::{WORDS_PER_SECOND, highlight_schedule, run_highlight, word_interval};
pub use local::{LocalVoice, SynthesisEngine, Utterance, VoiceInfo, select_voice};
pub use playback::{PlaybackHandle, PlaybackId, PlaybackSlot, VoiceState};
pub use remote::{
    AudioClip, RemoteVoice, RemoteVoiceSettings, TTS_PATH, TtsClient, play_clip,
};

/// Something that can speak the teacher's lines.
pub trait TeacherVoice: Send {
    /// Starts speaking `text`, stopping anything already playing.
    ///
    /// Returns `None` when there was nothing to say.
    fn speak(&mut self, text: &str) -> Option<PlaybackId>;

    /// Stops playback. Safe to call when nothing is playing.
    fn stop(&mut self);

    fn is_speaking(&self) -> bool;

    fn subscribe(&self) -> watch::Receiver<VoiceState>;
}

/// Which voice strategy to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VoiceKind {
    /// Local speech synthesis (espeak-ng).
    #[default]
    Local,
    /// Remote TTS endpoint.
    Remote,
}

impl std::fmt::Display for VoiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}
