//! Teacher voice backed by a local speech synthesis engine.

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{info, warn};

use super::playback::{PlaybackId, PlaybackSlot, VoiceState};
use super::TeacherVoice;

/// A voice offered by the synthesis engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    pub name: String,
    /// BCP 47-ish language tag as reported by the engine (`en-GB`, `en-gb`, `en_US`).
    pub lang: String,
}

impl VoiceInfo {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }

    fn normalized_lang(&self) -> String {
        self.lang.to_ascii_lowercase().replace('_', "-")
    }

    fn is_british(&self) -> bool {
        let lang = self.normalized_lang();
        let name = self.name.to_lowercase();
        lang.starts_with("en-gb")
            || lang.starts_with("en-uk")
            || ["british", "uk", "daniel", "hazel"]
                .iter()
                .any(|hint| name.contains(hint))
    }

    fn is_premium(&self) -> bool {
        let name = self.name.to_lowercase();
        ["neural", "premium", "enhanced"]
            .iter()
            .any(|hint| name.contains(hint))
    }

    fn is_english(&self) -> bool {
        self.normalized_lang().starts_with("en-")
    }
}

/// Picks the teacher voice: a premium British voice, else any British voice,
/// else any English voice.
pub fn select_voice(voices: &[VoiceInfo]) -> Option<&VoiceInfo> {
    let british: Vec<&VoiceInfo> = voices.iter().filter(|v| v.is_british()).collect();

    british
        .iter()
        .find(|v| v.is_premium())
        .or_else(|| british.first())
        .copied()
        .or_else(|| voices.iter().find(|v| v.is_english()))
}

/// One request to the synthesis engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: VoiceInfo,
    pub lang: &'static str,
    /// Speaking rate relative to the engine default.
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Utterance {
    /// Slightly slowed British English, easier to follow at A2 level.
    pub const RATE: f32 = 0.9;

    pub fn teacher(text: &str, voice: VoiceInfo) -> Self {
        Self {
            text: text.to_string(),
            voice,
            lang: "en-GB",
            rate: Self::RATE,
            pitch: 1.0,
            volume: 0.8,
        }
    }
}

/// A runtime speech synthesis engine.
#[async_trait]
pub trait SynthesisEngine: Send + Sync + 'static {
    /// Voices currently installed; the list may change between calls.
    async fn voices(&self) -> Result<Vec<VoiceInfo>>;

    /// Speaks the utterance, returning once it has finished.
    ///
    /// Dropping the future must silence the engine.
    async fn say(&self, utterance: &Utterance) -> Result<()>;
}

#[derive(Debug, Default)]
struct Selection {
    voices: Vec<VoiceInfo>,
    chosen: Option<VoiceInfo>,
}

impl Selection {
    /// Re-runs selection if the voice list changed. Returns the chosen voice.
    fn refresh(&mut self, voices: Vec<VoiceInfo>) -> Option<VoiceInfo> {
        if voices != self.voices {
            self.chosen = select_voice(&voices).cloned();
            if let Some(voice) = &self.chosen {
                info!("Selected teacher voice: {} ({})", voice.name, voice.lang);
            }
            self.voices = voices;
        }
        self.chosen.clone()
    }
}

/// Teacher voice speaking through a local engine with the British voice
/// preference applied.
pub struct LocalVoice<E: SynthesisEngine> {
    engine: Arc<E>,
    selection: Arc<Mutex<Selection>>,
    slot: PlaybackSlot,
}

impl<E: SynthesisEngine> LocalVoice<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Arc::new(engine),
            selection: Arc::new(Mutex::new(Selection::default())),
            slot: PlaybackSlot::new(),
        }
    }

    /// The voice chosen at the last refresh, if any.
    pub fn selected_voice(&self) -> Option<VoiceInfo> {
        self.selection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .chosen
            .clone()
    }

    /// Reloads the engine's voice list and re-selects when it changed.
    pub async fn refresh_voices(&self) -> Result<Option<VoiceInfo>> {
        let voices = self.engine.voices().await?;
        Ok(self
            .selection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .refresh(voices))
    }
}

impl<E: SynthesisEngine> TeacherVoice for LocalVoice<E> {
    fn speak(&mut self, text: &str) -> Option<PlaybackId> {
        if text.trim().is_empty() {
            return None;
        }

        let engine = Arc::clone(&self.engine);
        let selection = Arc::clone(&self.selection);
        let text = text.to_string();

        Some(self.slot.start(move |_handle| async move {
            let voices = engine.voices().await?;
            let chosen = selection
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .refresh(voices);

            let Some(voice) = chosen else {
                warn!("No English voice installed; teacher stays silent");
                return Ok(());
            };

            engine.say(&Utterance::teacher(&text, voice)).await
        }))
    }

    fn stop(&mut self) {
        self.slot.stop();
    }

    fn is_speaking(&self) -> bool {
        self.slot.is_speaking()
    }

    fn subscribe(&self) -> watch::Receiver<VoiceState> {
        self.slot.subscribe()
    }
}
