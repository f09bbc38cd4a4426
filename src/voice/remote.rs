//! Teacher voice rendered by the remote TTS endpoint.

use std::process::Stdio;

use anyhow::{Context, Result, bail};
use bytes::Bytes;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tokio::process::Command;
use tokio::sync::watch;
use tracing::debug;

use super::TeacherVoice;
use super::highlight::{WORDS_PER_SECOND, run_highlight};
use super::playback::{PlaybackId, PlaybackSlot, VoiceState};

/// Path of the TTS endpoint relative to the configured base URL.
pub const TTS_PATH: &str = "/api/tts";

/// Voice parameters sent with every synthesis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteVoiceSettings {
    pub voice_name: String,
    pub style: String,
    pub multi_speaker: bool,
}

/// A synthesized clip.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

impl AudioClip {
    /// File extension that lets the player sniff the format.
    pub fn extension(&self) -> &'static str {
        let mime = self
            .content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .unwrap_or_default()
            .trim();
        match mime {
            "audio/mpeg" | "audio/mp3" => ".mp3",
            "audio/wav" | "audio/x-wav" | "audio/wave" => ".wav",
            "audio/ogg" | "audio/opus" => ".ogg",
            "audio/aac" => ".aac",
            _ => ".audio",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TtsRequest<'a> {
    text: &'a str,
    voice_name: &'a str,
    multi_speaker: bool,
    style: &'a str,
}

/// HTTP client for the TTS endpoint.
#[derive(Debug, Clone)]
pub struct TtsClient {
    client: Client,
    endpoint: String,
    settings: RemoteVoiceSettings,
}

impl TtsClient {
    pub fn new(endpoint: String, settings: RemoteVoiceSettings) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            settings,
        }
    }

    pub async fn synthesize(&self, text: &str) -> Result<AudioClip> {
        let url = format!("{}{TTS_PATH}", self.endpoint.trim_end_matches('/'));
        let request = TtsRequest {
            text,
            voice_name: &self.settings.voice_name,
            multi_speaker: self.settings.multi_speaker,
            style: &self.settings.style,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to connect to TTS endpoint: {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("TTS request failed with status {status}: {body}");
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .context("Failed to read TTS audio")?;

        if bytes.is_empty() {
            bail!("TTS endpoint returned an empty clip");
        }

        Ok(AudioClip {
            bytes,
            content_type,
        })
    }
}

/// Plays a clip through an external player command, e.g. `ffplay -nodisp -autoexit`.
///
/// The temporary file lives until playback ends or the future is dropped.
pub async fn play_clip(clip: &AudioClip, player: &[String]) -> Result<()> {
    let Some((program, args)) = player.split_first() else {
        bail!("No audio player configured");
    };

    let file = tempfile::Builder::new()
        .prefix("havo-speak-")
        .suffix(clip.extension())
        .tempfile()
        .context("Failed to create temporary audio file")?;
    tokio::fs::write(file.path(), &clip.bytes)
        .await
        .context("Failed to write temporary audio file")?;

    debug!("Playing {} bytes via {program}", clip.bytes.len());

    let status = Command::new(program)
        .args(args)
        .arg(file.path())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await
        .with_context(|| format!("Failed to run audio player: {program}"))?;

    if !status.success() {
        bail!("Audio player {program} exited with {status}");
    }
    Ok(())
}

/// Teacher voice that fetches clips from the TTS endpoint and plays them
/// with a synthetic word highlight.
pub struct RemoteVoice {
    client: TtsClient,
    player: Vec<String>,
    slot: PlaybackSlot,
}

impl RemoteVoice {
    pub fn new(client: TtsClient, player: Vec<String>) -> Self {
        Self {
            client,
            player,
            slot: PlaybackSlot::new(),
        }
    }
}

impl TeacherVoice for RemoteVoice {
    fn speak(&mut self, text: &str) -> Option<PlaybackId> {
        if text.trim().is_empty() {
            return None;
        }

        let client = self.client.clone();
        let player = self.player.clone();
        let text = text.to_string();

        Some(self.slot.start(move |handle| async move {
            let clip = client.synthesize(&text).await?;

            let playback = play_clip(&clip, &player);
            let highlight = run_highlight(&text, WORDS_PER_SECOND, &handle);
            tokio::pin!(playback, highlight);

            // Highlighting may end early; playback decides when we are done.
            tokio::select! {
                result = &mut playback => result,
                () = &mut highlight => playback.await,
            }
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
