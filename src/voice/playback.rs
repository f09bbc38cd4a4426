//! The single playback slot shared by every teacher voice.
//!
//! At most one utterance is active. Starting a new one aborts the previous
//! task; a task that finishes (successfully or not) clears the speaking state,
//! but only if it is still the current playback.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Identifies one playback started by a voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlaybackId(u64);

impl std::fmt::Display for PlaybackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "playback-{}", self.0)
    }
}

/// Observable state of a teacher voice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceState {
    /// The playback currently audible (or being prepared), if any.
    pub speaking: Option<PlaybackId>,
    /// Index of the highlighted word in the spoken text.
    pub highlight: Option<usize>,
}

impl VoiceState {
    pub const fn is_speaking(&self) -> bool {
        self.speaking.is_some()
    }
}

/// Handle given to a running playback job so it can publish highlights.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    id: PlaybackId,
    state: Arc<watch::Sender<VoiceState>>,
}

impl PlaybackHandle {
    pub const fn id(&self) -> PlaybackId {
        self.id
    }

    /// Updates the highlighted word; ignored once this playback is superseded.
    pub fn highlight(&self, index: Option<usize>) {
        self.state.send_if_modified(|state| {
            if state.speaking == Some(self.id) && state.highlight != index {
                state.highlight = index;
                true
            } else {
                false
            }
        });
    }

    fn finish(&self) {
        self.state.send_if_modified(|state| {
            if state.speaking == Some(self.id) {
                *state = VoiceState::default();
                true
            } else {
                false
            }
        });
    }
}

/// Owner of the one active playback task.
#[derive(Debug)]
pub struct PlaybackSlot {
    state: Arc<watch::Sender<VoiceState>>,
    current: Option<(PlaybackId, JoinHandle<()>)>,
    next_id: u64,
}

impl Default for PlaybackSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackSlot {
    pub fn new() -> Self {
        let (state, _) = watch::channel(VoiceState::default());
        Self {
            state: Arc::new(state),
            current: None,
            next_id: 1,
        }
    }

    /// Stops whatever is playing and spawns `job` as the new playback.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F, Fut>(&mut self, job: F) -> PlaybackId
    where
        F: FnOnce(PlaybackHandle) -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.stop();

        let id = PlaybackId(self.next_id);
        self.next_id += 1;

        self.state.send_replace(VoiceState {
            speaking: Some(id),
            highlight: None,
        });

        let handle = PlaybackHandle {
            id,
            state: Arc::clone(&self.state),
        };
        let fut = job(handle.clone());

        let task = tokio::spawn(async move {
            if let Err(e) = fut.await {
                warn!("Teacher playback failed: {e:#}");
            }
            handle.finish();
            debug!("{} finished", handle.id());
        });

        self.current = Some((id, task));
        id
    }

    /// Aborts the active playback. Does nothing when idle.
    pub fn stop(&mut self) {
        if let Some((id, task)) = self.current.take() {
            task.abort();
            debug!("{id} stopped");
        }
        self.state.send_if_modified(|state| {
            if *state == VoiceState::default() {
                false
            } else {
                *state = VoiceState::default();
                true
            }
        });
    }

    pub fn is_speaking(&self) -> bool {
        self.state.borrow().is_speaking()
    }

    pub fn subscribe(&self) -> watch::Receiver<VoiceState> {
        self.state.subscribe()
    }
}

impl Drop for PlaybackSlot {
    fn drop(&mut self) {
        if let Some((_, task)) = self.current.take() {
            task.abort();
        }
    }
}
