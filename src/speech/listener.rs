use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{ListenError, Recognition, SpeechRecognizer};

/// Default hard ceiling on one capture.
pub const DEFAULT_LISTEN_CEILING: Duration = Duration::from_secs(10);

/// How a capture ended. Every call to [`Listener::listen`] that starts a
/// capture produces exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum ListenOutcome {
    Heard(Recognition),
    NoSpeech,
    TimedOut,
    Failed(String),
}

/// Clears the listening flag however the capture ends, including when the
/// `listen` future itself is dropped.
struct ListeningGuard<'a>(&'a AtomicBool);

impl Drop for ListeningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Single-utterance voice input with capability detection and a hard ceiling.
pub struct Listener {
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    ceiling: Option<Duration>,
    listening: AtomicBool,
}

impl Listener {
    /// Probes the recognizer once; an unsupported recognizer is discarded and
    /// voice input stays disabled for the lifetime of the listener.
    pub fn detect(recognizer: Arc<dyn SpeechRecognizer>, ceiling: Option<Duration>) -> Self {
        let recognizer = if recognizer.is_supported() {
            info!("Speech recognition available");
            Some(recognizer)
        } else {
            info!("Speech recognition not available; voice input disabled");
            None
        };

        Self {
            recognizer,
            ceiling,
            listening: AtomicBool::new(false),
        }
    }

    /// A listener without any recognizer.
    pub const fn unsupported() -> Self {
        Self {
            recognizer: None,
            ceiling: None,
            listening: AtomicBool::new(false),
        }
    }

    pub const fn is_supported(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    pub const fn ceiling(&self) -> Option<Duration> {
        self.ceiling
    }

    /// Captures one utterance.
    ///
    /// Errors only when no capture could be started; once started, the result
    /// is always a terminal [`ListenOutcome`].
    pub async fn listen(&self) -> Result<ListenOutcome, ListenError> {
        let recognizer = self.recognizer.as_ref().ok_or(ListenError::Unsupported)?;

        if self
            .listening
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ListenError::AlreadyListening);
        }
        let _guard = ListeningGuard(&self.listening);

        let capture = recognizer.recognize();
        let result = match self.ceiling {
            Some(ceiling) => match tokio::time::timeout(ceiling, capture).await {
                Ok(result) => result,
                Err(_) => {
                    debug!("Capture force-stopped after {ceiling:?}");
                    return Ok(ListenOutcome::TimedOut);
                }
            },
            None => capture.await,
        };

        Ok(match result {
            Ok(Some(recognition)) if !recognition.transcript.trim().is_empty() => {
                ListenOutcome::Heard(recognition)
            }
            Ok(_) => ListenOutcome::NoSpeech,
            Err(e) => {
                warn!("Speech recognition failed: {e:#}");
                ListenOutcome::Failed(e.to_string())
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

    enum Behaviour {
        Say(&'static str),
        Silence,
        Fail,
        Hang,
    }

    struct FakeRecognizer {
        supported: bool,
        behaviour: Behaviour,
    }

    #[async_trait]
    impl SpeechRecognizer for FakeRecognizer {
        fn is_supported(&self) -> bool {
            self.supported
        }

        async fn recognize(&self) -> Result<Option<Recognition>> {
            match self.behaviour {
                Behaviour::Say(text) => {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(Some(Recognition::new(text, Some(0.92))))
                }
                Behaviour::Silence => Ok(None),
                Behaviour::Fail => anyhow::bail!("microphone unplugged"),
                Behaviour::Hang => std::future::pending().await,
            }
        }
    }

    fn listener(behaviour: Behaviour, ceiling: Option<Duration>) -> Listener {
        Listener::detect(
            Arc::new(FakeRecognizer {
                supported: true,
                behaviour,
            }),
            ceiling,
        )
    }

    #[tokio::test]
    async fn test_heard_utterance() {
        let listener = listener(Behaviour::Say("I like football."), None);
        let outcome = listener.listen().await.unwrap();

        match outcome {
            ListenOutcome::Heard(r) => {
                assert_eq!(r.transcript, "I like football.");
                assert_eq!(r.confidence, Some(0.92));
            }
            other => panic!("Expected Heard, got {other:?}"),
        }
        assert!(!listener.is_listening());
    }

    #[tokio::test]
    async fn test_unsupported_recognizer_is_never_offered() {
        let listener = Listener::detect(
            Arc::new(FakeRecognizer {
                supported: false,
                behaviour: Behaviour::Say("hi"),
            }),
            None,
        );
        assert!(!listener.is_supported());
        assert!(matches!(
            listener.listen().await,
            Err(ListenError::Unsupported)
        ));
        assert!(!Listener::unsupported().is_supported());
    }

    #[tokio::test]
    async fn test_failure_clears_listening_flag() {
        let listener = listener(Behaviour::Fail, None);
        let outcome = listener.listen().await.unwrap();
        assert!(matches!(outcome, ListenOutcome::Failed(msg) if msg.contains("unplugged")));
        assert!(!listener.is_listening());
    }

    #[tokio::test]
    async fn test_silence_is_no_speech() {
        let listener = listener(Behaviour::Silence, None);
        assert_eq!(listener.listen().await.unwrap(), ListenOutcome::NoSpeech);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ceiling_force_stops_capture() {
        let listener = listener(Behaviour::Hang, Some(DEFAULT_LISTEN_CEILING));
        let outcome = listener.listen().await.unwrap();
        assert_eq!(outcome, ListenOutcome::TimedOut);
        assert!(!listener.is_listening());
    }

    #[tokio::test]
    async fn test_second_capture_is_rejected_while_listening() {
        let listener = listener(Behaviour::Say("hello"), None);

        let (first, second) = tokio::join!(listener.listen(), async {
            tokio::task::yield_now().await;
            listener.listen().await
        });

        assert!(matches!(first, Ok(ListenOutcome::Heard(_))));
        assert!(matches!(second, Err(ListenError::AlreadyListening)));
        assert!(!listener.is_listening());
    }

    #[tokio::test]
    async fn test_dropped_capture_clears_flag() {
        let listener = listener(Behaviour::Hang, None);
        let result =
            tokio::time::timeout(Duration::from_millis(20), listener.listen()).await;
        assert!(result.is_err());
        assert!(!listener.is_listening());
    }
}
