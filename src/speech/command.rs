//! Recognizer backed by an external speech-to-text command.
//!
//! The command records one utterance from the microphone and prints the
//! transcript on stdout, optionally followed by a tab and a confidence value.

use std::process::Stdio;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{Recognition, SpeechRecognizer};

/// Recognition language passed to the command through `{lang}`.
pub const RECOGNITION_LANG: &str = "en-US";

#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    argv: Vec<String>,
}

impl CommandRecognizer {
    /// Builds a recognizer from an argv; `{lang}` in any argument is replaced
    /// by the recognition language.
    #[allow(clippy::literal_string_with_formatting_args)]
    pub fn new(argv: &[String]) -> Self {
        Self {
            argv: argv
                .iter()
                .map(|arg| arg.replace("{lang}", RECOGNITION_LANG))
                .collect(),
        }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

/// Splits `transcript[\tconfidence]` output. Empty output means no speech.
pub fn parse_recognizer_output(stdout: &str) -> Option<Recognition> {
    let line = stdout.lines().find(|l| !l.trim().is_empty())?;

    match line.rsplit_once('\t') {
        Some((text, confidence)) => {
            let confidence = confidence
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|c| (0.0..=1.0).contains(c));
            let text = text.trim();
            (!text.is_empty()).then(|| Recognition::new(text, confidence))
        }
        None => Some(Recognition::new(line.trim(), None)),
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    fn is_supported(&self) -> bool {
        self.argv
            .first()
            .is_some_and(|program| which::which(program).is_ok())
    }

    async fn recognize(&self) -> Result<Option<Recognition>> {
        let Some((program, args)) = self.argv.split_first() else {
            bail!("No speech recognizer command configured");
        };

        debug!("Listening via {program}");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to run speech recognizer: {program}"))?;

        if !output.status.success() {
            bail!("Speech recognizer {program} exited with {}", output.status);
        }

        Ok(parse_recognizer_output(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_placeholder_is_expanded() {
        let recognizer = CommandRecognizer::new(&[
            "whisper-listen".to_string(),
            "--lang={lang}".to_string(),
        ]);
        assert_eq!(recognizer.argv(), &["whisper-listen", "--lang=en-US"]);
    }

    #[test]
    fn test_parse_plain_transcript() {
        let r = parse_recognizer_output("I like football.\n").unwrap();
        assert_eq!(r.transcript, "I like football.");
        assert_eq!(r.confidence, None);
    }

    #[test]
    fn test_parse_transcript_with_confidence() {
        let r = parse_recognizer_output("\nI like football.\t0.87\n").unwrap();
        assert_eq!(r.transcript, "I like football.");
        assert_eq!(r.confidence, Some(0.87));
    }

    #[test]
    fn test_parse_out_of_range_confidence_is_dropped() {
        let r = parse_recognizer_output("Hello\t87").unwrap();
        assert_eq!(r.confidence, None);
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_recognizer_output("").is_none());
        assert!(parse_recognizer_output("  \n\n").is_none());
        assert!(parse_recognizer_output("\t0.5").is_none());
    }

    #[test]
    fn test_missing_program_is_unsupported() {
        let recognizer = CommandRecognizer::new(&["no-such-recognizer-binary".to_string()]);
        assert!(!recognizer.is_supported());
        assert!(!CommandRecognizer::new(&[]).is_supported());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recognize_reads_stdout() {
        let recognizer = CommandRecognizer::new(&[
            "sh".to_string(),
            "-c".to_string(),
            "printf 'Hello teacher\\t0.5\\n'".to_string(),
        ]);
        let r = recognizer.recognize().await.unwrap().unwrap();
        assert_eq!(r.transcript, "Hello teacher");
        assert_eq!(r.confidence, Some(0.5));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recognize_failing_command() {
        let recognizer = CommandRecognizer::new(&["false".to_string()]);
        assert!(recognizer.recognize().await.is_err());
    }
}
