//! `espeak-ng` as the local synthesis engine.

use std::process::Stdio;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::process::Command;

use super::local::{SynthesisEngine, Utterance, VoiceInfo};

pub const ESPEAK_PROGRAM: &str = "espeak-ng";

/// espeak-ng's default speaking rate in words per minute.
const DEFAULT_WPM: u32 = 175;

#[derive(Debug, Clone)]
pub struct EspeakEngine {
    program: String,
}

impl Default for EspeakEngine {
    fn default() -> Self {
        Self {
            program: ESPEAK_PROGRAM.to_string(),
        }
    }
}

impl EspeakEngine {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Whether the engine binary can be found on `PATH`.
    pub fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    fn speak_args(utterance: &Utterance) -> Vec<String> {
        let rate_percent = (utterance.rate.max(0.1) * 100.0).round() as u32;
        let wpm = DEFAULT_WPM * rate_percent / 100;
        let amplitude = (utterance.volume.clamp(0.0, 2.0) * 100.0).round() as u32;
        let pitch = (utterance.pitch.clamp(0.0, 2.0) * 50.0).round().min(99.0) as u32;

        vec![
            "-v".to_string(),
            utterance.voice.lang.clone(),
            "-s".to_string(),
            wpm.to_string(),
            "-a".to_string(),
            amplitude.to_string(),
            "-p".to_string(),
            pitch.to_string(),
            "--".to_string(),
            utterance.text.clone(),
        ]
    }
}

/// Parses `espeak-ng --voices` output.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  2  en-gb           --/M      English_(Great_Britain) gmw/en
/// ```
pub fn parse_voice_list(output: &str) -> Vec<VoiceInfo> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [_, lang, _, name, ..] => Some(VoiceInfo::new(name.replace('_', " "), *lang)),
                _ => None,
            }
        })
        .collect()
}

#[async_trait]
impl SynthesisEngine for EspeakEngine {
    async fn voices(&self) -> Result<Vec<VoiceInfo>> {
        let output = Command::new(&self.program)
            .arg("--voices=en")
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !output.status.success() {
            bail!("{} --voices exited with {}", self.program, output.status);
        }

        Ok(parse_voice_list(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn say(&self, utterance: &Utterance) -> Result<()> {
        let status = Command::new(&self.program)
            .args(Self::speak_args(utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !status.success() {
            bail!("{} exited with {status}", self.program);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 2  en-029          --/M      English_(Caribbean) gmw/en-029           (en 10)
 2  en-gb           --/M      English_(Great_Britain) gmw/en               (en 2)
 5  en-gb-scotland  --/M      English_(Scotland) gmw/en-GB-scotland   (en 4)
 2  en-us           --/M      English_(America)  gmw/en-US            (en 3)
";

    #[test]
    fn test_parse_voice_list() {
        let voices = parse_voice_list(SAMPLE);
        assert_eq!(voices.len(), 4);
        assert_eq!(voices[1], VoiceInfo::new("English (Great Britain)", "en-gb"));
        assert_eq!(voices[3].lang, "en-us");
    }

    #[test]
    fn test_parse_voice_list_ignores_short_lines() {
        assert!(parse_voice_list("header\n\n  \nbroken line\n").is_empty());
    }

    #[test]
    fn test_selection_on_espeak_voices_prefers_british() {
        let voices = parse_voice_list(SAMPLE);
        let chosen = crate::voice::select_voice(&voices);
        assert_eq!(chosen.map(|v| v.lang.as_str()), Some("en-gb"));
    }

    #[test]
    fn test_speak_args_apply_rate() {
        let utterance = Utterance::teacher("Hi there", VoiceInfo::new("English", "en-gb"));
        let args = EspeakEngine::speak_args(&utterance);
        assert_eq!(
            args,
            vec!["-v", "en-gb", "-s", "157", "-a", "80", "-p", "50", "--", "Hi there"]
        );
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let engine = EspeakEngine::with_program("definitely-not-a-real-tts-binary");
        assert!(!engine.is_available());
    }
}
