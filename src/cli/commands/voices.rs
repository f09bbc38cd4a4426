//! Lists the local synthesis voices and marks the one the teacher would use.

use anyhow::{Result, bail};

use crate::ui::Style;
use crate::voice::{ESPEAK_PROGRAM, EspeakEngine, SynthesisEngine, VoiceInfo, select_voice};

pub async fn print_voices() -> Result<()> {
    let engine = EspeakEngine::default();
    if !engine.is_available() {
        bail!(
            "{ESPEAK_PROGRAM} niet gevonden\n\n\
             Installeer {ESPEAK_PROGRAM} voor de lokale stem, of gebruik --voice remote"
        );
    }

    let voices = engine.voices().await?;
    print!("{}", format_voices(&voices));
    Ok(())
}

fn format_voices(voices: &[VoiceInfo]) -> String {
    if voices.is_empty() {
        return format!("{}\n", Style::warning("Geen Engelse stemmen gevonden."));
    }

    let selected = select_voice(voices);
    let mut out = format!("{}\n", Style::header("Engelse stemmen"));
    for voice in voices {
        let marker = if selected == Some(voice) {
            Style::success(" (docent)")
        } else {
            String::new()
        };
        out.push_str(&format!(
            "  {:<8} {}{}\n",
            Style::code(&voice.lang),
            Style::value(&voice.name),
            marker
        ));
    }
    out
}
