//! Configure command handler for editing default settings.

use anyhow::{Result, bail};
use inquire::{Select, Text};

use crate::config::{
    ConfigFile, ConfigManager, DEFAULT_AI_MODEL, DEFAULT_ENDPOINT, ResolveOptions, SpeakConfig,
    resolve_config,
};
use crate::session::FeedbackMode;
use crate::ui::{Style, handle_prompt_cancellation};
use crate::voice::VoiceKind;

/// Runs the configure command.
///
/// With `show` the current settings are printed; otherwise the `[speak]`
/// defaults are edited interactively.
pub fn run_configure(show: bool) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;

    if show {
        print_config(&manager, &config);
        return Ok(());
    }

    let Some(speak) = handle_prompt_cancellation(|| prompt_speak_config(&config.speak))? else {
        return Ok(());
    };
    let config = ConfigFile { speak, ..config };

    // Refuse to save something the practice command would reject.
    resolve_config(&ResolveOptions::default(), &config)?;
    manager.save(&config)?;

    println!();
    println!(
        "{} Configuratie opgeslagen in {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display())
    );

    Ok(())
}

fn print_config(manager: &ConfigManager, config: &ConfigFile) {
    println!(
        "{} {}",
        Style::header("Configuratie"),
        Style::secondary(manager.config_path().display())
    );
    print_setting("endpoint", config.speak.endpoint.as_deref());
    print_setting("ai_model", config.speak.ai_model.as_deref());
    print_setting(
        "voice",
        config.speak.voice.map(|v| v.to_string()).as_deref(),
    );
    print_setting(
        "feedback",
        config.speak.feedback.map(|f| f.to_string()).as_deref(),
    );
    print_setting(
        "listen_timeout_secs",
        config
            .speak
            .listen_timeout_secs
            .map(|s| s.to_string())
            .as_deref(),
    );
    print_setting("tts.voice_name", config.tts.voice_name.as_deref());
    print_setting("tts.style", config.tts.style.as_deref());
    print_setting(
        "tts.player",
        config.tts.player.as_ref().map(|p| p.join(" ")).as_deref(),
    );
    print_setting(
        "stt.command",
        config.stt.command.as_ref().map(|c| c.join(" ")).as_deref(),
    );
    println!();
}

fn print_setting(key: &str, value: Option<&str>) {
    println!(
        "  {:<20} {}",
        Style::label(key),
        value.map_or_else(|| Style::secondary("(niet ingesteld)"), Style::value)
    );
}

fn prompt_speak_config(current: &SpeakConfig) -> Result<SpeakConfig> {
    let endpoint = Text::new("Endpoint:")
        .with_default(current.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))
        .with_help_message("Basis-URL van /api/chat en /api/tts")
        .prompt()?;

    let ai_model = Text::new("AI-model:")
        .with_default(current.ai_model.as_deref().unwrap_or(DEFAULT_AI_MODEL))
        .prompt()?;
    if ai_model.trim().is_empty() {
        bail!("AI-model mag niet leeg zijn");
    }

    let voice = select_with_default(
        "Stem van de docent:",
        vec![VoiceKind::Local, VoiceKind::Remote],
        current.voice.unwrap_or_default(),
    )?;

    let feedback = select_with_default(
        "Feedback op ingesproken antwoorden:",
        vec![FeedbackMode::Written, FeedbackMode::Spoken],
        current.feedback.unwrap_or_default(),
    )?;

    let timeout = Text::new("Maximale opnameduur in seconden (0 = geen):")
        .with_default(
            &current
                .listen_timeout_secs
                .map_or_else(|| "10".to_string(), |s| s.to_string()),
        )
        .prompt()?;
    let listen_timeout_secs = parse_timeout(&timeout)?;

    Ok(SpeakConfig {
        endpoint: Some(endpoint.trim().to_string()),
        ai_model: Some(ai_model.trim().to_string()),
        voice: Some(voice),
        feedback: Some(feedback),
        listen_timeout_secs: Some(listen_timeout_secs),
    })
}

fn select_with_default<T: std::fmt::Display + PartialEq>(
    message: &str,
    options: Vec<T>,
    default: T,
) -> Result<T> {
    let default_index = options.iter().position(|o| *o == default).unwrap_or(0);
    Ok(Select::new(message, options)
        .with_starting_cursor(default_index)
        .prompt()?)
}

fn parse_timeout(input: &str) -> Result<u64> {
    input
        .trim()
        .parse::<u64>()
        .map_err(|_| anyhow::anyhow!("Ongeldige opnameduur: '{input}' (verwacht een heel getal)"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout(" 15 ").unwrap(), 15);
        assert_eq!(parse_timeout("0").unwrap(), 0);
        assert!(parse_timeout("tien").is_err());
        assert!(parse_timeout("-1").is_err());
    }
}
