#![allow(clippy::unwrap_used)]
//! Config priority contract tests.
//!
//! Priority order (highest to lowest):
//! 1. CLI arguments
//! 2. Config file
//! 3. Built-in defaults

use std::time::Duration;

use havo_speak::config::{
    ConfigFile, ConfigManager, DEFAULT_AI_MODEL, DEFAULT_ENDPOINT, ResolveOptions, SpeakConfig,
    TtsConfig, resolve_config,
};
use havo_speak::session::FeedbackMode;
use havo_speak::speech::DEFAULT_LISTEN_CEILING;
use havo_speak::voice::VoiceKind;
use serial_test::serial;
use tempfile::TempDir;

fn make_config_with_defaults() -> ConfigFile {
    ConfigFile {
        speak: SpeakConfig {
            endpoint: Some("http://config.local:3000".to_string()),
            ai_model: Some("config_model".to_string()),
            voice: Some(VoiceKind::Remote),
            feedback: Some(FeedbackMode::Spoken),
            listen_timeout_secs: Some(20),
        },
        tts: TtsConfig {
            voice_name: Some("en-GB-Config".to_string()),
            ..TtsConfig::default()
        },
        ..ConfigFile::default()
    }
}

#[test]
fn test_cli_endpoint_overrides_config() {
    let options = ResolveOptions {
        endpoint: Some("http://cli.local:8080/".to_string()),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &make_config_with_defaults()).unwrap();

    assert_eq!(resolved.endpoint, "http://cli.local:8080");
    // Untouched settings still come from the file.
    assert_eq!(resolved.ai_model, "config_model");
    assert_eq!(resolved.voice, VoiceKind::Remote);
}

#[test]
fn test_cli_model_and_voice_override_config() {
    let options = ResolveOptions {
        model: Some("cli_model".to_string()),
        voice: Some(VoiceKind::Local),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &make_config_with_defaults()).unwrap();

    assert_eq!(resolved.ai_model, "cli_model");
    assert_eq!(resolved.voice, VoiceKind::Local);
    assert_eq!(resolved.endpoint, "http://config.local:3000");
}

#[test]
fn test_config_values_used_without_cli() {
    let resolved =
        resolve_config(&ResolveOptions::default(), &make_config_with_defaults()).unwrap();

    assert_eq!(resolved.endpoint, "http://config.local:3000");
    assert_eq!(resolved.feedback, FeedbackMode::Spoken);
    assert_eq!(resolved.listen_ceiling, Some(Duration::from_secs(20)));
    assert_eq!(resolved.tts.voice_name, "en-GB-Config");
}

#[test]
fn test_builtin_defaults_fill_the_gaps() {
    let resolved = resolve_config(&ResolveOptions::default(), &ConfigFile::default()).unwrap();

    assert_eq!(resolved.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(resolved.ai_model, DEFAULT_AI_MODEL);
    assert_eq!(resolved.voice, VoiceKind::Local);
    assert_eq!(resolved.feedback, FeedbackMode::Written);
    assert_eq!(resolved.listen_ceiling, Some(DEFAULT_LISTEN_CEILING));
}

#[test]
fn test_cli_topic_is_validated() {
    let options = ResolveOptions {
        topic: Some("sports".to_string()),
        ..ResolveOptions::default()
    };
    let resolved = resolve_config(&options, &ConfigFile::default()).unwrap();
    assert_eq!(resolved.topic.unwrap().title, "Sport & Beweging");
}

#[test]
#[serial]
fn test_manager_follows_xdg_config_home() {
    let home = TempDir::new().unwrap();
    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe { std::env::set_var("XDG_CONFIG_HOME", home.path()) };

    let manager = ConfigManager::new().unwrap();
    manager.save(&make_config_with_defaults()).unwrap();
    let loaded = manager.load_or_default().unwrap();

    match original {
        Some(v) => unsafe { std::env::set_var("XDG_CONFIG_HOME", v) },
        None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
    }

    assert_eq!(
        manager.config_path(),
        &home.path().join("havo-speak").join("config.toml")
    );
    assert_eq!(loaded, make_config_with_defaults());
}
