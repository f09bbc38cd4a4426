use anyhow::{Context, Result, bail};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::paths;
use crate::session::FeedbackMode;
use crate::speech::DEFAULT_LISTEN_CEILING;
use crate::topics::{Topic, validate_topic};
use crate::voice::{RemoteVoiceSettings, VoiceKind};

/// Chat and TTS base URL used when nothing is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000";

/// Model-selection hint sent with every chat request.
pub const DEFAULT_AI_MODEL: &str = "smart";

const DEFAULT_TTS_VOICE: &str = "en-GB-Standard-A";
const DEFAULT_TTS_STYLE: &str = "friendly British English teacher";
const DEFAULT_PLAYER: &[&str] = &["ffplay", "-nodisp", "-autoexit", "-loglevel", "quiet"];

/// Settings in the `[speak]` section of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakConfig {
    /// Base URL of the chat and TTS endpoints.
    pub endpoint: Option<String>,
    pub ai_model: Option<String>,
    pub voice: Option<VoiceKind>,
    pub feedback: Option<FeedbackMode>,
    /// Hard ceiling on one voice capture; `0` disables it.
    pub listen_timeout_secs: Option<u64>,
}

/// Settings in the `[tts]` section, used by the remote voice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtsConfig {
    pub voice_name: Option<String>,
    pub style: Option<String>,
    pub multi_speaker: Option<bool>,
    /// Audio player argv; the clip path is appended.
    pub player: Option<Vec<String>>,
}

/// Settings in the `[stt]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SttConfig {
    /// Speech-to-text argv; `{lang}` expands to the recognition language.
    pub command: Option<Vec<String>>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/havo-speak/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub speak: SpeakConfig,
    #[serde(default)]
    pub tts: TtsConfig,
    #[serde(default)]
    pub stt: SttConfig,
}

/// Resolved configuration after merging CLI arguments, the config file and
/// built-in defaults.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub ai_model: String,
    pub voice: VoiceKind,
    pub feedback: FeedbackMode,
    pub listen_ceiling: Option<Duration>,
    /// Topic chosen on the command line; asked interactively otherwise.
    pub topic: Option<&'static Topic>,
    pub tts: RemoteVoiceSettings,
    pub player: Vec<String>,
    /// Speech-to-text argv; empty when voice input is not configured.
    pub stt_command: Vec<String>,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub voice: Option<VoiceKind>,
    pub topic: Option<String>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// # Errors
///
/// Returns an error if the endpoint is not an http(s) URL, the topic is
/// unknown, or the player command is empty.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    let endpoint = options
        .endpoint
        .as_deref()
        .or(config_file.speak.endpoint.as_deref())
        .unwrap_or(DEFAULT_ENDPOINT);
    let endpoint = validate_endpoint(endpoint)?;

    let ai_model = options
        .model
        .as_ref()
        .or(config_file.speak.ai_model.as_ref())
        .cloned()
        .unwrap_or_else(|| DEFAULT_AI_MODEL.to_string());

    let voice = options
        .voice
        .or(config_file.speak.voice)
        .unwrap_or_default();

    let topic = options.topic.as_deref().map(validate_topic).transpose()?;

    let listen_ceiling = match config_file.speak.listen_timeout_secs {
        None => Some(DEFAULT_LISTEN_CEILING),
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
    };

    let tts = RemoteVoiceSettings {
        voice_name: config_file
            .tts
            .voice_name
            .clone()
            .unwrap_or_else(|| DEFAULT_TTS_VOICE.to_string()),
        style: config_file
            .tts
            .style
            .clone()
            .unwrap_or_else(|| DEFAULT_TTS_STYLE.to_string()),
        multi_speaker: config_file.tts.multi_speaker.unwrap_or(false),
    };

    let player = config_file
        .tts
        .player
        .clone()
        .unwrap_or_else(|| DEFAULT_PLAYER.iter().map(ToString::to_string).collect());
    if voice == VoiceKind::Remote && player.is_empty() {
        bail!(
            "Empty audio player command\n\n\
             Set [tts] player in ~/.config/havo-speak/config.toml, e.g.:\n  \
             player = [\"ffplay\", \"-nodisp\", \"-autoexit\"]"
        );
    }

    Ok(ResolvedConfig {
        endpoint,
        ai_model,
        voice,
        feedback: config_file.speak.feedback.unwrap_or_default(),
        listen_ceiling,
        topic,
        tts,
        player,
        stt_command: config_file.stt.command.clone().unwrap_or_default(),
    })
}

/// Checks the endpoint is an http(s) URL and strips a trailing slash.
fn validate_endpoint(endpoint: &str) -> Result<String> {
    let url = Url::parse(endpoint).with_context(|| {
        format!(
            "Invalid endpoint URL: '{endpoint}'\n\n\
             Use a full URL such as {DEFAULT_ENDPOINT}"
        )
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        bail!("Invalid endpoint URL: '{endpoint}' (expected http or https)");
    }

    Ok(endpoint.trim_end_matches('/').to_string())
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/havo-speak/config.toml`
    /// or `~/.config/havo-speak/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    /// A manager for an explicit file location.
    pub const fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    /// Loads the file, falling back to defaults when it is missing.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}
