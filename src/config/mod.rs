mod manager;

pub use manager::{
    ConfigFile, ConfigManager, DEFAULT_AI_MODEL, DEFAULT_ENDPOINT, ResolveOptions, ResolvedConfig,
    SpeakConfig, SttConfig, TtsConfig, resolve_config,
};
