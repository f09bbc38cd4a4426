use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::practice::PracticeSession;
use crate::session::{SessionController, SessionSettings};
use crate::speech::{CommandRecognizer, Listener};
use crate::teacher::{ChatClient, HttpChatClient};
use crate::voice::{EspeakEngine, LocalVoice, RemoteVoice, TeacherVoice, TtsClient, VoiceKind};

pub struct PracticeOptions {
    pub topic: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub voice: Option<VoiceKind>,
}

pub async fn run_practice(options: PracticeOptions) -> Result<()> {
    let config = load_practice_config(options)?;
    info!(
        "Practising against {} with the {} voice",
        config.endpoint, config.voice
    );

    let chat: Arc<dyn ChatClient> = Arc::new(HttpChatClient::new(config.endpoint.clone()));
    let controller = SessionController::new(
        chat,
        build_voice(&config),
        SessionSettings {
            ai_model: config.ai_model.clone(),
            feedback_mode: config.feedback,
        },
    );

    let mut session = PracticeSession::new(controller, build_listener(&config), config.topic);
    session.run().await
}

fn load_practice_config(options: PracticeOptions) -> Result<ResolvedConfig> {
    let manager = ConfigManager::new()?;
    let file_config = manager.load_or_default()?;

    resolve_config(
        &ResolveOptions {
            endpoint: options.endpoint,
            model: options.model,
            voice: options.voice,
            topic: options.topic,
        },
        &file_config,
    )
}

fn build_voice(config: &ResolvedConfig) -> Box<dyn TeacherVoice> {
    match config.voice {
        VoiceKind::Local => {
            let engine = EspeakEngine::default();
            if !engine.is_available() {
                warn!("espeak-ng not found on PATH; the teacher will not be audible");
            }
            Box::new(LocalVoice::new(engine))
        }
        VoiceKind::Remote => Box::new(RemoteVoice::new(
            TtsClient::new(config.endpoint.clone(), config.tts.clone()),
            config.player.clone(),
        )),
    }
}

fn build_listener(config: &ResolvedConfig) -> Listener {
    if config.stt_command.is_empty() {
        info!("No speech recognizer configured; voice input disabled");
        return Listener::unsupported();
    }
    Listener::detect(
        Arc::new(CommandRecognizer::new(&config.stt_command)),
        config.listen_ceiling,
    )
}
