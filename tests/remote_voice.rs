#![allow(clippy::unwrap_used)]
//! Contract tests for the TTS endpoint and the remote teacher voice.

use std::time::Duration;

use havo_speak::voice::{RemoteVoice, RemoteVoiceSettings, TeacherVoice, TtsClient};
use serde_json::json;
use tokio::time::timeout;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings() -> RemoteVoiceSettings {
    RemoteVoiceSettings {
        voice_name: "en-GB-Standard-A".to_string(),
        style: "friendly British English teacher".to_string(),
        multi_speaker: false,
    }
}

async fn tts_server(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tts"))
        .and(body_partial_json(json!({
            "text": "Hello there",
            "voiceName": "en-GB-Standard-A",
            "multiSpeaker": false,
            "style": "friendly British English teacher"
        })))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

fn audio() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(b"ID3fakeaudio".to_vec(), "audio/mpeg")
}

#[tokio::test]
async fn test_synthesize_returns_clip() {
    let server = tts_server(audio()).await;
    let client = TtsClient::new(server.uri(), settings());

    let clip = client.synthesize("Hello there").await.unwrap();

    assert_eq!(&clip.bytes[..], b"ID3fakeaudio");
    assert_eq!(clip.extension(), ".mp3");
}

#[tokio::test]
async fn test_synthesize_error_status() {
    let server = tts_server(ResponseTemplate::new(500).set_body_string("quota exceeded")).await;
    let client = TtsClient::new(server.uri(), settings());

    let err = client.synthesize("Hello there").await.unwrap_err();
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_synthesize_empty_clip() {
    let server = tts_server(ResponseTemplate::new(200)).await;
    let client = TtsClient::new(server.uri(), settings());

    assert!(client.synthesize("Hello there").await.is_err());
}

#[cfg(unix)]
#[tokio::test]
async fn test_remote_voice_plays_and_goes_idle() {
    let server = tts_server(audio()).await;
    let mut voice = RemoteVoice::new(
        TtsClient::new(server.uri(), settings()),
        vec!["true".to_string()],
    );
    let mut state = voice.subscribe();

    let id = voice.speak("Hello there").unwrap();
    assert!(voice.is_speaking());
    assert_eq!(state.borrow().speaking, Some(id));

    timeout(Duration::from_secs(5), state.wait_for(|s| !s.is_speaking()))
        .await
        .unwrap()
        .unwrap();
    assert!(!voice.is_speaking());
    assert_eq!(state.borrow().highlight, None);
}

#[tokio::test]
async fn test_remote_voice_failure_clears_state() {
    let server = tts_server(ResponseTemplate::new(503)).await;
    let mut voice = RemoteVoice::new(
        TtsClient::new(server.uri(), settings()),
        vec!["true".to_string()],
    );
    let mut state = voice.subscribe();

    voice.speak("Hello there").unwrap();

    timeout(Duration::from_secs(5), state.wait_for(|s| !s.is_speaking()))
        .await
        .unwrap()
        .unwrap();
    assert!(!voice.is_speaking());
}

#[tokio::test]
async fn test_remote_voice_ignores_blank_text() {
    let server = MockServer::start().await;
    let mut voice = RemoteVoice::new(
        TtsClient::new(server.uri(), settings()),
        vec!["true".to_string()],
    );

    assert!(voice.speak("   ").is_none());
    assert!(!voice.is_speaking());
    voice.stop();
}
