//! ElevenLabs Provider Unit Tests
//!
//! Dialogue synthesis, streaming and error mapping against a wiremock server.

use std::time::Duration;

use futures_util::TryStreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::voice::{
    DialogueInput, ElevenLabsConfig, ElevenLabsProvider, OutputFormat, VoiceError, VoiceProvider,
};

fn config_for(server: &MockServer) -> ElevenLabsConfig {
    let mut config = ElevenLabsConfig::new("xi-test");
    config.base_url = Some(server.uri());
    config
}

fn dialogue() -> Vec<DialogueInput> {
    vec![
        DialogueInput::new("[excited] Welcome!", "voice-a"),
        DialogueInput::new("Glad to be here.", "voice-b"),
    ]
}

#[tokio::test]
async fn test_synthesize_dialogue_returns_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/text-to-dialogue"))
        .and(query_param("output_format", "mp3_44100_128"))
        .and(header("xi-api-key", "xi-test"))
        .and(body_partial_json(json!({
            "model_id": "eleven_v3",
            "inputs": [
                {"text": "[excited] Welcome!", "voice_id": "voice-a"},
                {"text": "Glad to be here.", "voice_id": "voice-b"}
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                .set_body_bytes(vec![7u8; 64]),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = ElevenLabsProvider::new(config_for(&server));
    let audio = provider.synthesize_dialogue(&dialogue()).await.unwrap();
    assert_eq!(audio, vec![7u8; 64]);
}

#[tokio::test]
async fn test_stream_dialogue_yields_all_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/text-to-dialogue/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 4096]))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ElevenLabsProvider::new(config_for(&server));
    let chunks: Vec<_> = provider
        .stream_dialogue(&dialogue())
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    let total: usize = chunks.iter().map(|c| c.len()).sum();
    assert_eq!(total, 4096);
}

#[tokio::test]
async fn test_output_format_is_configurable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(query_param("output_format", "mp3_22050_32"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 8]))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.output_format = OutputFormat::Mp3_22050_32;
    let provider = ElevenLabsProvider::new(config);
    assert_eq!(provider.bytes_per_second(), OutputFormat::Mp3_22050_32.bytes_per_second());
    assert!(provider.synthesize_dialogue(&dialogue()).await.is_ok());
}

// =============================================================================
// Error Mapping
// =============================================================================

#[tokio::test]
async fn test_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = ElevenLabsProvider::new(config_for(&server))
        .synthesize_dialogue(&dialogue())
        .await
        .unwrap_err();
    assert!(matches!(err, VoiceError::RateLimitExceeded));
}

#[tokio::test]
async fn test_invalid_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = ElevenLabsProvider::new(config_for(&server))
        .stream_dialogue(&dialogue())
        .await
        .err()
        .expect("expected an error");
    assert!(matches!(err, VoiceError::ApiError(msg) if msg == "Invalid API key"));
}

#[tokio::test]
async fn test_quota_exceeded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": {"status": "quota_exceeded", "message": "out of credits"}
        })))
        .mount(&server)
        .await;

    let err = ElevenLabsProvider::new(config_for(&server))
        .synthesize_dialogue(&dialogue())
        .await
        .unwrap_err();
    assert!(matches!(err, VoiceError::QuotaExceeded));
}

#[tokio::test]
async fn test_other_error_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_string("voice_not_found"))
        .mount(&server)
        .await;

    let err = ElevenLabsProvider::new(config_for(&server))
        .synthesize_dialogue(&dialogue())
        .await
        .unwrap_err();
    assert!(matches!(err, VoiceError::ApiError(msg) if msg.contains("voice_not_found")));
}

#[tokio::test]
async fn test_slow_synthesis_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0u8; 8])
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.timeout_secs = 1;
    let err = ElevenLabsProvider::new(config)
        .synthesize_dialogue(&dialogue())
        .await
        .unwrap_err();
    assert!(matches!(err, VoiceError::Timeout));
}
