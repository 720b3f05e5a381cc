use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use reqwest::{Client, Response};
use serde_json::json;
use std::time::Duration;

use crate::core::voice::providers::{AudioStream, VoiceProvider};
use crate::core::voice::types::{
    DialogueInput, ElevenLabsConfig, Result, VoiceError, ELEVENLABS_BASE_URL,
};

const DEFAULT_DIALOGUE_MODEL: &str = "eleven_v3";

pub struct ElevenLabsProvider {
    client: Client,
    config: ElevenLabsConfig,
    base_url: String,
}

impl ElevenLabsProvider {
    pub fn new(config: ElevenLabsConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(ELEVENLABS_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Self {
            client,
            config,
            base_url,
        }
    }

    fn body(&self, inputs: &[DialogueInput]) -> serde_json::Value {
        let model_id = self.config.model_id.as_deref().unwrap_or(DEFAULT_DIALOGUE_MODEL);
        json!({
            "inputs": inputs,
            "model_id": model_id,
        })
    }

    async fn post_dialogue(&self, path: &str, inputs: &[DialogueInput]) -> Result<Response> {
        if inputs.is_empty() {
            return Err(VoiceError::NoDialogue);
        }

        let url = format!("{}{}", self.base_url, path);
        let response = self.client
            .post(&url)
            .query(&[("output_format", self.config.output_format.as_query())])
            .header("xi-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .header("Accept", self.config.output_format.mime_type())
            .json(&self.body(inputs))
            .send()
            .await
            .map_err(|e| if e.is_timeout() { VoiceError::Timeout } else { VoiceError::NetworkError(e) })?;

        if response.status() == 429 {
            return Err(VoiceError::RateLimitExceeded);
        }

        if response.status() == 401 {
            return Err(VoiceError::ApiError("Invalid API key".to_string()));
        }

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if error_text.contains("quota_exceeded") {
                return Err(VoiceError::QuotaExceeded);
            }
            return Err(VoiceError::ApiError(format!(
                "ElevenLabs API error: {}", error_text
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl VoiceProvider for ElevenLabsProvider {
    fn id(&self) -> &'static str {
        "elevenlabs"
    }

    fn mime_type(&self) -> &'static str {
        self.config.output_format.mime_type()
    }

    fn bytes_per_second(&self) -> u32 {
        self.config.output_format.bytes_per_second()
    }

    async fn synthesize_dialogue(&self, inputs: &[DialogueInput]) -> Result<Vec<u8>> {
        let response = self.post_dialogue("/text-to-dialogue", inputs).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn stream_dialogue(&self, inputs: &[DialogueInput]) -> Result<AudioStream> {
        let response = self.post_dialogue("/text-to-dialogue/stream", inputs).await?;
        Ok(response.bytes_stream().map_err(VoiceError::from).boxed())
    }
}
