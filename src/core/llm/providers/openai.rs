//! OpenAI Provider Implementation
//!
//! Chat completions with optional strict JSON-schema structured output.
//! Any OpenAI-compatible endpoint works through `base_url`.

use crate::core::llm::error::{LLMError, Result};
use crate::core::llm::provider::LLMProvider;
use crate::core::llm::types::{
    ChatRequest, ChatResponse, MessageRole, ResponseFormat, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI provider
pub struct OpenAIProvider {
    api_key: String,
    model: String,
    max_tokens: u32,
    organization_id: Option<String>,
    base_url: String,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(
        api_key: String,
        model: String,
        max_tokens: u32,
        organization_id: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        Self::with_timeout(
            api_key,
            model,
            max_tokens,
            organization_id,
            base_url,
            Duration::from_secs(300),
        )
    }

    pub fn with_timeout(
        api_key: String,
        model: String,
        max_tokens: u32,
        organization_id: Option<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Self {
        // Client::new() never fails; fall back to it if the builder does
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            model,
            max_tokens,
            organization_id,
            base_url: base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_messages(&self, request: &ChatRequest) -> Vec<serde_json::Value> {
        let mut messages = Vec::new();

        if let Some(system) = &request.system_prompt {
            messages.push(serde_json::json!({
                "role": "system",
                "content": system
            }));
        }

        for msg in &request.messages {
            messages.push(serde_json::json!({
                "role": match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                },
                "content": msg.content
            }));
        }

        messages
    }

    pub(crate) fn build_body(&self, request: &ChatRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": self.build_messages(request),
            "max_tokens": request.max_tokens.unwrap_or(self.max_tokens)
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        if let Some(ResponseFormat::JsonSchema { name, schema }) = &request.response_format {
            body["response_format"] = serde_json::json!({
                "type": "json_schema",
                "json_schema": {
                    "name": name,
                    "strict": true,
                    "schema": schema
                }
            });
        }

        body
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn id(&self) -> &str {
        "openai"
    }

    fn supports_structured_output(&self) -> bool {
        true
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_body(&request);

        let start = std::time::Instant::now();
        let mut req_builder = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");

        if let Some(org_id) = &self.organization_id {
            req_builder = req_builder.header("OpenAI-Organization", org_id);
        }

        let resp = req_builder.json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                LLMError::Timeout
            } else {
                LLMError::HttpError(e)
            }
        })?;
        let status = resp.status();
        let latency = start.elapsed().as_millis() as u64;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(LLMError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(LLMError::AuthError("Invalid API key".to_string()));
        }

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(LLMError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let json: serde_json::Value = resp.json().await?;

        let choice = json["choices"]
            .as_array()
            .and_then(|arr| arr.first())
            .ok_or_else(|| LLMError::InvalidResponse("Missing choices".to_string()))?;

        if let Some(refusal) = choice["message"]["refusal"].as_str() {
            return Err(LLMError::Refused(refusal.to_string()));
        }

        let content = choice["message"]["content"]
            .as_str()
            .ok_or_else(|| LLMError::InvalidResponse("Missing content".to_string()))?
            .to_string();

        let usage = json["usage"].as_object().map(|u| TokenUsage {
            input_tokens: u["prompt_tokens"].as_u64().unwrap_or(0) as u32,
            output_tokens: u["completion_tokens"].as_u64().unwrap_or(0) as u32,
        });

        let finish_reason = choice["finish_reason"].as_str().map(|s| s.to_string());

        Ok(ChatResponse {
            content,
            model: json["model"].as_str().unwrap_or(&self.model).to_string(),
            provider: "openai".to_string(),
            usage,
            finish_reason,
            latency_ms: latency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::llm::types::ChatMessage;

    fn provider(model: &str) -> OpenAIProvider {
        OpenAIProvider::new("sk-test".to_string(), model.to_string(), 4096, None, None)
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let provider = OpenAIProvider::new(
            "sk-test".to_string(),
            "gpt-4o".to_string(),
            4096,
            None,
            Some("http://localhost:9999/v1/".to_string()),
        );
        assert_eq!(provider.base_url(), "http://localhost:9999/v1");
    }

    #[test]
    fn test_body_includes_strict_schema() {
        let provider = provider("gpt-4o");
        let request = ChatRequest::new(vec![ChatMessage::user("Create a course about: Rust")])
            .with_system("You are Miss Nova")
            .with_temperature(0.7)
            .with_json_schema("course", serde_json::json!({"type": "object"}));

        let body = provider.build_body(&request);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert_eq!(body["response_format"]["json_schema"]["name"], "course");
        assert_eq!(body["temperature"], serde_json::json!(0.7));
    }

    #[test]
    fn test_body_without_schema_is_plain() {
        let provider = provider("gpt-4o-mini");
        let request = ChatRequest::new(vec![ChatMessage::user("hi")]).with_max_tokens(100);
        let body = provider.build_body(&request);
        assert!(body.get("response_format").is_none());
        assert!(body.get("temperature").is_none());
        assert_eq!(body["max_tokens"], 100);
        assert_eq!(body["model"], "gpt-4o-mini");
    }
}
