//! Generation Client
//!
//! One structured completion call per attempt, guarded by a per-attempt
//! deadline. Transient failures (`UpstreamUnavailable`, `RateLimited`) are
//! retried with bounded exponential backoff; everything else surfaces
//! immediately.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

use super::error::{GenerationError, Result, SchemaViolation};
use super::prompt::PromptBundle;
use super::types::GeneratedCourse;
use crate::core::llm::{ChatMessage, ChatRequest, ChatResponse, LLMProvider};

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_tokens: u32,
    /// Deadline for a single upstream attempt
    pub attempt_timeout: Duration,
    /// Additional attempts after the first one
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4096,
            attempt_timeout: Duration::from_secs(120),
            max_retries: 2,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
        }
    }
}

impl GenerationConfig {
    fn backoff_for(&self, attempt: u32, err: &GenerationError) -> Duration {
        let exponential = self
            .initial_backoff
            .saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)));
        let wanted = match err {
            GenerationError::RateLimited { retry_after_secs } => {
                exponential.max(Duration::from_secs(*retry_after_secs))
            }
            _ => exponential,
        };
        wanted.min(self.max_backoff)
    }
}

pub struct GenerationClient {
    provider: Arc<dyn LLMProvider>,
    config: GenerationConfig,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn LLMProvider>, config: GenerationConfig) -> Self {
        Self { provider, config }
    }

    /// Generate a course and check it against the bundle's schema.
    ///
    /// Never returns a partially populated course: either every unit passed
    /// validation or a typed error is returned.
    pub async fn generate_course(&self, bundle: &PromptBundle) -> Result<GeneratedCourse> {
        if !self.provider.supports_structured_output() {
            return Err(GenerationError::Configuration(format!(
                "provider '{}' does not support structured output",
                self.provider.id()
            )));
        }

        let request = ChatRequest::new(vec![ChatMessage::user(bundle.user.clone())])
            .with_system(bundle.system.clone())
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens)
            .with_json_schema(bundle.schema.name(), bundle.schema.json_schema());

        let started = Instant::now();
        let response = self.with_retry(|| self.attempt(request.clone())).await?;

        let value: Value = serde_json::from_str(strip_code_fence(&response.content))
            .map_err(|e| SchemaViolation::root(format!("output is not valid JSON: {}", e)))?;
        let course = bundle.schema.validate(&value)?;

        log::info!(
            "Generated {} course '{}' with {} units in {}ms ({} model {})",
            bundle.format,
            course.title(),
            course.unit_count(),
            started.elapsed().as_millis(),
            response.provider,
            response.model
        );
        if let Some(usage) = &response.usage {
            log::debug!("Token usage: {} in / {} out", usage.input_tokens, usage.output_tokens);
        }

        Ok(course)
    }

    /// Free-text completion, used for stand-alone dialogue scripts.
    pub async fn generate_text(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest::new(vec![ChatMessage::user(user)])
            .with_system(system)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens);

        let response = self.with_retry(|| self.attempt(request.clone())).await?;
        let text = response.content.trim();
        if text.is_empty() {
            return Err(SchemaViolation::root("completion was empty").into());
        }
        Ok(text.to_string())
    }

    async fn attempt(&self, request: ChatRequest) -> Result<ChatResponse> {
        match tokio::time::timeout(self.config.attempt_timeout, self.provider.chat(request)).await {
            Ok(result) => result.map_err(GenerationError::from),
            Err(_) => Err(GenerationError::UpstreamTimeout),
        }
    }

    async fn with_retry<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.backoff_for(attempt, &e);
                    log::warn!(
                        "Generation attempt {}/{} failed, retrying in {}ms: {}",
                        attempt,
                        self.config.max_retries + 1,
                        delay.as_millis(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Some models wrap JSON in a markdown fence even in structured mode.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
