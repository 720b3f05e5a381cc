//! LLM Provider Trait
//!
//! Defines the trait that all completion providers must implement.

use async_trait::async_trait;

use super::error::Result;
use super::types::{ChatRequest, ChatResponse};

/// Trait that all LLM providers must implement
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Get the provider's unique identifier
    fn id(&self) -> &str;

    /// Send a chat completion request
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Whether `ResponseFormat::JsonSchema` is honoured by the upstream API
    fn supports_structured_output(&self) -> bool {
        false
    }
}
