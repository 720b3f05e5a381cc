//! LLM Provider Implementations
//!
//! Concrete implementations of the `LLMProvider` trait.

mod openai;

pub use openai::{OpenAIProvider, OPENAI_BASE_URL};

use super::provider::LLMProvider;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for creating providers
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        model: String,
        max_tokens: u32,
        organization_id: Option<String>,
        base_url: Option<String>,
        timeout_secs: u64,
    },
}

impl ProviderConfig {
    /// Create a provider from this configuration
    pub fn create_provider(&self) -> Arc<dyn LLMProvider> {
        match self {
            ProviderConfig::OpenAI {
                api_key,
                model,
                max_tokens,
                organization_id,
                base_url,
                timeout_secs,
            } => Arc::new(OpenAIProvider::with_timeout(
                api_key.clone(),
                model.clone(),
                *max_tokens,
                organization_id.clone(),
                base_url.clone(),
                Duration::from_secs(*timeout_secs),
            )),
        }
    }
}
