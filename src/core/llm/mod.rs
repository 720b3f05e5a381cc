//! LLM Client Module
//!
//! Completion provider abstraction used by course and script generation.
//!
//! # Module Structure
//!
//! - `types`: chat messages, requests, responses
//! - `error`: `LLMError`
//! - `provider`: the `LLMProvider` trait
//! - `providers`: concrete provider implementations

pub mod error;
pub mod provider;
pub mod providers;
pub mod types;

pub use error::{LLMError, Result};
pub use provider::LLMProvider;
pub use providers::{OpenAIProvider, ProviderConfig, OPENAI_BASE_URL};
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, MessageRole, ResponseFormat, TokenUsage,
};

#[cfg(test)]
pub use provider::MockLLMProvider;
