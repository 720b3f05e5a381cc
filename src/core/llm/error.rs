//! LLM Error Types
//!
//! Defines error types for completion provider operations.

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model refused the request: {0}")]
    Refused(String),

    #[error("Request timeout")]
    Timeout,
}

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;
