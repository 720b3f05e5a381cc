//! Course Generation Errors

use crate::core::llm::LLMError;
use thiserror::Error;

/// Generated output that does not match the expected course shape.
///
/// `path` names the first failing field, e.g. `slides[2].quiz.options[1]`,
/// or `$` for the document root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema violation at {path}: {reason}")]
pub struct SchemaViolation {
    pub path: String,
    pub reason: String,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn root(reason: impl Into<String>) -> Self {
        Self::new("$", reason)
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream timed out")]
    UpstreamTimeout,

    #[error(transparent)]
    SchemaViolation(#[from] SchemaViolation),

    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Upstream rejected request: {status} - {message}")]
    UpstreamRejected { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl GenerationError {
    /// Transient failures worth another attempt. Schema violations never are.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable(_) | Self::RateLimited { .. }
        )
    }
}

impl From<LLMError> for GenerationError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::HttpError(e) if e.is_timeout() => Self::UpstreamTimeout,
            LLMError::HttpError(e) => Self::UpstreamUnavailable(e.to_string()),
            LLMError::ApiError { status, message } if status >= 500 => {
                Self::UpstreamUnavailable(format!("{} - {}", status, message))
            }
            LLMError::ApiError { status, message } => Self::UpstreamRejected { status, message },
            LLMError::AuthError(msg) => Self::Configuration(msg),
            LLMError::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            LLMError::Timeout => Self::UpstreamTimeout,
            LLMError::InvalidResponse(msg) => SchemaViolation::root(msg).into(),
            LLMError::Refused(msg) => SchemaViolation::root(format!("model refused: {}", msg)).into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
