use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Synthesis timed out")]
    Timeout,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Quota exceeded")]
    QuotaExceeded,

    #[error("No valid speaker lines found in script")]
    NoDialogue,
}

pub type Result<T> = std::result::Result<T, VoiceError>;

// ============================================================================
// Voice Configuration
// ============================================================================

pub const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io/v1";

/// Voices used for `Speaker 1..=4` (Mark, Adam Stone, Hope, Cassidy).
pub const DEFAULT_VOICE_IDS: [&str; 4] = [
    "UgBBYS2sOqTuMpoF3BR0",
    "NFG5qt843uXKj4pFvR7C",
    "cgSgspJ2msm6clMCkdW9",
    "56AoDkrOh6qfVPDXZ7Pt",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevenLabsConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model_id: Option<String>,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 { 120 }

impl ElevenLabsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            model_id: None,
            output_format: OutputFormat::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Ordered pool of voice ids. Speaker numbers wrap around the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct VoicePool(Vec<String>);

impl TryFrom<Vec<String>> for VoicePool {
    type Error = String;

    fn try_from(voices: Vec<String>) -> std::result::Result<Self, Self::Error> {
        Self::new(voices).ok_or_else(|| "voice pool must not be empty".to_string())
    }
}

impl From<VoicePool> for Vec<String> {
    fn from(pool: VoicePool) -> Self {
        pool.0
    }
}

impl VoicePool {
    /// Returns `None` for an empty pool.
    pub fn new(voices: Vec<String>) -> Option<Self> {
        if voices.is_empty() {
            None
        } else {
            Some(Self(voices))
        }
    }

    /// Voice for a zero-based speaker index.
    pub fn voice_for(&self, speaker_index: usize) -> &str {
        &self.0[speaker_index % self.0.len()]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for VoicePool {
    fn default() -> Self {
        Self(DEFAULT_VOICE_IDS.iter().map(|v| v.to_string()).collect())
    }
}

// ============================================================================
// Dialogue
// ============================================================================

/// One utterance of a multi-speaker dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueInput {
    pub text: String,
    pub voice_id: String,
}

impl DialogueInput {
    pub fn new(text: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: voice_id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "mp3_44100_128")]
    Mp3_44100_128,
    #[serde(rename = "mp3_22050_32")]
    Mp3_22050_32,
    #[serde(rename = "pcm_16000")]
    Pcm16000,
}

impl OutputFormat {
    /// Value of ElevenLabs' `output_format` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Mp3_44100_128 => "mp3_44100_128",
            Self::Mp3_22050_32 => "mp3_22050_32",
            Self::Pcm16000 => "pcm_16000",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3_44100_128 | Self::Mp3_22050_32 => "audio/mpeg",
            Self::Pcm16000 => "audio/pcm",
        }
    }

    /// Bytes of audio per second of playback
    pub fn bytes_per_second(&self) -> u32 {
        match self {
            Self::Mp3_44100_128 => 128_000 / 8,
            Self::Mp3_22050_32 => 32_000 / 8,
            Self::Pcm16000 => 16_000 * 2,
        }
    }
}
