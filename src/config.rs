use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::course::{GenerationConfig, DEFAULT_UNIT_COUNT};
use crate::core::llm::ProviderConfig;
use crate::core::progress::PointsPolicy;
use crate::core::voice::{ElevenLabsConfig, OutputFormat, VoicePool, DEFAULT_SCRIPT_LIMIT};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "MISSNOVA_CONFIG";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const ELEVENLABS_API_KEY_ENV: &str = "ELEVENLABS_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub voice: VoiceConfig,
    pub data: DataConfig,
    pub points: PointsPolicy,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
        }
    }
}

/// Completion service settings. The API key is read from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Any OpenAI-compatible endpoint
    pub base_url: Option<String>,
    pub model: String,
    pub organization_id: Option<String>,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Per-attempt deadline
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Slides or sections per generated course
    pub unit_count: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: "gpt-4o".to_string(),
            organization_id: None,
            temperature: 0.7,
            max_tokens: 4096,
            timeout_secs: 120,
            max_retries: 2,
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
            unit_count: DEFAULT_UNIT_COUNT,
        }
    }
}

impl LlmConfig {
    pub fn provider_config(&self, api_key: String) -> ProviderConfig {
        ProviderConfig::OpenAI {
            api_key,
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            organization_id: self.organization_id.clone(),
            base_url: self.base_url.clone(),
            // The client timeout only backstops the per-attempt deadline.
            timeout_secs: self.timeout_secs.saturating_add(5),
        }
    }

    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            attempt_timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.max_retries,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }
}

/// Speech synthesis settings. The API key is read from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub base_url: Option<String>,
    pub model_id: Option<String>,
    pub output_format: OutputFormat,
    /// Voices for `Speaker 1..=n`, wrapping around
    pub voices: VoicePool,
    pub timeout_secs: u64,
    /// Scripts are cut to this many characters before synthesis
    pub script_limit: usize,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model_id: None,
            output_format: OutputFormat::default(),
            voices: VoicePool::default(),
            timeout_secs: 120,
            script_limit: DEFAULT_SCRIPT_LIMIT,
        }
    }
}

impl VoiceConfig {
    pub fn elevenlabs_config(&self, api_key: String) -> ElevenLabsConfig {
        ElevenLabsConfig {
            api_key,
            base_url: self.base_url.clone(),
            model_id: self.model_id.clone(),
            output_format: self.output_format,
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from `$MISSNOVA_CONFIG` or `~/.config/missnova/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match Self::load_from(&config_path) {
            Ok(config) => {
                log::info!("Loaded config from {}", config_path.display());
                config
            }
            Err(ConfigError::Io { .. }) => {
                log::debug!("No config file at {}, using defaults", config_path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("missnova"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .map(|d| d.join("missnova").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

/// Secrets, taken only from the environment.
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub elevenlabs_api_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            openai_api_key: non_empty_var(OPENAI_API_KEY_ENV),
            elevenlabs_api_key: non_empty_var(ELEVENLABS_API_KEY_ENV),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("elevenlabs_api_key", &self.elevenlabs_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
