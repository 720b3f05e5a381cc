//! Shared handler state

use std::sync::Arc;

use crate::config::{AppConfig, Credentials};
use crate::core::course::{CoursePipeline, GenerationClient};
use crate::core::voice::{AudioSynthesizer, ElevenLabsProvider, VoicePool, DEFAULT_SCRIPT_LIMIT};
use crate::database::Database;

/// Everything a handler needs. Services whose key is missing are `None`
/// and only the routes that need them fail.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub pipeline: Option<Arc<CoursePipeline>>,
    pub synthesizer: Option<Arc<AudioSynthesizer>>,
    pub voices: VoicePool,
    pub script_limit: usize,
    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            pipeline: None,
            synthesizer: None,
            voices: VoicePool::default(),
            script_limit: DEFAULT_SCRIPT_LIMIT,
            cors_origins: Vec::new(),
        }
    }

    pub fn with_pipeline(mut self, pipeline: Arc<CoursePipeline>) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    /// Also takes over the synthesizer's voices and script limit.
    pub fn with_synthesizer(mut self, synthesizer: Arc<AudioSynthesizer>) -> Self {
        self.voices = synthesizer.voices().clone();
        self.script_limit = synthesizer.script_limit();
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Wire providers from configuration and whichever keys are present.
    pub fn from_config(db: Database, config: &AppConfig, credentials: &Credentials) -> Self {
        let synthesizer = match &credentials.elevenlabs_api_key {
            Some(key) => {
                let provider = ElevenLabsProvider::new(config.voice.elevenlabs_config(key.clone()));
                Some(Arc::new(
                    AudioSynthesizer::new(Arc::new(provider), config.voice.voices.clone())
                        .with_script_limit(config.voice.script_limit),
                ))
            }
            None => {
                log::warn!("ELEVENLABS_API_KEY not set; audio courses will be text-only");
                None
            }
        };

        let pipeline = match &credentials.openai_api_key {
            Some(key) => {
                let provider = config.llm.provider_config(key.clone()).create_provider();
                let client = GenerationClient::new(provider, config.llm.generation_config());
                Some(Arc::new(
                    CoursePipeline::new(Arc::new(client))
                        .with_synthesizer(synthesizer.clone())
                        .with_unit_count(config.llm.unit_count),
                ))
            }
            None => {
                log::warn!("OPENAI_API_KEY not set; generation routes are disabled");
                None
            }
        };

        Self {
            db,
            pipeline,
            synthesizer,
            voices: config.voice.voices.clone(),
            script_limit: config.voice.script_limit,
            cors_origins: config.server.cors_origins.clone(),
        }
    }
}
