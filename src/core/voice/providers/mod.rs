use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

use super::types::{DialogueInput, Result};

pub mod elevenlabs;

pub use elevenlabs::ElevenLabsProvider;

/// Audio delivered chunk by chunk as the provider produces it.
pub type AudioStream = BoxStream<'static, Result<Bytes>>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoiceProvider: Send + Sync {
    /// Unique identifier for the provider (e.g., "elevenlabs")
    fn id(&self) -> &'static str;

    /// MIME type of the audio this provider returns
    fn mime_type(&self) -> &'static str;

    /// Bytes of audio per second of playback, used for duration estimates
    fn bytes_per_second(&self) -> u32;

    /// Synthesize a multi-speaker dialogue into one buffered clip
    async fn synthesize_dialogue(&self, inputs: &[DialogueInput]) -> Result<Vec<u8>>;

    /// Synthesize a multi-speaker dialogue and hand back the chunks as they arrive
    async fn stream_dialogue(&self, inputs: &[DialogueInput]) -> Result<AudioStream>;
}
