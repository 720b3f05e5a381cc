//! Voice Module
//!
//! Dialogue script parsing and speech synthesis for audio courses.

pub mod providers;
pub mod script;
pub mod synthesis;
pub mod types;

pub use providers::{AudioStream, ElevenLabsProvider, VoiceProvider};
pub use script::{parse_script, truncate_script, DEFAULT_SCRIPT_LIMIT};
pub use synthesis::{dialogue_for, estimate_duration_secs, AudioReport, AudioSynthesizer, SectionAudio};
pub use types::*;

#[cfg(test)]
pub use providers::MockVoiceProvider;
