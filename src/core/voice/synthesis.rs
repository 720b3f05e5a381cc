//! Audio Synthesis
//!
//! Two delivery paths share the same script handling:
//! - course sections are synthesized concurrently, fully buffered and embedded
//!   as `data:` URIs, with each section failing independently;
//! - a single raw script is streamed straight through to the caller.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::join_all;

use super::providers::{AudioStream, VoiceProvider};
use super::script::{parse_script, truncate_script, DEFAULT_SCRIPT_LIMIT};
use super::types::{DialogueInput, Result, VoiceError, VoicePool};
use crate::core::course::types::SectionCourse;

/// Truncate then parse a script into dialogue inputs.
pub fn dialogue_for(script: &str, voices: &VoicePool, max_chars: usize) -> Vec<DialogueInput> {
    let truncated = truncate_script(script, max_chars);
    if truncated.len() < script.len() {
        log::info!(
            "Script truncated from {} to {} characters",
            script.chars().count(),
            truncated.chars().count()
        );
    }
    parse_script(&truncated, voices)
}

/// Embeddable audio for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionAudio {
    pub data_uri: String,
    pub duration_secs: u32,
}

/// Outcome counts of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AudioReport {
    pub synthesized: usize,
    pub failed: usize,
}

pub struct AudioSynthesizer {
    provider: Arc<dyn VoiceProvider>,
    voices: VoicePool,
    script_limit: usize,
}

impl AudioSynthesizer {
    pub fn new(provider: Arc<dyn VoiceProvider>, voices: VoicePool) -> Self {
        Self {
            provider,
            voices,
            script_limit: DEFAULT_SCRIPT_LIMIT,
        }
    }

    pub fn with_script_limit(mut self, limit: usize) -> Self {
        self.script_limit = limit;
        self
    }

    pub fn voices(&self) -> &VoicePool {
        &self.voices
    }

    pub fn script_limit(&self) -> usize {
        self.script_limit
    }

    pub fn mime_type(&self) -> &'static str {
        self.provider.mime_type()
    }

    /// Synthesize every section's script concurrently and store the result on
    /// the section. A section whose script has no dialogue or whose synthesis
    /// fails gets `audioUrl: null`; the others are unaffected.
    pub async fn attach_audio(&self, course: &mut SectionCourse) -> AudioReport {
        let jobs = course
            .sections
            .iter()
            .map(|section| self.section_audio(section.section_number, section.script.as_deref()));
        let results = join_all(jobs).await;

        let mut report = AudioReport::default();
        for (section, audio) in course.sections.iter_mut().zip(results) {
            match audio {
                Some(audio) => {
                    report.synthesized += 1;
                    section.duration = Some(audio.duration_secs);
                    section.audio_url = Some(Some(audio.data_uri));
                }
                None => {
                    report.failed += 1;
                    section.audio_url = Some(None);
                }
            }
        }

        log::info!(
            "Audio synthesis finished: {} sections synthesized, {} without audio",
            report.synthesized,
            report.failed
        );
        report
    }

    async fn section_audio(&self, section_number: u32, script: Option<&str>) -> Option<SectionAudio> {
        let Some(script) = script else {
            log::warn!("Section {} has no script, skipping audio", section_number);
            return None;
        };

        match self.synthesize_script(script).await {
            Ok(bytes) => Some(SectionAudio {
                data_uri: self.data_uri(&bytes),
                duration_secs: estimate_duration_secs(bytes.len(), self.provider.bytes_per_second()),
            }),
            Err(e) => {
                log::warn!("Audio synthesis failed for section {}: {}", section_number, e);
                None
            }
        }
    }

    /// Buffered synthesis of one script.
    pub async fn synthesize_script(&self, script: &str) -> Result<Vec<u8>> {
        let inputs = dialogue_for(script, &self.voices, self.script_limit);
        if inputs.is_empty() {
            return Err(VoiceError::NoDialogue);
        }
        self.provider.synthesize_dialogue(&inputs).await
    }

    /// Streamed synthesis of already-parsed dialogue.
    pub async fn stream_dialogue(&self, inputs: &[DialogueInput]) -> Result<AudioStream> {
        if inputs.is_empty() {
            return Err(VoiceError::NoDialogue);
        }
        log::debug!("Streaming {} dialogue lines via {}", inputs.len(), self.provider.id());
        self.provider.stream_dialogue(inputs).await
    }

    fn data_uri(&self, bytes: &[u8]) -> String {
        format!("data:{};base64,{}", self.provider.mime_type(), STANDARD.encode(bytes))
    }
}

/// Playback length rounded up to whole seconds.
pub fn estimate_duration_secs(byte_len: usize, bytes_per_second: u32) -> u32 {
    if byte_len == 0 || bytes_per_second == 0 {
        return 0;
    }
    let bps = bytes_per_second as usize;
    byte_len.div_ceil(bps) as u32
}
