//! Course Pipeline
//!
//! topic + format -> prompt -> structured generation -> (audio) -> course

use std::sync::Arc;

use super::error::Result;
use super::generation::GenerationClient;
use super::prompt::{CoursePrompt, ScriptPrompt, DEFAULT_UNIT_COUNT};
use super::types::{CourseFormat, GeneratedCourse};
use crate::core::voice::AudioSynthesizer;

pub struct CoursePipeline {
    client: Arc<GenerationClient>,
    synthesizer: Option<Arc<AudioSynthesizer>>,
    unit_count: usize,
}

impl CoursePipeline {
    pub fn new(client: Arc<GenerationClient>) -> Self {
        Self {
            client,
            synthesizer: None,
            unit_count: DEFAULT_UNIT_COUNT,
        }
    }

    /// Without a synthesizer audio courses are returned text-only.
    pub fn with_synthesizer(mut self, synthesizer: Option<Arc<AudioSynthesizer>>) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn with_unit_count(mut self, unit_count: usize) -> Self {
        self.unit_count = unit_count;
        self
    }

    pub fn has_audio(&self) -> bool {
        self.synthesizer.is_some()
    }

    pub async fn generate(&self, topic: &str, format: CourseFormat) -> Result<GeneratedCourse> {
        let bundle = CoursePrompt::build(topic, format, self.unit_count)?;
        let mut course = self.client.generate_course(&bundle).await?;

        if let (GeneratedCourse::Audio(audio), Some(synth)) = (&mut course, &self.synthesizer) {
            synth.attach_audio(audio).await;
        }

        Ok(course)
    }

    /// Stand-alone dialogue script; `speaker_count` is capped at four.
    pub async fn generate_script(&self, topic: &str, speaker_count: u32) -> Result<String> {
        let (system, user) = ScriptPrompt::build(topic, speaker_count)?;
        self.client.generate_text(&system, &user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::course::error::GenerationError;
    use crate::core::course::generation::GenerationConfig;
    use crate::core::llm::{ChatResponse, MockLLMProvider};
    use crate::core::voice::{MockVoiceProvider, VoicePool};
    use serde_json::json;

    fn audio_json() -> String {
        let sections: Vec<_> = (1..=2)
            .map(|i| {
                json!({
                    "section_number": i,
                    "title": format!("Part {}", i),
                    "content": "Body",
                    "key_points": ["k"],
                    "script": "Speaker 1: Hello\nSpeaker 2: Hi",
                    "quiz": {
                        "question": "Q",
                        "options": ["a", "b", "c", "d"],
                        "correct_answer": "d",
                        "explanation": "E"
                    }
                })
            })
            .collect();
        json!({"title": "T", "description": "D", "total_sections": 2, "sections": sections}).to_string()
    }

    fn llm_returning(content: String) -> Arc<GenerationClient> {
        let mut mock = MockLLMProvider::new();
        mock.expect_id().return_const("openai".to_string());
        mock.expect_supports_structured_output().return_const(true);
        mock.expect_chat().returning(move |_| {
            Ok(ChatResponse {
                content: content.clone(),
                model: "gpt-4o".into(),
                provider: "openai".into(),
                usage: None,
                finish_reason: None,
                latency_ms: 0,
            })
        });
        Arc::new(GenerationClient::new(Arc::new(mock), GenerationConfig::default()))
    }

    #[tokio::test]
    async fn test_audio_course_gets_audio_when_synthesizer_present() {
        let mut voice = MockVoiceProvider::new();
        voice.expect_mime_type().return_const("audio/mpeg");
        voice.expect_bytes_per_second().return_const(16_000_u32);
        voice.expect_synthesize_dialogue().times(2).returning(|_| Ok(vec![0u8; 10]));
        let synth = Arc::new(AudioSynthesizer::new(Arc::new(voice), VoicePool::default()));

        let pipeline = CoursePipeline::new(llm_returning(audio_json()))
            .with_unit_count(2)
            .with_synthesizer(Some(synth));
        let course = pipeline.generate("Space", CourseFormat::Audio).await.unwrap();

        let GeneratedCourse::Audio(c) = course else { panic!("expected audio course") };
        assert!(c.sections.iter().all(|s| matches!(s.audio_url, Some(Some(_)))));
    }

    #[tokio::test]
    async fn test_audio_course_is_text_only_without_synthesizer() {
        let pipeline = CoursePipeline::new(llm_returning(audio_json())).with_unit_count(2);
        assert!(!pipeline.has_audio());
        let course = pipeline.generate("Space", CourseFormat::Audio).await.unwrap();
        let value = serde_json::to_value(&course).unwrap();
        assert!(value["sections"][0].get("audioUrl").is_none());
        assert!(value["sections"][0]["script"].is_string());
    }

    #[tokio::test]
    async fn test_empty_topic_makes_no_call() {
        let mut mock = MockLLMProvider::new();
        mock.expect_chat().never();
        let client = Arc::new(GenerationClient::new(Arc::new(mock), GenerationConfig::default()));
        let err = CoursePipeline::new(client)
            .generate("  ", CourseFormat::Slides)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidInput(_)));
    }
}
