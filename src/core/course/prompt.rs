//! Prompt Builder
//!
//! Turns a free-text topic into the instructions and schema sent to the
//! completion service. Building a prompt never touches the network, so bad
//! input is rejected before any upstream cost is incurred.

use super::error::{GenerationError, Result};
use super::schema::{CourseSchema, QUIZ_OPTION_COUNT};
use super::types::CourseFormat;

pub const DEFAULT_UNIT_COUNT: usize = 5;

/// Character budget for one complete dialogue script.
pub const SCRIPT_CHAR_BUDGET: usize = 2800;

/// Most speakers a generated script may use.
pub const MAX_SPEAKERS: u32 = 4;

/// Delivery tags the speech model understands.
pub const AUDIO_TAGS: [&str; 6] = [
    "[excited]",
    "[curious]",
    "[laughs]",
    "[sighs]",
    "[dramatically]",
    "[sarcastically]",
];

/// Everything needed for one structured generation call.
#[derive(Debug, Clone)]
pub struct PromptBundle {
    pub system: String,
    pub user: String,
    pub schema: CourseSchema,
    pub format: CourseFormat,
    pub unit_count: usize,
}

pub struct CoursePrompt;

impl CoursePrompt {
    pub fn build(topic: &str, format: CourseFormat, unit_count: usize) -> Result<PromptBundle> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(GenerationError::InvalidInput("topic must not be empty".into()));
        }
        if unit_count < 1 {
            return Err(GenerationError::InvalidInput("unit count must be at least 1".into()));
        }

        Ok(PromptBundle {
            system: system_prompt(format, unit_count),
            user: format!("Create {} about: {}", article_noun(format), topic),
            schema: CourseSchema::new(format, unit_count),
            format,
            unit_count,
        })
    }
}

fn article_noun(format: CourseFormat) -> &'static str {
    match format {
        CourseFormat::Slides => "a course",
        CourseFormat::Video => "a video course",
        CourseFormat::Audio => "an audio course",
    }
}

fn system_prompt(format: CourseFormat, n: usize) -> String {
    let quiz_rule = format!(
        "A quiz question with exactly {} distinct options, the correct answer copied \
         word for word from those options, and an explanation",
        QUIZ_OPTION_COUNT
    );

    let (kind, unit_lines, focus) = match format {
        CourseFormat::Slides => (
            "courses",
            format!(
                "{n} slides numbered 1 to {n}, each with:\n\
                 \x20  - A clear title\n\
                 \x20  - Detailed markdown content with examples and explanations\n\
                 \x20  - {quiz_rule}"
            ),
            String::new(),
        ),
        CourseFormat::Video => (
            "video courses",
            format!(
                "{n} video sections numbered 1 to {n}, each with:\n\
                 \x20  - A clear title that works well on screen\n\
                 \x20  - Detailed content that can be presented visually\n\
                 \x20  - Key points that can be highlighted with graphics\n\
                 \x20  - {quiz_rule}"
            ),
            "Favour visual storytelling, step-by-step explanations and clear transitions.\n"
                .to_string(),
        ),
        CourseFormat::Audio => (
            "audio courses",
            format!(
                "{n} audio sections numbered 1 to {n}, each with:\n\
                 \x20  - A clear title that works well when spoken\n\
                 \x20  - Detailed conversational content\n\
                 \x20  - Key points that can be emphasised verbally\n\
                 \x20  - A dialogue script for the section\n\
                 \x20  - {quiz_rule}"
            ),
            script_rules(MAX_SPEAKERS),
        ),
    };

    format!(
        "You are Miss Nova, an expert AI teacher who creates engaging {kind} on any topic.\n\n\
         Create a structured course based on the user's topic. The course must include:\n\
         1. A descriptive title and overview\n\
         2. {unit_lines}\n\n\
         {focus}\
         Make sure the content is educational, engaging, and appropriate for the topic."
    )
}

fn script_rules(speakers: u32) -> String {
    format!(
        "Script rules:\n\
         - Keep each ENTIRE script under {budget} characters, including labels and tags\n\
         - Label every line \"Speaker <n>:\" using numbers 1 to {speakers}, never names\n\
         - Give each speaker 2-3 lines; one utterance per line\n\
         - Emotional and delivery tags allowed (use sparingly): {tags}\n",
        budget = SCRIPT_CHAR_BUDGET,
        tags = AUDIO_TAGS.join(", "),
    )
}

/// Prompt pair for a stand-alone podcast-style script.
pub struct ScriptPrompt;

impl ScriptPrompt {
    /// `speaker_count` above [`MAX_SPEAKERS`] is silently capped.
    pub fn build(topic: &str, speaker_count: u32) -> Result<(String, String)> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(GenerationError::InvalidInput("topic must not be empty".into()));
        }
        if speaker_count == 0 {
            return Err(GenerationError::InvalidInput("speaker count must be at least 1".into()));
        }
        let speakers = speaker_count.min(MAX_SPEAKERS);

        let system = "You are a podcast script writer specialising in expressive text-to-speech. \
                      Write natural conversations that use audio tags for emotion and keep \
                      speakers clearly distinct."
            .to_string();

        let user = format!(
            "Create a SHORT podcast script about \"{topic}\" with {speakers} speakers.\n\n\
             {rules}\n\
             Structure: a brief introduction, one or two exchanges of discussion, and a quick wrap-up.\n\n\
             Example:\n\
             Speaker 1: [excited] Welcome to today's episode about {topic}!\n\
             Speaker 2: [curious] I found some surprising insights...",
            rules = script_rules(speakers),
        );

        Ok((system, user))
    }
}
