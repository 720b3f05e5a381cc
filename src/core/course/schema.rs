//! Course Schema
//!
//! Declares the JSON shape a generated course must have for each format and
//! checks raw provider output against it. Validation is fail-fast: the first
//! failing field is reported and nothing past it is inspected.

use serde_json::{json, Map, Value};
use std::collections::HashSet;

use super::error::SchemaViolation;
use super::types::{
    CourseFormat, GeneratedCourse, Quiz, Section, SectionCourse, Slide, SlideCourse,
};

/// Every quiz carries exactly this many options.
pub const QUIZ_OPTION_COUNT: usize = 4;

type Checked<T> = std::result::Result<T, SchemaViolation>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseSchema {
    format: CourseFormat,
    unit_count: Option<usize>,
}

impl CourseSchema {
    /// Schema requiring exactly `unit_count` units.
    pub fn new(format: CourseFormat, unit_count: usize) -> Self {
        Self {
            format,
            unit_count: Some(unit_count),
        }
    }

    /// Schema accepting any non-zero number of units (saved and demo courses).
    pub fn lenient(format: CourseFormat) -> Self {
        Self {
            format,
            unit_count: None,
        }
    }

    pub fn format(&self) -> CourseFormat {
        self.format
    }

    pub fn unit_count(&self) -> Option<usize> {
        self.unit_count
    }

    /// Name sent alongside the schema in structured-output requests
    pub fn name(&self) -> &'static str {
        match self.format {
            CourseFormat::Slides => "course",
            CourseFormat::Video => "video_course",
            CourseFormat::Audio => "audio_course",
        }
    }

    // ========================================================================
    // JSON Schema
    // ========================================================================

    /// Strict-mode JSON schema for the completion service. Strict mode needs
    /// every property listed as required and `additionalProperties: false`.
    pub fn json_schema(&self) -> Value {
        let quiz = json!({
            "type": "object",
            "properties": {
                "question": { "type": "string", "description": "The quiz question" },
                "options": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Exactly four distinct answer options"
                },
                "correct_answer": {
                    "type": "string",
                    "description": "The correct answer, copied exactly from options"
                },
                "explanation": {
                    "type": "string",
                    "description": "Why this is the correct answer"
                }
            },
            "required": ["question", "options", "correct_answer", "explanation"],
            "additionalProperties": false
        });

        let ordinal_key = self.format.ordinal_key();
        let mut unit_props = Map::new();
        unit_props.insert(
            ordinal_key.to_string(),
            json!({ "type": "integer", "description": "1-based position of this unit" }),
        );
        unit_props.insert("title".into(), json!({ "type": "string" }));
        unit_props.insert(
            "content".into(),
            json!({ "type": "string", "description": "Detailed content with examples and explanations" }),
        );
        let mut unit_required = vec![ordinal_key, "title", "content"];

        if self.format.uses_sections() {
            unit_props.insert(
                "key_points".into(),
                json!({ "type": "array", "items": { "type": "string" } }),
            );
            unit_required.push("key_points");
        }
        if self.format == CourseFormat::Audio {
            unit_props.insert(
                "script".into(),
                json!({
                    "type": "string",
                    "description": "Dialogue script, one `Speaker <n>: <line>` per line"
                }),
            );
            unit_required.push("script");
        }
        unit_props.insert("quiz".into(), quiz);
        unit_required.push("quiz");

        let count_hint = match self.unit_count {
            Some(n) => format!("Total number of units (must be {})", n),
            None => "Total number of units".to_string(),
        };

        json!({
            "type": "object",
            "properties": {
                "title": { "type": "string" },
                "description": { "type": "string" },
                (self.format.total_key()): { "type": "integer", "description": count_hint },
                (self.format.units_key()): {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": unit_props,
                        "required": unit_required,
                        "additionalProperties": false
                    }
                }
            },
            "required": ["title", "description", self.format.total_key(), self.format.units_key()],
            "additionalProperties": false
        })
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check `value` against this schema and build the typed course.
    ///
    /// The declared `total_*` must match the actual unit count; the returned
    /// course carries the checked count.
    pub fn validate(&self, value: &Value) -> Checked<GeneratedCourse> {
        let root = value
            .as_object()
            .ok_or_else(|| SchemaViolation::root("expected an object"))?;

        let title = required_text(root, "title", "title")?;
        let description = required_text(root, "description", "description")?;

        let units_key = self.format.units_key();
        let units = root
            .get(units_key)
            .and_then(Value::as_array)
            .ok_or_else(|| SchemaViolation::new(units_key, "expected an array"))?;

        if units.is_empty() {
            return Err(SchemaViolation::new(units_key, "at least one unit is required"));
        }
        if let Some(expected) = self.unit_count {
            if units.len() != expected {
                return Err(SchemaViolation::new(
                    units_key,
                    format!("expected {} units, found {}", expected, units.len()),
                ));
            }
        }

        let total_key = self.format.total_key();
        let declared = root
            .get(total_key)
            .and_then(Value::as_u64)
            .ok_or_else(|| SchemaViolation::new(total_key, "expected a non-negative integer"))?;
        if declared as usize != units.len() {
            return Err(SchemaViolation::new(
                total_key,
                format!("declares {} units but {} were provided", declared, units.len()),
            ));
        }
        let total = units.len() as u32;

        match self.format {
            CourseFormat::Slides => {
                let slides = units
                    .iter()
                    .enumerate()
                    .map(|(i, unit)| self.slide(unit, &format!("{}[{}]", units_key, i)))
                    .collect::<Checked<Vec<_>>>()?;
                Ok(GeneratedCourse::Slides(SlideCourse {
                    title,
                    description,
                    total_slides: total,
                    slides,
                }))
            }
            CourseFormat::Video | CourseFormat::Audio => {
                let sections = units
                    .iter()
                    .enumerate()
                    .map(|(i, unit)| self.section(unit, &format!("{}[{}]", units_key, i)))
                    .collect::<Checked<Vec<_>>>()?;
                let course = SectionCourse {
                    title,
                    description,
                    total_sections: total,
                    sections,
                };
                Ok(if self.format == CourseFormat::Audio {
                    GeneratedCourse::Audio(course)
                } else {
                    GeneratedCourse::Video(course)
                })
            }
        }
    }

    fn slide(&self, unit: &Value, path: &str) -> Checked<Slide> {
        let obj = object_at(unit, path)?;
        Ok(Slide {
            slide_number: ordinal(obj, "slide_number", path)?,
            title: required_text(obj, "title", &join(path, "title"))?,
            content: string_at(obj, "content", &join(path, "content"))?,
            quiz: quiz(obj.get("quiz"), &join(path, "quiz"))?,
        })
    }

    fn section(&self, unit: &Value, path: &str) -> Checked<Section> {
        let obj = object_at(unit, path)?;
        let section_number = ordinal(obj, "section_number", path)?;
        let title = required_text(obj, "title", &join(path, "title"))?;
        let content = string_at(obj, "content", &join(path, "content"))?;

        let kp_path = join(path, "key_points");
        let key_points = obj
            .get("key_points")
            .and_then(Value::as_array)
            .ok_or_else(|| SchemaViolation::new(&kp_path, "expected an array"))?
            .iter()
            .enumerate()
            .map(|(i, kp)| {
                kp.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| SchemaViolation::new(format!("{}[{}]", kp_path, i), "expected a string"))
            })
            .collect::<Checked<Vec<_>>>()?;

        let (script, audio_url, duration) = if self.format == CourseFormat::Audio {
            let script = required_text(obj, "script", &join(path, "script"))?;
            // Previously synthesized audio survives a save round trip.
            let audio_url = match obj.get("audioUrl") {
                None => None,
                Some(Value::Null) => Some(None),
                Some(Value::String(url)) => Some(Some(url.clone())),
                Some(_) => return Err(SchemaViolation::new(join(path, "audioUrl"), "expected a string or null")),
            };
            (Some(script), audio_url, duration(obj, path)?)
        } else {
            (None, None, None)
        };

        Ok(Section {
            section_number,
            title,
            content,
            key_points,
            script,
            audio_url,
            duration,
            quiz: quiz(obj.get("quiz"), &join(path, "quiz"))?,
        })
    }
}

fn join(path: &str, field: &str) -> String {
    format!("{}.{}", path, field)
}

fn object_at<'a>(value: &'a Value, path: &str) -> Checked<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| SchemaViolation::new(path, "expected an object"))
}

fn string_at(obj: &Map<String, Value>, key: &str, path: &str) -> Checked<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SchemaViolation::new(path, "expected a string"))
}

fn required_text(obj: &Map<String, Value>, key: &str, path: &str) -> Checked<String> {
    let text = string_at(obj, key, path)?;
    if text.trim().is_empty() {
        return Err(SchemaViolation::new(path, "must not be empty"));
    }
    Ok(text)
}

fn ordinal(obj: &Map<String, Value>, key: &str, unit_path: &str) -> Checked<u32> {
    obj.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| SchemaViolation::new(join(unit_path, key), "expected a non-negative integer"))
}

/// Seconds of audio; bounded by the `INTEGER` column it is stored in.
fn duration(obj: &Map<String, Value>, unit_path: &str) -> Checked<Option<u32>> {
    let path = join(unit_path, "duration");
    match obj.get("duration") {
        None | Some(Value::Null) => Ok(None),
        Some(v) => {
            let secs = v
                .as_u64()
                .ok_or_else(|| SchemaViolation::new(&path, "expected a non-negative integer"))?;
            i32::try_from(secs)
                .map(|d| Some(d as u32))
                .map_err(|_| SchemaViolation::new(&path, "out of range"))
        }
    }
}

fn quiz(value: Option<&Value>, path: &str) -> Checked<Quiz> {
    let obj = value
        .and_then(Value::as_object)
        .ok_or_else(|| SchemaViolation::new(path, "every unit needs a quiz object"))?;

    let question = required_text(obj, "question", &join(path, "question"))?;

    let opt_path = join(path, "options");
    let raw = obj
        .get("options")
        .and_then(Value::as_array)
        .ok_or_else(|| SchemaViolation::new(&opt_path, "expected an array"))?;
    if raw.len() != QUIZ_OPTION_COUNT {
        return Err(SchemaViolation::new(
            &opt_path,
            format!("expected exactly {} options, found {}", QUIZ_OPTION_COUNT, raw.len()),
        ));
    }

    let mut seen = HashSet::new();
    let mut options = Vec::with_capacity(QUIZ_OPTION_COUNT);
    for (i, opt) in raw.iter().enumerate() {
        let item_path = format!("{}[{}]", opt_path, i);
        let text = opt
            .as_str()
            .ok_or_else(|| SchemaViolation::new(&item_path, "expected a string"))?;
        if text.trim().is_empty() {
            return Err(SchemaViolation::new(&item_path, "must not be empty"));
        }
        if !seen.insert(text) {
            return Err(SchemaViolation::new(&item_path, "duplicate option"));
        }
        options.push(text.to_string());
    }

    let answer_path = join(path, "correct_answer");
    let correct_answer = string_at(obj, "correct_answer", &answer_path)?;
    if !options.contains(&correct_answer) {
        return Err(SchemaViolation::new(answer_path, "must equal one of the options"));
    }

    Ok(Quiz {
        question,
        options,
        correct_answer,
        explanation: string_at(obj, "explanation", &join(path, "explanation"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz_json() -> Value {
        json!({
            "question": "What is 2 + 2?",
            "options": ["3", "4", "5", "22"],
            "correct_answer": "4",
            "explanation": "Basic arithmetic"
        })
    }

    fn slides_course(n: usize) -> Value {
        let slides: Vec<Value> = (0..n)
            .map(|i| {
                json!({
                    "slide_number": i + 1,
                    "title": format!("Slide {}", i + 1),
                    "content": "Body",
                    "quiz": quiz_json()
                })
            })
            .collect();
        json!({ "title": "Math", "description": "Numbers", "total_slides": n, "slides": slides })
    }

    fn audio_course(n: usize) -> Value {
        let sections: Vec<Value> = (0..n)
            .map(|i| {
                json!({
                    "section_number": i + 1,
                    "title": format!("Part {}", i + 1),
                    "content": "Body",
                    "key_points": ["one", "two"],
                    "script": "Speaker 1: Hi\nSpeaker 2: Hello",
                    "quiz": quiz_json()
                })
            })
            .collect();
        json!({ "title": "Pods", "description": "Talk", "total_sections": n, "sections": sections })
    }

    fn violation(schema: CourseSchema, value: &Value) -> SchemaViolation {
        schema.validate(value).unwrap_err()
    }

    #[test]
    fn test_valid_slides_course() {
        let course = CourseSchema::new(CourseFormat::Slides, 5)
            .validate(&slides_course(5))
            .unwrap();
        assert_eq!(course.format(), CourseFormat::Slides);
        assert_eq!(course.unit_count(), 5);
        assert!(course.quizzes().iter().all(|q| q.options.len() == 4));
    }

    #[test]
    fn test_valid_audio_course_keeps_script() {
        let course = CourseSchema::new(CourseFormat::Audio, 2)
            .validate(&audio_course(2))
            .unwrap();
        match course {
            GeneratedCourse::Audio(c) => {
                assert_eq!(c.sections[0].script.as_deref(), Some("Speaker 1: Hi\nSpeaker 2: Hello"));
                assert!(c.sections[0].audio_url.is_none());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_duration_must_fit_stored_column() {
        let mut course = audio_course(1);
        course["sections"][0]["duration"] = json!(6_000_000_000_u64);
        let v = violation(CourseSchema::lenient(CourseFormat::Audio), &course);
        assert_eq!(v.path, "sections[0].duration");
        assert_eq!(v.reason, "out of range");

        course["sections"][0]["duration"] = json!(i32::MAX as u64 + 1);
        let v = violation(CourseSchema::lenient(CourseFormat::Audio), &course);
        assert_eq!(v.reason, "out of range");

        course["sections"][0]["duration"] = json!(i32::MAX);
        let GeneratedCourse::Audio(c) = CourseSchema::lenient(CourseFormat::Audio)
            .validate(&course)
            .unwrap()
        else {
            panic!("expected audio course")
        };
        assert_eq!(c.sections[0].duration, Some(i32::MAX as u32));
    }

    #[test]
    fn test_video_sections_ignore_audio_fields() {
        let mut course = audio_course(1);
        course["sections"][0]["audioUrl"] = json!("data:audio/mpeg;base64,AAAA");
        course["sections"][0]["duration"] = json!(42);
        let GeneratedCourse::Video(c) = CourseSchema::lenient(CourseFormat::Video)
            .validate(&course)
            .unwrap()
        else {
            panic!("expected video course")
        };
        assert!(c.sections[0].script.is_none());
        assert!(c.sections[0].audio_url.is_none());
        assert!(c.sections[0].duration.is_none());
    }

    #[test]
    fn test_non_object_root() {
        let v = violation(CourseSchema::lenient(CourseFormat::Slides), &json!([1, 2]));
        assert_eq!(v.path, "$");
    }

    #[test]
    fn test_unit_count_mismatch() {
        let v = violation(CourseSchema::new(CourseFormat::Slides, 5), &slides_course(4));
        assert_eq!(v.path, "slides");
    }

    #[test]
    fn test_lenient_accepts_any_count_but_not_zero() {
        assert!(CourseSchema::lenient(CourseFormat::Slides).validate(&slides_course(3)).is_ok());
        let v = violation(CourseSchema::lenient(CourseFormat::Slides), &slides_course(0));
        assert_eq!(v.path, "slides");
    }

    #[test]
    fn test_declared_total_must_match() {
        let mut course = slides_course(3);
        course["total_slides"] = json!(5);
        let v = violation(CourseSchema::lenient(CourseFormat::Slides), &course);
        assert_eq!(v.path, "total_slides");
    }

    #[test]
    fn test_empty_title() {
        let mut course = slides_course(1);
        course["title"] = json!("   ");
        assert_eq!(violation(CourseSchema::lenient(CourseFormat::Slides), &course).path, "title");
    }

    #[test]
    fn test_missing_quiz_reports_unit_path() {
        let mut course = slides_course(3);
        course["slides"][2].as_object_mut().unwrap().remove("quiz");
        let v = violation(CourseSchema::new(CourseFormat::Slides, 3), &course);
        assert_eq!(v.path, "slides[2].quiz");
    }

    #[test]
    fn test_duplicate_option_path() {
        let mut course = slides_course(3);
        course["slides"][2]["quiz"]["options"] = json!(["a", "a", "b", "c"]);
        course["slides"][2]["quiz"]["correct_answer"] = json!("a");
        let v = violation(CourseSchema::new(CourseFormat::Slides, 3), &course);
        assert_eq!(v.path, "slides[2].quiz.options[1]");
    }

    #[test]
    fn test_wrong_option_count() {
        let mut course = slides_course(1);
        course["slides"][0]["quiz"]["options"] = json!(["4", "5", "6"]);
        let v = violation(CourseSchema::new(CourseFormat::Slides, 1), &course);
        assert_eq!(v.path, "slides[0].quiz.options");
    }

    #[test]
    fn test_blank_option_rejected() {
        let mut course = slides_course(1);
        course["slides"][0]["quiz"]["options"] = json!(["4", " ", "6", "7"]);
        let v = violation(CourseSchema::new(CourseFormat::Slides, 1), &course);
        assert_eq!(v.path, "slides[0].quiz.options[1]");
    }

    #[test]
    fn test_correct_answer_is_case_sensitive() {
        let mut course = slides_course(1);
        course["slides"][0]["quiz"]["options"] = json!(["Rust", "Go", "C", "Zig"]);
        course["slides"][0]["quiz"]["correct_answer"] = json!("rust");
        let v = violation(CourseSchema::new(CourseFormat::Slides, 1), &course);
        assert_eq!(v.path, "slides[0].quiz.correct_answer");
    }

    #[test]
    fn test_first_failure_wins() {
        let mut course = slides_course(3);
        course["slides"][0]["title"] = json!("");
        course["slides"][1]["quiz"]["options"] = json!([]);
        let v = violation(CourseSchema::new(CourseFormat::Slides, 3), &course);
        assert_eq!(v.path, "slides[0].title");
    }

    #[test]
    fn test_audio_requires_script() {
        let mut course = audio_course(1);
        course["sections"][0].as_object_mut().unwrap().remove("script");
        let v = violation(CourseSchema::new(CourseFormat::Audio, 1), &course);
        assert_eq!(v.path, "sections[0].script");
    }

    #[test]
    fn test_video_does_not_read_script() {
        let course = CourseSchema::new(CourseFormat::Video, 2)
            .validate(&audio_course(2))
            .unwrap();
        assert_eq!(course.format(), CourseFormat::Video);
    }

    #[test]
    fn test_json_schema_is_strict() {
        let schema = CourseSchema::new(CourseFormat::Audio, 5).json_schema();
        assert_eq!(schema["additionalProperties"], false);
        let unit = &schema["properties"]["sections"]["items"];
        let required: Vec<&str> = unit["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(required.contains(&"script"));
        assert!(required.contains(&"key_points"));
        assert_eq!(unit["additionalProperties"], false);
    }

    #[test]
    fn test_slides_schema_has_no_section_fields() {
        let schema = CourseSchema::new(CourseFormat::Slides, 5).json_schema();
        let unit = &schema["properties"]["slides"]["items"]["properties"];
        assert!(unit.get("key_points").is_none());
        assert!(unit.get("slide_number").is_some());
    }
}
