//! Dialogue script parsing.
//!
//! Scripts are plain text with one `Speaker <n>: <line>` utterance per line.
//! Anything else (headings, stage directions, blank lines) is dropped.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{DialogueInput, VoicePool};

/// Hard cap applied to scripts before they are sent for synthesis.
pub const DEFAULT_SCRIPT_LIMIT: usize = 2900;

/// A newline is only used as the cut point when it sits past this share of the limit.
const NEWLINE_CUT_RATIO: f64 = 0.8;

static SPEAKER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Speaker (\d+):\s*(.+)$").expect("speaker pattern is valid"));

/// Split a script into ordered dialogue inputs, one per `Speaker <n>:` line.
///
/// Speaker numbers are 1-based and wrap around the voice pool, so with three
/// voices `Speaker 4` reuses the voice of `Speaker 1`.
pub fn parse_script(script: &str, voices: &VoicePool) -> Vec<DialogueInput> {
    let mut inputs = Vec::new();

    // Lines are trimmed first, so indented `Speaker <n>:` lines still match.
    for line in script.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(caps) = SPEAKER_LINE.captures(line) else {
            log::debug!("Dropping non-dialogue script line: {:?}", line);
            continue;
        };

        let speaker = match caps[1].parse::<usize>() {
            Ok(n) if n >= 1 => n,
            _ => {
                log::debug!("Dropping line with invalid speaker number: {:?}", line);
                continue;
            }
        };

        let text = caps[2].trim();
        inputs.push(DialogueInput::new(text, voices.voice_for(speaker - 1)));
    }

    inputs
}

/// Cap a script at `max_chars` characters.
///
/// When the cut would land mid-line and a newline exists past 80% of the
/// limit, the script is cut at that newline instead so no utterance is split.
pub fn truncate_script(script: &str, max_chars: usize) -> Cow<'_, str> {
    let Some((byte_limit, _)) = script.char_indices().nth(max_chars) else {
        return Cow::Borrowed(script);
    };

    let head = &script[..byte_limit];
    let min_chars = (max_chars as f64 * NEWLINE_CUT_RATIO) as usize;

    if let Some(nl) = head.rfind('\n') {
        if head[..nl].chars().count() > min_chars {
            return Cow::Owned(head[..nl].to_string());
        }
    }

    Cow::Owned(head.to_string())
}
