//! Decoders for the artifact formats the pipeline writes.
//!
//! Summaries are plain text and a bad one is a hard error. Chapters and
//! transcripts are decoded leniently: upstream format drift degrades to an
//! empty chapter list or the raw transcript text, never to an error.

use serde::Deserialize;
use tracing::debug;

use vsum_models::Chapter;

/// Fence marker wrapping JSON in script output.
const FENCE: &str = "```";

/// Outcome of a lenient decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<T> {
    /// The artifact had the expected structure.
    Parsed(T),
    /// The structure did not match; the raw text is used as-is.
    Fallback(String),
    /// Nothing usable in the artifact.
    Empty,
}

impl<T> ParseOutcome<T> {
    pub fn outcome_name(&self) -> &'static str {
        match self {
            Self::Parsed(_) => "parsed",
            Self::Fallback(_) => "fallback",
            Self::Empty => "empty",
        }
    }
}

impl ParseOutcome<Vec<Chapter>> {
    /// Chapter list to render; empty unless parsing succeeded.
    pub fn into_chapters(self) -> Vec<Chapter> {
        match self {
            Self::Parsed(chapters) => chapters,
            Self::Fallback(_) | Self::Empty => Vec::new(),
        }
    }
}

impl ParseOutcome<String> {
    /// Text to render, whichever path produced it.
    pub fn into_text(self) -> String {
        match self {
            Self::Parsed(text) | Self::Fallback(text) => text,
            Self::Empty => String::new(),
        }
    }
}

/// Error decoding a summary artifact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("summary is not valid UTF-8: {0}")]
pub struct MalformedSummary(String);

/// Decode a summary body. Summaries pass through untouched.
pub fn decode_summary(bytes: Vec<u8>) -> Result<String, MalformedSummary> {
    String::from_utf8(bytes).map_err(|e| MalformedSummary(e.utf8_error().to_string()))
}

/// Remove a surrounding fenced code block, whatever its language tag.
///
/// Input is trimmed first. When it opens with a fence marker, the opening line
/// is dropped, and so is the last line if it is a fence marker too. Text that
/// does not start with a fence is returned trimmed and otherwise unchanged.
pub fn strip_code_fence(raw: &str) -> String {
    let text = raw.trim();
    if !text.starts_with(FENCE) {
        return text.to_string();
    }

    let mut lines: Vec<&str> = text.lines().collect();
    if lines.first().is_some_and(|l| l.starts_with(FENCE)) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|l| l.trim_start().starts_with(FENCE)) {
        lines.pop();
    }
    lines.join("\n")
}

/// Accepted shapes of the chapters document.
#[derive(Deserialize)]
#[serde(untagged)]
enum ChaptersDocument {
    List(Vec<Chapter>),
    Wrapped { chapters: Vec<Chapter> },
}

/// Decode the chapters artifact.
///
/// Accepts a bare array of chapter records or an object with a `chapters`
/// array, optionally inside a fenced block. Returns [`ParseOutcome::Empty`]
/// for blank input and for anything that does not parse; never fails.
pub fn decode_chapters(raw: &str) -> ParseOutcome<Vec<Chapter>> {
    if raw.trim().is_empty() {
        return ParseOutcome::Empty;
    }

    let body = strip_code_fence(raw);
    match serde_json::from_str::<ChaptersDocument>(&body) {
        Ok(ChaptersDocument::List(chapters)) | Ok(ChaptersDocument::Wrapped { chapters }) => {
            ParseOutcome::Parsed(chapters)
        }
        Err(e) => {
            debug!(error = %e, "Chapters artifact did not parse, showing none");
            ParseOutcome::Empty
        }
    }
}

/// Location of the transcript text in the speech-to-text output.
const TRANSCRIPT_POINTER: &str = "/results/transcripts/0/transcript";

/// Decode the transcript artifact.
///
/// Extracts `results.transcripts[0].transcript` when present. Any other input
/// (invalid JSON, another shape, an empty `transcripts` list) is returned
/// verbatim as [`ParseOutcome::Fallback`]. Entries after the first are not
/// inspected.
pub fn decode_transcript(raw: &str) -> ParseOutcome<String> {
    let first = serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|doc| {
            doc.pointer(TRANSCRIPT_POINTER)
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        });

    match first {
        Some(text) => ParseOutcome::Parsed(text),
        None => {
            debug!("Transcript artifact is not structured JSON, using raw text");
            ParseOutcome::Fallback(raw.to_string())
        }
    }
}
