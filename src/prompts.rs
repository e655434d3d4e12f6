//! The extraction prompt sent alongside every image.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tightening the output format or adding a
//!    rule means editing exactly one place.
//!
//! 2. **Testability** — the parser's unit tests assert against the same
//!    `Q<n>:`/`A<n>:` line shape the prompt demands, so a format change
//!    breaks loudly instead of silently producing sentinel output.
//!
//! Callers can override it via [`crate::config::ExtractionConfig::prompt`];
//! the constant here is used only when no override is provided.

/// Default instruction asking the model for line-oriented Q/A output.
///
/// The parser in [`crate::pipeline::parse`] depends on this exact shape:
/// one `Q<n>: …` line immediately followed by one `A<n>: …` line per pair.
pub const QA_EXTRACTION_PROMPT: &str = "\
Extract all question-answer pairs from the image.
Return the output in this structured format:
Q1: <question>
A1: <answer>
Q2: <question>
A2: <answer>
Continue this format for all questions.";
