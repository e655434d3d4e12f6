//! Pipeline stages for image-to-QA extraction.
//!
//! Each submodule implements exactly one transformation step. Keeping the
//! stages separate makes each independently testable and lets us swap an
//! implementation (e.g. a different model provider) without touching the
//! others.
//!
//! ## Data Flow
//!
//! ```text
//! input ───▶ normalize ───▶ model ───▶ parse
//! (upload/path) (≤1024 JPEG)  (Gemini)   (Q/A pairs)
//! ```
//!
//! 1. [`input`]     — resolve a path-based request body to image bytes
//! 2. [`normalize`] — decode, shrink-to-fit, JPEG re-encode; CPU-bound, so
//!    the orchestrator runs it under `spawn_blocking`
//! 3. [`model`]     — send prompt + inline base64 image to the generative
//!    model; the only stage with network I/O
//! 4. [`parse`]     — walk the model's line-oriented text into `QAPair`s,
//!    substituting the sentinel pair when nothing parses

pub mod input;
pub mod model;
pub mod normalize;
pub mod parse;
