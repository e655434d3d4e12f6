//! # snapqa
//!
//! Extract question/answer pairs from images using a Vision Language Model.
//!
//! ## Why this crate?
//!
//! Photographed worksheets, quiz screenshots, and exam sheets carry their
//! content as pixels. Classic OCR recovers characters but not structure;
//! a VLM reads the page as a human would and, with a strict output prompt,
//! emits one `Q<n>:` line and one `A<n>:` line per pair — which this crate
//! then parses into typed values.
//!
//! ## Pipeline Overview
//!
//! ```text
//! image bytes
//!  │
//!  ├─ 1. Normalize  decode + shrink-to-fit ≤1024px + JPEG re-encode
//!  ├─ 2. Model      Gemini generateContent with inline base64 image
//!  ├─ 3. Parse      stride-2 Q/A line walk, sentinel fallback
//!  └─ 4. Serve      axum route mapping the result to JSON
//! ```
//!
//! ## Quick Start (library)
//!
//! ```rust,no_run
//! use snapqa::{extract_qa, ExtractionConfig, GeminiClient, VisionModel};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential read from GOOGLE_API_KEY
//!     let config = ExtractionConfig::default();
//!     let model: Arc<dyn VisionModel> = Arc::new(GeminiClient::from_config(&config)?);
//!     let bytes = std::fs::read("worksheet.png")?;
//!     let pairs = extract_qa(&model, bytes, &config).await?;
//!     for p in pairs {
//!         println!("{} -> {}", p.question, p.answer);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The `snapqa` binary (feature `cli`, on by default) wraps the same
//! pipeline in an HTTP service: `POST /extract_qa` with a multipart `image`
//! field or a JSON `{"image_path": ...}` body.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod prompts;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, DEFAULT_MODEL};
pub use error::ExtractError;
pub use extract::{extract_qa, extract_qa_from_path};
pub use pipeline::model::{GeminiClient, VisionModel};
pub use pipeline::normalize::{normalize_image, NormalizedImage};
pub use pipeline::parse::{parse_qa_text, render_qa_text, QAPair};
pub use server::{router, AppState};
