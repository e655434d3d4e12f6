//! Top-level extraction entry points.
//!
//! One call = one image through the full pipeline: normalize, invoke the
//! model, parse. The chain is strictly sequential with no partial-result
//! reporting — the caller gets either the complete pair list (sentinel
//! included) or the first error.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::pipeline::model::VisionModel;
use crate::pipeline::parse::{parse_qa_text, QAPair};
use crate::pipeline::{input, normalize};
use crate::prompts::QA_EXTRACTION_PROMPT;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Extract QA pairs from raw image bytes.
///
/// # Errors
/// - [`ExtractError::ImageDecode`] when the bytes are not an image
/// - [`ExtractError::ModelInvocation`] when the model call fails
///
/// The returned vector is never empty; zero parsed pairs become the
/// sentinel pair.
pub async fn extract_qa(
    model: &Arc<dyn VisionModel>,
    bytes: Vec<u8>,
    config: &ExtractionConfig,
) -> Result<Vec<QAPair>, ExtractError> {
    let start = Instant::now();

    // ── Step 1: Normalize ────────────────────────────────────────────────
    // Decode + resize + re-encode is CPU-bound; keep it off the runtime
    // worker threads.
    let max_edge = config.max_image_edge;
    let quality = config.jpeg_quality;
    let normalized =
        tokio::task::spawn_blocking(move || normalize::normalize_image(&bytes, max_edge, quality))
            .await??;

    // ── Step 2: Invoke the model ─────────────────────────────────────────
    let prompt = config.prompt.as_deref().unwrap_or(QA_EXTRACTION_PROMPT);
    let text = model.generate(prompt, &normalized).await?;
    debug!("Model text:\n{}", text);

    // ── Step 3: Parse ────────────────────────────────────────────────────
    let pairs = parse_qa_text(&text);

    info!(
        "Extracted {} pair(s) from {}x{} image in {}ms",
        pairs.len(),
        normalized.width,
        normalized.height,
        start.elapsed().as_millis()
    );
    Ok(pairs)
}

/// Extract QA pairs from an image at a filesystem path.
///
/// Fails with [`ExtractError::FileNotFound`] before touching the pipeline
/// when the path does not resolve.
pub async fn extract_qa_from_path(
    model: &Arc<dyn VisionModel>,
    path: &str,
    config: &ExtractionConfig,
) -> Result<Vec<QAPair>, ExtractError> {
    let bytes = input::read_image_path(path).await?;
    extract_qa(model, bytes, config).await
}
