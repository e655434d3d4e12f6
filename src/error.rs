//! Error types for the snapqa library.
//!
//! A single tagged enum covers every failure the extraction pipeline can
//! produce. The variants exist so the HTTP boundary can map them to status
//! codes with one `match` — client mistakes (missing input, bad path) become
//! 400s, everything that happens after a valid image was accepted becomes a
//! 500 carrying the underlying message. Nothing is retried or recovered
//! internally; either the full pair list comes back or the request fails.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the snapqa library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The request supplied neither a multipart `image` field nor an
    /// `image_path` JSON field.
    #[error("No valid image provided")]
    NoImageProvided,

    /// `image_path` did not resolve to an existing file.
    #[error("Image file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    // ── Image errors ──────────────────────────────────────────────────────
    /// The uploaded bytes are not a decodable image format.
    #[error("Failed to decode image: {source}")]
    ImageDecode {
        #[source]
        source: image::ImageError,
    },

    /// JPEG re-encoding of the normalized image failed.
    #[error("Failed to encode image: {source}")]
    ImageEncode {
        #[source]
        source: image::ImageError,
    },

    // ── Model errors ──────────────────────────────────────────────────────
    /// The generative model call failed (transport, auth, quota, or a
    /// response that could not be interpreted).
    #[error("Model invocation failed: {detail}")]
    ModelInvocation { detail: String },

    /// No API credential available for the model service.
    #[error("GOOGLE_API_KEY not set.\nExport it or pass --api-key before starting the server.")]
    MissingApiKey,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Runtime errors ────────────────────────────────────────────────────
    /// A blocking image task could not be joined.
    #[error("Image task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ExtractError {
    /// True for errors caused by the caller's request rather than the
    /// pipeline itself. The HTTP layer maps these to 400.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExtractError::NoImageProvided | ExtractError::FileNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = ExtractError::FileNotFound {
            path: PathBuf::from("/tmp/missing.png"),
        };
        assert!(e.to_string().contains("/tmp/missing.png"));
        assert!(e.is_client_error());
    }

    #[test]
    fn model_invocation_display() {
        let e = ExtractError::ModelInvocation {
            detail: "HTTP 429: quota exceeded".into(),
        };
        assert!(e.to_string().contains("quota exceeded"));
        assert!(!e.is_client_error());
    }

    #[test]
    fn no_image_is_client_error() {
        assert!(ExtractError::NoImageProvided.is_client_error());
    }

    #[test]
    fn decode_error_keeps_source() {
        use std::error::Error as _;
        let source = image::ImageError::Unsupported(
            image::error::UnsupportedError::from_format_and_kind(
                image::error::ImageFormatHint::Unknown,
                image::error::UnsupportedErrorKind::GenericFeature("bogus".into()),
            ),
        );
        let e = ExtractError::ImageDecode { source };
        assert!(e.source().is_some());
    }
}
