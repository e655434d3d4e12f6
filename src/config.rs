//! Configuration for QA extraction.
//!
//! Every knob lives in [`ExtractionConfig`], built via its
//! [`ExtractionConfigBuilder`]. One struct makes it trivial to share the
//! config across request handlers behind an `Arc`, log it, and diff two
//! deployments to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! Callers set only what they care about and rely on documented defaults for
//! the rest; new fields never break existing call sites.

use crate::error::ExtractError;
use std::fmt;

/// Gemini model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Configuration for one extraction pipeline instance.
///
/// Built via [`ExtractionConfig::builder()`] or [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use snapqa::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .model("gemini-1.5-flash")
///     .max_image_edge(1024)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// API credential for the model service. `None` means the client reads
    /// `GOOGLE_API_KEY` from the environment when it is constructed.
    pub api_key: Option<String>,

    /// Gemini model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Maximum width/height of the normalized image in pixels. Default: 1024.
    ///
    /// The upload is shrunk (never enlarged) so its longest edge fits this
    /// bound, aspect ratio preserved. 1024 keeps request bodies comfortably
    /// below the API's inline-data limit while leaving printed text legible
    /// to the model.
    pub max_image_edge: u32,

    /// JPEG quality of the normalized image, 1–100. Default: 85.
    ///
    /// Question sheets are high-contrast text; 85 is visually lossless for
    /// that content at roughly a third of the quality-95 payload size.
    pub jpeg_quality: u8,

    /// Sampling temperature for the model. Default: 0.1.
    ///
    /// Transcription wants determinism — higher values make the model
    /// paraphrase the questions instead of copying them.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 4096.
    ///
    /// A densely filled exam sheet stays well under this; too low a value
    /// silently truncates the pair list mid-answer.
    pub max_output_tokens: u32,

    /// Per-call timeout for the model request in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Custom extraction prompt. If `None`, uses the built-in default from
    /// [`crate::prompts`].
    pub prompt: Option<String>,

    /// Override for the Gemini API base URL. Used by tests to point the
    /// client at a local stub; `None` means the public endpoint.
    pub api_base_url: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_image_edge: 1024,
            jpeg_quality: 85,
            temperature: 0.1,
            max_output_tokens: 4096,
            api_timeout_secs: 60,
            prompt: None,
            api_base_url: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_image_edge", &self.max_image_edge)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("prompt", &self.prompt.as_ref().map(|_| "<custom>"))
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_image_edge(mut self, px: u32) -> Self {
        self.config.max_image_edge = px;
        self
    }

    pub fn jpeg_quality(mut self, q: u8) -> Self {
        self.config.jpeg_quality = q;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_output_tokens(mut self, n: u32) -> Self {
        self.config.max_output_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = Some(prompt.into());
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = Some(url.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(ExtractError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        if c.max_image_edge < 16 {
            return Err(ExtractError::InvalidConfig(format!(
                "max_image_edge must be ≥ 16, got {}",
                c.max_image_edge
            )));
        }
        if c.model.is_empty() {
            return Err(ExtractError::InvalidConfig("model must not be empty".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ExtractionConfig::default();
        assert_eq!(c.model, DEFAULT_MODEL);
        assert_eq!(c.max_image_edge, 1024);
        assert_eq!(c.jpeg_quality, 85);
        assert_eq!(c.api_timeout_secs, 60);
        assert!(c.api_key.is_none());
    }

    #[test]
    fn builder_rejects_bad_quality() {
        assert!(ExtractionConfig::builder().jpeg_quality(0).build().is_err());
        assert!(ExtractionConfig::builder().jpeg_quality(101).build().is_err());
        assert!(ExtractionConfig::builder().jpeg_quality(100).build().is_ok());
    }

    #[test]
    fn builder_rejects_tiny_edge() {
        assert!(ExtractionConfig::builder().max_image_edge(8).build().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let c = ExtractionConfig::builder()
            .api_key("super-secret")
            .build()
            .unwrap();
        let rendered = format!("{:?}", c);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
