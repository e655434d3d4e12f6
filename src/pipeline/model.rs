//! Model invocation: prompt + inline image → raw model text.
//!
//! The seam is the [`VisionModel`] trait so the HTTP layer and tests can
//! inject fakes instead of reaching for a process-wide client singleton.
//! The one real implementation, [`GeminiClient`], speaks the Gemini
//! `generateContent` REST API directly over `reqwest`: the request carries
//! the instruction text plus the normalized JPEG as base64 `inlineData`
//! tagged `image/jpeg`.
//!
//! One attempt per request, no retry. A transient 429/503 therefore fails
//! the whole HTTP request; the caller decides whether to resubmit.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::pipeline::normalize::NormalizedImage;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Public Gemini API base. Override via
/// [`crate::config::ExtractionConfig::api_base_url`] in tests.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A multimodal generative model that turns an instruction plus one image
/// into free text.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Invoke the model once and return its response as trimmed plain text.
    async fn generate(
        &self,
        prompt: &str,
        image: &NormalizedImage,
    ) -> Result<String, ExtractError>;
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    /// Build a client from the extraction config.
    ///
    /// The credential comes from `config.api_key`, falling back to the
    /// `GOOGLE_API_KEY` environment variable. Fails with
    /// [`ExtractError::MissingApiKey`] when neither is set, so a
    /// misconfigured deployment dies at startup instead of on the first
    /// request.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractError> {
        let api_key = match &config.api_key {
            Some(key) if !key.is_empty() => key.clone(),
            _ => std::env::var("GOOGLE_API_KEY")
                .ok()
                .filter(|k| !k.is_empty())
                .ok_or(ExtractError::MissingApiKey)?,
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| ExtractError::ModelInvocation {
                detail: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            api_key,
            model: config.model.clone(),
            base_url: config
                .api_base_url
                .clone()
                .unwrap_or_else(|| GEMINI_API_BASE.to_string()),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Assemble the JSON request body for one prompt + image.
    fn build_request(&self, prompt: &str, image: &NormalizedImage) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: NormalizedImage::MIME_TYPE.to_string(),
                            data: STANDARD.encode(&image.data),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        }
    }
}

#[async_trait]
impl VisionModel for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        image: &NormalizedImage,
    ) -> Result<String, ExtractError> {
        let request = self.build_request(prompt, image);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExtractError::ModelInvocation {
                detail: e.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExtractError::ModelInvocation {
                detail: format!("failed to read response body: {e}"),
            })?;

        if !status.is_success() {
            return Err(ExtractError::ModelInvocation {
                detail: format!("HTTP {status}: {body}"),
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| ExtractError::ModelInvocation {
                detail: format!("malformed response: {e}"),
            })?;

        let text = extract_text(&parsed)?;
        debug!("Model returned {} chars", text.len());
        Ok(text)
    }
}

/// Join the text parts of the first candidate, trimmed.
fn extract_text(response: &GenerateResponse) -> Result<String, ExtractError> {
    let candidate = response
        .candidates
        .first()
        .ok_or_else(|| ExtractError::ModelInvocation {
            detail: "response contained no candidates".to_string(),
        })?;

    let text = candidate
        .content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(text.trim().to_string())
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GeminiClient {
        let config = ExtractionConfig::builder()
            .api_key("test-key")
            .build()
            .unwrap();
        GeminiClient::from_config(&config).expect("client")
    }

    fn tiny_image() -> NormalizedImage {
        NormalizedImage {
            data: vec![0xFF, 0xD8, 0xFF, 0xD9],
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn request_body_shape() {
        let client = test_client();
        let req = client.build_request("Extract pairs.", &tiny_image());
        let json = serde_json::to_value(&req).expect("serialize");

        assert_eq!(json["contents"][0]["parts"][0]["text"], "Extract pairs.");
        let inline = &json["contents"][0]["parts"][1]["inlineData"];
        assert_eq!(inline["mimeType"], "image/jpeg");
        assert_eq!(inline["data"], STANDARD.encode([0xFF, 0xD8, 0xFF, 0xD9]));
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 4096);
    }

    #[test]
    fn endpoint_uses_model_and_base() {
        let config = ExtractionConfig::builder()
            .api_key("k")
            .api_base_url("http://127.0.0.1:9999/v1beta")
            .model("gemini-1.5-flash")
            .build()
            .unwrap();
        let client = GeminiClient::from_config(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://127.0.0.1:9999/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn extract_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Q1: a?"},{"text":"A1: b"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(&response).unwrap(), "Q1: a?\nA1: b");
    }

    #[test]
    fn extract_text_rejects_empty_candidates() {
        let response: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        let err = extract_text(&response).unwrap_err();
        assert!(matches!(err, ExtractError::ModelInvocation { .. }));
    }

    #[test]
    fn extract_text_trims() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"  hello \n"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(&response).unwrap(), "hello");
    }
}
