//! HTTP surface: one welcome route and one extraction route.
//!
//! The handler is the single place errors become HTTP responses: the tagged
//! [`ExtractError`] taxonomy is matched exactly once in
//! [`error_response`], so status-code policy cannot drift between call
//! sites. Input precedence follows the API contract — a multipart `image`
//! field wins, a JSON `image_path` is the fallback, anything else is a 400.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::extract::{extract_qa, extract_qa_from_path};
use crate::pipeline::model::VisionModel;
use crate::pipeline::parse::QAPair;
use axum::{
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Uploads beyond this are rejected outright; the normalizer would shrink
/// them anyway and the model API caps inline payloads well below it.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared state for all routes. Cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ExtractionConfig>,
    pub model: Arc<dyn VisionModel>,
    /// When set, 500 responses carry the debug rendering of the error.
    pub dev_mode: bool,
}

impl AppState {
    pub fn new(config: ExtractionConfig, model: Arc<dyn VisionModel>, dev_mode: bool) -> Self {
        Self {
            config: Arc::new(config),
            model,
            dev_mode,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/extract_qa", post(extract_qa_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

// ── Request/response bodies ──────────────────────────────────────────────

#[derive(Serialize)]
struct WelcomeResponse {
    message: &'static str,
}

#[derive(Deserialize)]
struct ExtractRequest {
    image_path: Option<String>,
}

#[derive(Serialize)]
struct ExtractResponse {
    questions_answers: Vec<QAPair>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────

/// Handler for `GET /`.
async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the API!",
    })
}

/// Handler for `POST /extract_qa`.
///
/// Accepts either a multipart upload (field `image`) or a JSON body with an
/// `image_path`; multipart takes precedence by content type. All pipeline
/// outcomes funnel through [`error_response`].
async fn extract_qa_handler(State(state): State<AppState>, req: Request) -> Response {
    match handle_extract(&state, req).await {
        Ok(pairs) => {
            info!("extract_qa: returning {} pair(s)", pairs.len());
            (
                StatusCode::OK,
                Json(ExtractResponse {
                    questions_answers: pairs,
                }),
            )
                .into_response()
        }
        Err(err) => error_response(&err, state.dev_mode),
    }
}

async fn handle_extract(state: &AppState, req: Request) -> Result<Vec<QAPair>, ExtractError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(req, &())
            .await
            .map_err(|_| ExtractError::NoImageProvided)?;
        let bytes = read_image_field(multipart).await?;
        extract_qa(&state.model, bytes, &state.config).await
    } else if content_type.starts_with("application/json") {
        let Json(body) = Json::<ExtractRequest>::from_request(req, &())
            .await
            .map_err(|_| ExtractError::NoImageProvided)?;
        let path = match body.image_path {
            Some(p) if !p.is_empty() => p,
            _ => return Err(ExtractError::NoImageProvided),
        };
        extract_qa_from_path(&state.model, &path, &state.config).await
    } else {
        Err(ExtractError::NoImageProvided)
    }
}

/// Pull the bytes of the `image` field out of a multipart body.
async fn read_image_field(mut multipart: Multipart) -> Result<Vec<u8>, ExtractError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ExtractError::NoImageProvided)?
    {
        if field.name() == Some("image") {
            let bytes = field
                .bytes()
                .await
                .map_err(|_| ExtractError::NoImageProvided)?;
            if bytes.is_empty() {
                return Err(ExtractError::NoImageProvided);
            }
            return Ok(bytes.to_vec());
        }
    }
    Err(ExtractError::NoImageProvided)
}

// ── Error mapping ────────────────────────────────────────────────────────

/// Translate an [`ExtractError`] into the HTTP response the API promises.
///
/// Client errors use fixed message strings so callers can match on them;
/// everything else is a 500 with the underlying message, plus the debug
/// rendering of the error value when `dev_mode` is set.
fn error_response(err: &ExtractError, dev_mode: bool) -> Response {
    let (status, body) = match err {
        ExtractError::FileNotFound { .. } => (
            StatusCode::BAD_REQUEST,
            ErrorBody {
                error: "Image file not found",
                message: None,
                stack: None,
            },
        ),
        ExtractError::NoImageProvided => (
            StatusCode::BAD_REQUEST,
            ErrorBody {
                error: "No valid image provided",
                message: None,
                stack: None,
            },
        ),
        _ => {
            error!("extract_qa failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "Internal server error",
                    message: Some(err.to_string()),
                    stack: dev_mode.then(|| format!("{:?}", err)),
                },
            )
        }
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_json(err: &ExtractError, dev: bool) -> (StatusCode, serde_json::Value) {
        let response = error_response(err, dev);
        let status = response.status();
        let bytes = tokio_test::block_on(axum::body::to_bytes(
            response.into_body(),
            usize::MAX,
        ))
        .expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[test]
    fn file_not_found_maps_to_fixed_400() {
        let err = ExtractError::FileNotFound {
            path: "/nope.png".into(),
        };
        let (status, json) = body_json(&err, false);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Image file not found");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn no_image_maps_to_fixed_400() {
        let (status, json) = body_json(&ExtractError::NoImageProvided, false);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No valid image provided");
    }

    #[test]
    fn pipeline_errors_map_to_500_with_message() {
        let err = ExtractError::ModelInvocation {
            detail: "HTTP 503: overloaded".into(),
        };
        let (status, json) = body_json(&err, false);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Internal server error");
        assert!(json["message"].as_str().unwrap().contains("overloaded"));
        assert!(json.get("stack").is_none());
    }

    #[test]
    fn dev_mode_includes_stack() {
        let err = ExtractError::ModelInvocation {
            detail: "boom".into(),
        };
        let (_, json) = body_json(&err, true);
        assert!(json["stack"].as_str().unwrap().contains("ModelInvocation"));
    }
}
