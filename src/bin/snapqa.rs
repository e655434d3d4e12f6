//! HTTP server binary for snapqa.
//!
//! A thin shim over the library crate: CLI flags and environment variables
//! become an `ExtractionConfig`, the Gemini client is constructed once
//! (failing fast when no credential is present), and the axum router is
//! served until the process is stopped.

use anyhow::{Context, Result};
use clap::Parser;
use snapqa::{AppState, ExtractionConfig, GeminiClient, VisionModel, DEFAULT_MODEL};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "snapqa",
    version,
    about = "Serve an HTTP endpoint that extracts question/answer pairs from images"
)]
struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Gemini model identifier.
    #[arg(long, env = "SNAPQA_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// API credential; falls back to GOOGLE_API_KEY.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Longest edge of the normalized image in pixels.
    #[arg(long, default_value_t = 1024)]
    max_image_edge: u32,

    /// Per-call model timeout in seconds.
    #[arg(long, default_value_t = 60)]
    api_timeout_secs: u64,

    /// Development mode: 500 responses include the error's debug rendering.
    #[arg(long, env = "SNAPQA_DEV", default_value_t = false)]
    dev: bool,

    /// Log filter, e.g. "info" or "snapqa=debug".
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let mut builder = ExtractionConfig::builder()
        .model(&cli.model)
        .max_image_edge(cli.max_image_edge)
        .api_timeout_secs(cli.api_timeout_secs);
    if let Some(key) = &cli.api_key {
        builder = builder.api_key(key);
    }
    let config = builder.build().context("invalid configuration")?;

    // Fail fast: no credential means no working deployment.
    let model: Arc<dyn VisionModel> = Arc::new(GeminiClient::from_config(&config)?);

    let state = AppState::new(config, model, cli.dev);
    let app = snapqa::router(state);

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", cli.host, cli.port))?;

    info!("Server running on port {}", cli.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
