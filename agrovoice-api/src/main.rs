//! agrovoice-api - Leaf disease advisory HTTP backend
//!
//! Accepts leaf-image uploads on `POST /analyze/`, classifies the disease
//! with the ONNX model, looks up the per-language advisory, and renders it
//! as speech through Dubverse (best-effort).

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agrovoice_api::{build_router, AppState};
use agrovoice_common::classifier::OnnxClassifier;
use agrovoice_common::config::{Config, ConfigOverrides};
use agrovoice_common::tts::DubverseClient;

/// Command-line arguments for agrovoice-api
#[derive(Parser, Debug)]
#[command(name = "agrovoice-api")]
#[command(about = "Leaf disease advisory HTTP backend")]
#[command(version)]
struct Args {
    /// Address to listen on
    #[arg(short, long, env = "AGROVOICE_BIND")]
    bind: Option<String>,

    /// Path to the exported ONNX classification model
    #[arg(short, long, env = "AGROVOICE_MODEL")]
    model: Option<PathBuf>,

    /// Rendered-audio output file
    #[arg(long, env = "AGROVOICE_AUDIO_OUT")]
    audio_out: Option<PathBuf>,

    /// Config file path (default: platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agrovoice_api=info,agrovoice_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting agrovoice-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = Config::resolve(ConfigOverrides {
        bind_addr: args.bind,
        model_path: args.model,
        audio_output: args.audio_out,
        config_file: args.config,
    })?;

    info!("Model: {}", config.model_path.display());

    // Load the classification model once at startup
    let classifier = OnnxClassifier::load(&config.model_path, config.labels.clone())
        .context("Failed to load classification model")?;

    if config.api_key.is_none() {
        warn!("DUBVERSE_API_KEY not set; voice rendering disabled");
    }
    let tts = DubverseClient::new(config.api_key.clone());

    let state = AppState::new(Arc::new(classifier), tts, config.audio_output.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("agrovoice-api listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
