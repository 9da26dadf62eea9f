//! agrovoice-api library - HTTP backend for the leaf advisory service
//!
//! Accepts a leaf-image upload plus a language code, predicts the disease,
//! looks up the advisory text, and renders it as speech through the
//! Dubverse TTS vendor. Voice rendering is best-effort: its failures never
//! affect the HTTP response.

use agrovoice_common::classifier::DiseaseClassifier;
use agrovoice_common::tts::DubverseClient;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Disease classifier (model loaded once at startup)
    pub classifier: Arc<dyn DiseaseClassifier>,
    /// Dubverse TTS client (keyless client disables voice rendering)
    pub tts: Arc<DubverseClient>,
    /// Rendered-audio output file, overwritten each call
    pub audio_output: PathBuf,
}

impl AppState {
    /// Create new application state
    pub fn new(
        classifier: Arc<dyn DiseaseClassifier>,
        tts: DubverseClient,
        audio_output: PathBuf,
    ) -> Self {
        Self {
            classifier,
            tts: Arc::new(tts),
            audio_output,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::extract::DefaultBodyLimit;
    use axum::routing::post;

    // Uploads are not size-checked; lift axum's default multipart cap
    Router::new()
        .route("/analyze/", post(api::analyze))
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
