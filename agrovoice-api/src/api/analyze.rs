//! POST /analyze/ - classify an uploaded leaf image and return the advisory
//!
//! Multipart form fields: `image` (file) and `lang` (`en`|`hi`|`mr`).
//! The upload is persisted to a `temp_<hex>.jpg` file in the working
//! directory for the duration of inference and removed afterwards, on the
//! error path included. Voice rendering runs after the advisory lookup;
//! its failures are logged and swallowed so the response carries the
//! classification result regardless.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use agrovoice_common::advisory::advisory_for;
use agrovoice_common::classifier::ClassifierError;
use agrovoice_common::Language;

use crate::AppState;

/// Successful analysis result
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub disease: String,
    pub advisory: String,
}

/// Analysis errors
///
/// Every variant maps to a 500 with `{"error": <message>}`; the endpoint
/// deliberately reports nothing finer-grained to the caller.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Malformed multipart payload
    #[error("Invalid multipart request: {0}")]
    Multipart(String),

    /// Required form field absent
    #[error("Missing form field: {0}")]
    MissingField(&'static str),

    /// Language code outside en/hi/mr
    #[error("{0}")]
    InvalidLanguage(String),

    /// Classifier failure (undecodable payload, inference error)
    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    /// Temp file I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        tracing::error!("Analyze request failed: {}", self);
        let body = Json(json!({
            "error": self.to_string(),
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// POST /analyze/
pub async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AnalyzeError> {
    let (image_bytes, lang_code) = read_form(&mut multipart).await?;
    let lang: Language = lang_code
        .parse()
        .map_err(|e: agrovoice_common::Error| AnalyzeError::InvalidLanguage(e.to_string()))?;

    // Persist the upload for the duration of inference
    let temp_path = PathBuf::from(format!("temp_{}.jpg", Uuid::new_v4().simple()));
    tokio::fs::write(&temp_path, &image_bytes).await?;

    let disease = match run_classifier(&state, &temp_path).await {
        Ok(disease) => disease,
        Err(e) => {
            remove_upload(&temp_path).await;
            return Err(e);
        }
    };

    let advisory = advisory_for(&disease, lang).to_string();

    // Voice rendering is best-effort; the response is already decided
    if let Err(e) = state.tts.speak(&advisory, lang, &state.audio_output).await {
        tracing::error!("Speech error: {}", e);
    }

    remove_upload(&temp_path).await;

    tracing::info!(disease = %disease, lang = %lang, "Analysis complete");

    Ok(Json(AnalyzeResponse { disease, advisory }))
}

/// Pull the `image` and `lang` fields out of the multipart form
async fn read_form(multipart: &mut Multipart) -> Result<(Vec<u8>, String), AnalyzeError> {
    let mut image_bytes: Option<Vec<u8>> = None;
    let mut lang_code: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AnalyzeError::Multipart(e.to_string()))?
    {
        match field.name() {
            Some("image") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AnalyzeError::Multipart(e.to_string()))?;
                image_bytes = Some(bytes.to_vec());
            }
            Some("lang") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AnalyzeError::Multipart(e.to_string()))?;
                lang_code = Some(text);
            }
            _ => {}
        }
    }

    let image_bytes = image_bytes.ok_or(AnalyzeError::MissingField("image"))?;
    let lang_code = lang_code.ok_or(AnalyzeError::MissingField("lang"))?;
    Ok((image_bytes, lang_code))
}

/// Run inference on a blocking worker thread
async fn run_classifier(state: &AppState, image_path: &Path) -> Result<String, AnalyzeError> {
    let classifier = state.classifier.clone();
    let path = image_path.to_path_buf();

    tokio::task::spawn_blocking(move || classifier.classify(&path))
        .await
        .map_err(|e| AnalyzeError::Internal(format!("Classifier task failed: {}", e)))?
        .map_err(AnalyzeError::from)
}

/// Remove the temp upload; a failed removal is logged, not surfaced
async fn remove_upload(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(file = %path.display(), "Failed to remove temp upload: {}", e);
    }
}
