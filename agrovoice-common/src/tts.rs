//! Dubverse TTS client
//!
//! Renders advisory text as audio through the Dubverse vendor API:
//! `POST {base}/api/tts` with an `X-API-KEY` header and a JSON body
//! selecting a per-language speaker. On success the response body is the
//! raw audio, which `speak` writes to disk and plays through the platform
//! player. Calls are synchronous from the caller's point of view: no
//! retry, no backoff, no request timeout.

use crate::lang::Language;
use crate::playback;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Production Dubverse endpoint base
pub const DEFAULT_BASE_URL: &str = "https://audio.dubverse.ai";

/// Speaker used when no per-language entry applies
pub const DEFAULT_SPEAKER_NO: u32 = 184;

/// Vendor speaker identifier for a language
pub fn speaker_no(lang: Language) -> u32 {
    match lang {
        Language::En => 184,
        Language::Hi => 182,
        Language::Mr => 190,
    }
}

/// TTS client errors
#[derive(Debug, Error)]
pub enum TtsError {
    /// No API key configured; voice rendering is unavailable
    #[error("Dubverse API key not found")]
    MissingApiKey,

    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Vendor returned a non-success response
    #[error("Dubverse API error {0}: {1}")]
    ApiError(u16, String),

    /// Failed to persist the rendered audio
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// TTS request body
#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
    speaker_no: u32,
    config: TtsRequestConfig,
}

/// Vendor request options
#[derive(Debug, Serialize)]
struct TtsRequestConfig {
    use_streaming_response: bool,
}

/// Dubverse API client
pub struct DubverseClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl DubverseClient {
    /// Create a client. A `None` key disables voice rendering: every call
    /// fails with [`TtsError::MissingApiKey`], which callers may treat as
    /// non-fatal.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    /// Point the client at a different endpoint base (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether a key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Render `text` with the given speaker; returns the raw audio bytes.
    pub async fn synthesize(&self, text: &str, speaker_no: u32) -> Result<Vec<u8>, TtsError> {
        let api_key = self.api_key.as_deref().ok_or(TtsError::MissingApiKey)?;

        let url = format!("{}/api/tts", self.base_url);
        let body = TtsRequest {
            text,
            speaker_no,
            config: TtsRequestConfig {
                use_streaming_response: false,
            },
        };

        tracing::debug!(url = %url, speaker_no, chars = text.len(), "Requesting TTS audio");

        let response = self
            .http_client
            .post(&url)
            .header("X-API-KEY", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TtsError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ApiError(status.as_u16(), error_text));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| TtsError::Network(e.to_string()))?;

        Ok(audio.to_vec())
    }

    /// Render advisory text in the given language, write the audio to
    /// `output_path` (overwritten each call), and play it locally.
    ///
    /// Playback problems are logged and do not fail the call; the audio
    /// file on disk is the durable result.
    pub async fn speak(
        &self,
        text: &str,
        lang: Language,
        output_path: &Path,
    ) -> Result<PathBuf, TtsError> {
        let audio = self.synthesize(text, speaker_no(lang)).await?;
        tokio::fs::write(output_path, &audio).await?;

        tracing::info!(
            file = %output_path.display(),
            bytes = audio.len(),
            lang = %lang,
            "Saved rendered advisory audio"
        );

        if let Err(e) = playback::play(output_path).await {
            tracing::warn!("Audio playback failed: {}", e);
        }

        Ok(output_path.to_path_buf())
    }
}
