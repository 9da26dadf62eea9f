//! Configuration loading
//!
//! Settings resolve per-field in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`AGROVOICE_*`; `DUBVERSE_API_KEY` for the key)
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Default HTTP bind address for the backend
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5780";

/// Default location of the exported classification model
pub const DEFAULT_MODEL_PATH: &str = "weights/best.onnx";

/// Default rendered-audio output file, overwritten on each TTS call
pub const DEFAULT_AUDIO_OUTPUT: &str = "response.wav";

/// Class labels in the exported model's index order
pub fn default_labels() -> Vec<String> {
    ["Black Rot", "Esca", "Healthy", "Leaf Blight"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Optional per-field values parsed from the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub bind_addr: Option<String>,
    pub model_path: Option<PathBuf>,
    pub labels: Option<Vec<String>>,
    pub audio_output: Option<PathBuf>,
}

/// Command-line overrides, populated by each binary's clap parser
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_addr: Option<String>,
    pub model_path: Option<PathBuf>,
    pub audio_output: Option<PathBuf>,
    /// Explicit config file path; skips the default search locations
    pub config_file: Option<PathBuf>,
}

/// Resolved process configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind address (backend only)
    pub bind_addr: String,
    /// Path to the exported ONNX classification model
    pub model_path: PathBuf,
    /// Class labels in model index order
    pub labels: Vec<String>,
    /// Rendered-audio output file
    pub audio_output: PathBuf,
    /// Dubverse API key; absent key disables voice rendering
    pub api_key: Option<String>,
}

impl Config {
    /// Resolve the full configuration from overrides, environment, config
    /// file, and defaults.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Config> {
        let file = load_config_file(overrides.config_file.as_deref())?;

        let bind_addr = overrides
            .bind_addr
            .or_else(|| std::env::var("AGROVOICE_BIND").ok())
            .or(file.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let model_path = overrides
            .model_path
            .or_else(|| std::env::var("AGROVOICE_MODEL").ok().map(PathBuf::from))
            .or(file.model_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));

        let audio_output = overrides
            .audio_output
            .or_else(|| std::env::var("AGROVOICE_AUDIO_OUT").ok().map(PathBuf::from))
            .or(file.audio_output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_AUDIO_OUTPUT));

        let labels = file.labels.unwrap_or_else(default_labels);
        if labels.is_empty() {
            return Err(Error::Config("Label list must not be empty".to_string()));
        }

        let api_key = std::env::var("DUBVERSE_API_KEY").ok().filter(|k| !k.is_empty());

        Ok(Config {
            bind_addr,
            model_path,
            labels,
            audio_output,
            api_key,
        })
    }
}

/// Load the TOML config file, or an empty section set when none exists.
///
/// An explicitly named file must exist and parse; a missing file at the
/// default search locations is not an error.
fn load_config_file(explicit: Option<&std::path::Path>) -> Result<ConfigFile> {
    let path = match explicit {
        Some(p) => {
            if !p.exists() {
                return Err(Error::Config(format!("Config file not found: {:?}", p)));
            }
            p.to_path_buf()
        }
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(ConfigFile::default()),
        },
    };

    let content = std::fs::read_to_string(&path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {:?}: {}", path, e)))
}

/// Default config file location for the platform
fn default_config_path() -> Option<PathBuf> {
    if cfg!(target_os = "linux") {
        // ~/.config/agrovoice/config.toml first, then /etc/agrovoice/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("agrovoice").join("config.toml"));
        if let Some(path) = user_config {
            if path.exists() {
                return Some(path);
            }
        }
        Some(PathBuf::from("/etc/agrovoice/config.toml"))
    } else {
        dirs::config_dir().map(|d| d.join("agrovoice").join("config.toml"))
    }
}
