//! Common error types for AgroVoice

use thiserror::Error;

/// Common result type for AgroVoice operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across AgroVoice entry points
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Classifier inference error
    #[error(transparent)]
    Classifier(#[from] crate::classifier::ClassifierError),

    /// Voice rendering error
    #[error(transparent)]
    Tts(#[from] crate::tts::TtsError),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
