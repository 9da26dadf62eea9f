//! # AgroVoice Common Library
//!
//! Shared code for the AgroVoice entry points (HTTP backend and console
//! flow) including:
//! - Language codes and keyword matching
//! - Disease advisory lookup table
//! - Disease classifier adapter (ONNX inference)
//! - Dubverse TTS client and speaker-id table
//! - Local audio playback
//! - Configuration loading

pub mod advisory;
pub mod classifier;
pub mod config;
pub mod error;
pub mod lang;
pub mod playback;
pub mod tts;

pub use error::{Error, Result};
pub use lang::Language;
