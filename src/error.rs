//! Error types for voicebatch

use crate::license::LicenseError;
use crate::message::TemplateError;
use std::io;
use thiserror::Error;

/// Main error type for voicebatch
#[derive(Error, Debug)]
pub enum VoiceBatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("License error: {0}")]
    License(#[from] LicenseError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Input list error: {0}")]
    Input(String),

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Text generation error: {0}")]
    Generation(String),

    #[error("Provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for voicebatch operations
pub type Result<T> = std::result::Result<T, VoiceBatchError>;

impl VoiceBatchError {
    /// Build a provider error from a non-success response, keeping only the
    /// head of the body so diagnostics stay on one screen.
    pub fn provider(status: u16, body: &str) -> Self {
        let body: String = body.chars().take(300).collect();
        VoiceBatchError::Provider {
            status,
            body: body.trim().to_string(),
        }
    }
}

impl From<serde_json::Error> for VoiceBatchError {
    fn from(e: serde_json::Error) -> Self {
        VoiceBatchError::Config(format!("JSON error: {}", e))
    }
}

impl From<serde_yaml::Error> for VoiceBatchError {
    fn from(e: serde_yaml::Error) -> Self {
        VoiceBatchError::Config(format!("YAML error: {}", e))
    }
}
