//! Error handling for the textforge library.
//!
//! This module defines the crate-wide error type [`Error`] along with a
//! convenient [`Result`] alias. Errors fall into two tiers: structural
//! errors in the input data (malformed generation document or item,
//! unsupported record shape), which the caller can diagnose and fix, and
//! render-time contract violations ([`RenderError`]), which abort the
//! generation run as a whole.

use thiserror::Error;

use crate::engine::RenderError;
use crate::record::UnsupportedRecordShape;

/// Result type for textforge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for textforge operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template engine error
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// The generation document is not an object or is missing the `data` array
    #[error("malformed generation document: {0}")]
    MalformedDocument(String),

    /// One element of the `data` array violates the generation item contract
    #[error("malformed generation item {index}: {reason}")]
    MalformedItem { index: usize, reason: String },

    /// A value could not be adapted to a key/value view
    #[error(transparent)]
    Shape(#[from] UnsupportedRecordShape),

    /// Fatal render-time contract violation
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new malformed-document error
    pub fn document<S: Into<String>>(msg: S) -> Self {
        Self::MalformedDocument(msg.into())
    }

    /// Create a new malformed-item error for the element at `index`
    pub fn item<S: Into<String>>(index: usize, reason: S) -> Self {
        Self::MalformedItem {
            index,
            reason: reason.into(),
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Config(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Config(s)
    }
}
