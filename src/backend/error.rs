//! Backend error types

use crate::model::MenuError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    /// The service could not be reached (connect failure, timeout).
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The service answered with a failure.
    #[error("Backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The service answered with something we cannot read.
    #[error("Malformed backend response: {0}")]
    Decode(String),

    /// The request was refused before being sent.
    #[error("Invalid request: {0}")]
    Invalid(String),
}

impl BackendError {
    pub fn missing(field: &str) -> Self {
        BackendError::Invalid(format!("{field} is required"))
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else {
            BackendError::Unavailable(e.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        BackendError::Decode(e.to_string())
    }
}

impl From<MenuError> for BackendError {
    fn from(e: MenuError) -> Self {
        BackendError::Decode(e.to_string())
    }
}
