//! Error types for the normalization domain

use thiserror::Error;

/// Failures raised by the structured normalizers.
///
/// The heuristic normalizer never produces one of these.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid JSON document: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Document is neither valid JSON nor YAML: {0}")]
    InvalidDocument(String),

    #[error("Missing required field '{field}'")]
    MissingField { field: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Unable to resolve reference '{reference}'")]
    UnresolvedReference { reference: String },

    #[error("External reference '{reference}' is not supported")]
    ExternalReference { reference: String },

    #[error("Unknown input format: {0}")]
    UnknownFormat(String),
}

impl ParseError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
