//! Error types for the template infrastructure layer

use thiserror::Error;

use crate::generation::GenerationError;

/// Errors that can occur while loading embedded templates
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template not found at the specified path
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Invalid manifest file or format
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// Embedded source is not UTF-8
    #[error("Template is not valid UTF-8: {0}")]
    InvalidEncoding(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl TemplateError {
    /// Create a new template not found error with path
    pub fn not_found<S: Into<String>>(path: S) -> Self {
        Self::TemplateNotFound(path.into())
    }

    /// Create a new invalid manifest error
    pub fn invalid_manifest<S: Into<String>>(message: S) -> Self {
        Self::InvalidManifest(message.into())
    }
}

impl From<TemplateError> for GenerationError {
    fn from(err: TemplateError) -> Self {
        GenerationError::InvalidConfiguration(err.to_string())
    }
}
