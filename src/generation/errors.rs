//! Error types for the generation domain

use thiserror::Error;

/// Errors that can occur during code generation.
///
/// A well-formed model and a supported target always generate; these surface
/// caller mistakes (unknown target, bad project name) or broken templates.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unsupported target: {0}")]
    UnsupportedTarget(String),

    #[error("Template error in '{template}': {message}")]
    TemplateError { template: String, message: String },

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl GenerationError {
    /// Flattens a Tera error chain into one message
    pub fn template(template: impl Into<String>, err: &tera::Error) -> Self {
        let mut message = err.to_string();
        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::TemplateError {
            template: template.into(),
            message,
        }
    }
}
