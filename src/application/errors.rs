//! Application layer error types

use thiserror::Error;

/// Application layer errors
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Parse error: {0}")]
    ParseError(#[from] crate::normalization::ParseError),

    #[error("Generation error: {0}")]
    GenerationError(#[from] crate::generation::GenerationError),

    #[error("Credential error: {0}")]
    ContractError(#[from] crate::core::contract::ContractError),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Failed to load {location}: {message}")]
    LoadError { location: String, message: String },

    #[error("Output error: {0}")]
    OutputError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ApplicationError {
    pub fn load(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LoadError {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// Validation errors for requests
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Project name cannot be empty")]
    EmptyProjectName,

    #[error("Invalid project name: {0}")]
    InvalidProjectName(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
