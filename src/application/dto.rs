//! Data Transfer Objects for application layer

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::ValidationError;
use crate::generation::{GenerationMetadata, Target};
use crate::normalization::InputFormat;

/// Request to generate a client library project
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateClientRequest {
    /// File path or http(s) URL of the documentation
    pub input: String,
    pub format: InputFormat,
    pub target: Target,
    /// Defaults to a name derived from the API title
    pub project_name: Option<String>,
    pub output_dir: PathBuf,
    /// Replaces the base URL found in the documentation
    pub base_url: Option<String>,
}

impl GenerateClientRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_input(&self.input)?;

        if let Some(name) = &self.project_name {
            if name.is_empty() {
                return Err(ValidationError::EmptyProjectName);
            }
            crate::generation::rules::validate_project_name(name)
                .map_err(|e| ValidationError::InvalidProjectName(e.to_string()))?;
        }

        if let Some(base_url) = &self.base_url {
            let parsed = url::Url::parse(base_url)
                .map_err(|e| ValidationError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ValidationError::InvalidBaseUrl(format!(
                    "{base_url}: scheme must be http or https"
                )));
            }
        }

        Ok(())
    }
}

/// Response from client generation
#[derive(Debug, Clone, Serialize)]
pub struct GenerateClientResponse {
    pub target: Target,
    pub artifacts_count: usize,
    pub endpoint_count: usize,
    pub output_path: PathBuf,
    pub metadata: GenerationMetadata,
}

/// Request to print the canonical model of a document
#[derive(Debug, Clone, Deserialize)]
pub struct InspectRequest {
    pub input: String,
    pub format: InputFormat,
}

impl InspectRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_input(&self.input)
    }
}

fn validate_input(input: &str) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::MissingField("input".to_string()));
    }
    Ok(())
}
