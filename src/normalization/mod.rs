//! Normalization domain - turns API documentation into the canonical model
//!
//! Each input dialect has one [`Normalizer`] implementation. Callers pick the
//! implementation with an explicit [`InputFormat`] tag; the content itself is
//! never sniffed to decide which parser runs.

pub mod errors;
pub mod html;
pub mod openapi;
pub mod postman;
pub mod sketch;

pub use errors::*;
pub use html::HtmlNormalizer;
pub use openapi::OpenApiNormalizer;
pub use postman::PostmanNormalizer;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::ApiDescription;

/// Converts raw documentation text into the canonical model
pub trait Normalizer: Send + Sync {
    /// Format this normalizer understands
    fn format(&self) -> InputFormat;

    /// Parse `raw` into a finalized [`ApiDescription`]
    fn normalize(&self, raw: &str) -> Result<ApiDescription, ParseError>;
}

/// Supported documentation dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// OpenAPI 3.x or Swagger 2.0, JSON or YAML
    OpenApi,
    /// Postman collection (v2.x)
    Postman,
    /// Free-form HTML documentation
    Html,
}

impl InputFormat {
    pub fn all() -> &'static [InputFormat] {
        &[InputFormat::OpenApi, InputFormat::Postman, InputFormat::Html]
    }

    /// Structured formats fail on malformed input; the heuristic one never does
    pub fn is_structured(&self) -> bool {
        !matches!(self, InputFormat::Html)
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::OpenApi => write!(f, "openapi"),
            InputFormat::Postman => write!(f, "postman"),
            InputFormat::Html => write!(f, "html"),
        }
    }
}

impl FromStr for InputFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openapi" | "swagger" | "structured-openapi" => Ok(InputFormat::OpenApi),
            "postman" | "structured-postman" => Ok(InputFormat::Postman),
            "html" | "heuristic-html" => Ok(InputFormat::Html),
            _ => Err(ParseError::UnknownFormat(s.to_string())),
        }
    }
}

/// Returns the normalizer for `format`
pub fn normalizer_for(format: InputFormat) -> Box<dyn Normalizer> {
    match format {
        InputFormat::OpenApi => Box::new(OpenApiNormalizer::new()),
        InputFormat::Postman => Box::new(PostmanNormalizer::new()),
        InputFormat::Html => Box::new(HtmlNormalizer::new()),
    }
}

/// Parse entry point: `parse(format, raw) -> ApiDescription | ParseError`
pub fn parse(format: InputFormat, raw: &str) -> Result<ApiDescription, ParseError> {
    let api = normalizer_for(format).normalize(raw)?;
    tracing::info!(
        format = %format,
        endpoints = api.endpoints.len(),
        auth = api.auth_method.kind(),
        "Normalized API documentation"
    );
    Ok(api)
}
