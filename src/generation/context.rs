//! Generation context - what a generation run knows besides the API itself

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::core::utils::to_snake_case;
use crate::core::ApiDescription;
use crate::generation::{GenerationError, Target, rules};

/// Metadata about the generated project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub project_name: String,
    pub version: String,
    pub description: Option<String>,
    pub license: Option<String>,
}

impl Default for GenerationMetadata {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            version: "0.1.0".to_string(),
            description: None,
            license: Some("MIT".to_string()),
        }
    }
}

impl GenerationMetadata {
    /// Metadata derived from the API title: `Pet Store` becomes `pet-store-client`
    pub fn for_api(api: &ApiDescription) -> Self {
        // Project names are ASCII; other characters are dropped from each word
        let stem = to_snake_case(&api.title)
            .split('_')
            .map(|word| {
                word.chars()
                    .filter(char::is_ascii_alphanumeric)
                    .collect::<String>()
                    .to_ascii_lowercase()
            })
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        let project_name = if stem.is_empty() || !stem.starts_with(|c: char| c.is_ascii_alphabetic()) {
            "api-client".to_string()
        } else if stem.ends_with("-client") {
            stem
        } else {
            format!("{stem}-client")
        };
        Self {
            project_name,
            description: Some(format!("Client library for {}", api.title)),
            ..Default::default()
        }
    }
}

/// The aggregate flowing through one generation run
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub target: Target,
    pub api: ApiDescription,
    pub metadata: GenerationMetadata,
}

impl GenerationContext {
    pub fn new(api: ApiDescription, target: Target) -> Self {
        let metadata = GenerationMetadata::for_api(&api);
        Self {
            target,
            api,
            metadata,
        }
    }

    pub fn with_metadata(mut self, metadata: GenerationMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Validate the context has all required data
    pub fn validate(&self) -> Result<(), GenerationError> {
        rules::validate_project_name(&self.metadata.project_name)?;
        rules::validate_version(&self.metadata.version)?;
        Ok(())
    }
}

/// Variables handed to the template engine
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub variables: BTreeMap<String, JsonValue>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable to the render context
    pub fn add_variable(&mut self, key: &str, value: JsonValue) {
        self.variables.insert(key.to_string(), value);
    }

    pub fn has_variable(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.variables.get(key)
    }

    pub fn to_tera_context(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (key, value) in &self.variables {
            context.insert(key.as_str(), value);
        }
        context
    }
}
