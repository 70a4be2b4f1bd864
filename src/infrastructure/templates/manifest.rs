//! Manifest parsing for embedded template sets
//!
//! Each target directory carries a `manifest.yml` naming its files, where
//! each one lands, and which ones render once per endpoint.

use serde::{Deserialize, Serialize};

use crate::infrastructure::templates::{
    ManifestFile, TemplateError, TemplateFileType, TemplateManifest,
};

/// Internal representation matching the manifest YAML structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ManifestData {
    /// The name of the template set
    pub name: String,
    /// A short description of what the template set generates
    pub description: String,
    /// The version of the template set (should follow semantic versioning)
    pub version: String,
    /// The target language (e.g., "rust", "typescript")
    pub target: String,
    /// List of files to generate
    pub files: Vec<ManifestFileData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ManifestFileData {
    /// Path to the template file, relative to the templates root
    pub source: String,
    /// Destination path for the generated file, relative to the project root
    pub destination: String,
    /// Optional context collection to render once per item (e.g., "endpoints")
    #[serde(default)]
    pub for_each: Option<String>,
}

impl ManifestData {
    /// Convert the raw manifest data into the domain model
    pub fn into_domain_model(self) -> TemplateManifest {
        TemplateManifest {
            name: self.name,
            version: self.version,
            description: Some(self.description),
            target: self.target,
            files: self
                .files
                .into_iter()
                .map(|f| ManifestFile {
                    file_type: determine_file_type(&f.source, f.for_each),
                    source: f.source,
                    target: f.destination,
                })
                .collect(),
        }
    }
}

/// Parse manifest YAML content into the domain model
pub fn parse_manifest_yaml(content: &str) -> Result<TemplateManifest, TemplateError> {
    let manifest_data: ManifestData = serde_yaml::from_str(content)?;
    if manifest_data.files.is_empty() {
        return Err(TemplateError::invalid_manifest(format!(
            "manifest '{}' lists no files",
            manifest_data.name
        )));
    }
    Ok(manifest_data.into_domain_model())
}

/// Determine the file type based on extension and for_each directive
fn determine_file_type(source: &str, for_each: Option<String>) -> TemplateFileType {
    if source.ends_with(".tera") {
        TemplateFileType::Template { for_each }
    } else {
        TemplateFileType::Static
    }
}
