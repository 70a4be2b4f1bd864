//! Core template types for the infrastructure layer

use crate::generation::Target;

/// A complete template set for one target, with its file sources resolved
#[derive(Debug, Clone)]
pub struct Template {
    pub target: Target,
    pub manifest: TemplateManifest,
    pub files: Vec<TemplateFile>,
}

/// Parsed `manifest.yml`
#[derive(Debug, Clone, Default)]
pub struct TemplateManifest {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub target: String,
    pub files: Vec<ManifestFile>,
}

/// File entry in manifest
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestFile {
    /// Source path relative to the templates root
    pub source: String,
    /// Destination path; may hold `{{ var }}` and `{endpoint}` placeholders
    pub target: String,
    pub file_type: TemplateFileType,
}

/// Type of template file
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateFileType {
    /// Rendered with Tera, once or once per item of a context collection
    Template { for_each: Option<String> },
    /// Copied verbatim
    Static,
}

/// A single template file with its destination and content
#[derive(Debug, Clone)]
pub struct TemplateFile {
    /// Name Tera registers the source under (its path below the templates root)
    pub name: String,
    /// Destination path template
    pub path: String,
    pub content: String,
    pub file_type: TemplateFileType,
}
