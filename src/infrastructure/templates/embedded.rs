//! Template sets compiled into the binary
//!
//! Sources live under `templates/` at the crate root. Generation never reads
//! the filesystem, so two runs over the same model always see the same
//! templates.

use rust_embed::RustEmbed;

use crate::generation::Target;
use crate::infrastructure::templates::{
    Template, TemplateError, TemplateFile, manifest::parse_manifest_yaml,
};

/// Every template source below `templates/`, embedded at compile time
#[derive(RustEmbed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Looks up an embedded source by its path below `templates/`
pub fn embedded_source(path: &str) -> Result<String, TemplateError> {
    let file = EmbeddedTemplates::get(path).ok_or_else(|| TemplateError::not_found(path))?;
    String::from_utf8(file.data.into_owned())
        .map_err(|_| TemplateError::InvalidEncoding(path.to_string()))
}

/// Paths of every embedded source, sorted
pub fn embedded_paths() -> Vec<String> {
    let mut paths: Vec<String> = EmbeddedTemplates::iter().map(|p| p.into_owned()).collect();
    paths.sort();
    paths
}

/// Loads the template set for `target`, resolving every manifest entry
pub fn load_template(target: Target) -> Result<Template, TemplateError> {
    let manifest_path = format!("{target}/manifest.yml");
    let manifest_yaml = embedded_source(&manifest_path)?;
    let manifest = parse_manifest_yaml(&manifest_yaml)?;

    if manifest.target != target.to_string() {
        return Err(TemplateError::invalid_manifest(format!(
            "{manifest_path} declares target '{}'",
            manifest.target
        )));
    }

    let files = manifest
        .files
        .iter()
        .map(|file| {
            let content = embedded_source(&file.source)?;
            Ok(TemplateFile {
                name: file.source.clone(),
                path: file.target.clone(),
                content,
                file_type: file.file_type.clone(),
            })
        })
        .collect::<Result<Vec<_>, TemplateError>>()?;

    tracing::debug!(target = %target, files = files.len(), "Loaded embedded template set");

    Ok(Template {
        target,
        manifest,
        files,
    })
}
