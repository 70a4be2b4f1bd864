//! Tera-based template renderer implementation

use tera::Tera;

use crate::generation::{ArtifactMap, GenerationError, RenderContext, Target, TemplateRenderer};
use crate::infrastructure::templates::{Template, TemplateFileType, load_template};

/// Tera-based template renderer over the embedded template sets
pub struct TeraTemplateRenderer;

impl TeraTemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render an already loaded template set
    pub fn render_template(
        &self,
        template: &Template,
        context: &RenderContext,
    ) -> Result<ArtifactMap, GenerationError> {
        let mut tera = Tera::default();
        // Generated sources are not HTML
        tera.autoescape_on(vec![]);

        for file in &template.files {
            if matches!(file.file_type, TemplateFileType::Template { .. }) {
                tera.add_raw_template(&file.name, &file.content)
                    .map_err(|e| GenerationError::template(&file.name, &e))?;
            }
        }

        let mut artifacts = ArtifactMap::new();
        for file in &template.files {
            let rendered = match &file.file_type {
                TemplateFileType::Template {
                    for_each: Some(collection_key),
                } => self.render_for_each(&tera, &file.name, &file.path, context, collection_key)?,
                TemplateFileType::Template { for_each: None } => {
                    vec![self.render_single(&tera, &file.name, &file.path, context)?]
                }
                TemplateFileType::Static => {
                    vec![(file.path.clone(), file.content.clone())]
                }
            };

            for (path, content) in rendered {
                if artifacts.insert(path.clone(), content).is_some() {
                    return Err(GenerationError::RenderError(format!(
                        "Two templates rendered to the same path: {path}"
                    )));
                }
            }
        }

        Ok(artifacts)
    }

    fn render_single(
        &self,
        tera: &Tera,
        template_name: &str,
        original_path: &str,
        context: &RenderContext,
    ) -> Result<(String, String), GenerationError> {
        let tera_context = context.to_tera_context();

        let rendered = tera
            .render(template_name, &tera_context)
            .map_err(|e| GenerationError::template(template_name, &e))?;

        // Render the path as well (it might contain variables)
        let mut processed_path = original_path.to_string();
        if processed_path.contains("{endpoint}") {
            if let Some(endpoint_value) = context.get("endpoint").and_then(|v| v.as_str()) {
                processed_path = processed_path.replace("{endpoint}", endpoint_value);
            }
        }
        if processed_path.contains("{{") {
            processed_path = Tera::one_off(&processed_path, &tera_context, false)
                .map_err(|e| GenerationError::template(original_path, &e))?;
        }

        Ok((processed_path, rendered))
    }

    fn render_for_each(
        &self,
        tera: &Tera,
        template_name: &str,
        original_path: &str,
        context: &RenderContext,
        collection_key: &str,
    ) -> Result<Vec<(String, String)>, GenerationError> {
        // Get the collection from context
        let collection = context.get(collection_key).ok_or_else(|| {
            GenerationError::RenderError(format!(
                "Collection '{collection_key}' not found in context"
            ))
        })?;

        // Ensure it's an array
        let items = collection.as_array().ok_or_else(|| {
            GenerationError::RenderError(format!("Collection '{collection_key}' is not an array"))
        })?;

        // Handle empty collections gracefully
        if items.is_empty() {
            tracing::debug!(
                collection = collection_key,
                "Collection is empty, no files will be generated"
            );
            return Ok(Vec::new());
        }

        let mut artifacts = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let mut item_context = context.clone();
            item_context.add_variable("item", item.clone());
            item_context.add_variable("index", serde_json::json!(index));

            // The item's file stem fills `{endpoint}` in the destination path
            let endpoint_name = item
                .get("endpoint")
                .or_else(|| item.get("method_name"))
                .or_else(|| item.get("operation_id"))
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            item_context.add_variable("endpoint", serde_json::json!(endpoint_name));

            artifacts.push(self.render_single(tera, template_name, original_path, &item_context)?);
        }

        Ok(artifacts)
    }
}

impl Default for TeraTemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for TeraTemplateRenderer {
    fn render(
        &self,
        target: Target,
        context: &RenderContext,
    ) -> Result<ArtifactMap, GenerationError> {
        let template = load_template(target)?;
        self.render_template(&template, context)
    }
}
