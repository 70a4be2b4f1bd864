//! Generation orchestration - coordinates the generation workflow

use std::sync::Arc;

use crate::generation::{
    ClientPlan, ContextBuilder, GenerationContext, GenerationError, GenerationResult,
    TemplateRenderer,
};

/// Orchestrates plan -> context -> render for one target
pub struct GenerationOrchestrator {
    context_builder: Arc<dyn ContextBuilder>,
    template_renderer: Arc<dyn TemplateRenderer>,
}

impl GenerationOrchestrator {
    pub fn new(
        context_builder: Arc<dyn ContextBuilder>,
        template_renderer: Arc<dyn TemplateRenderer>,
    ) -> Self {
        Self {
            context_builder,
            template_renderer,
        }
    }

    /// Execute the generation workflow
    pub fn generate(&self, context: GenerationContext) -> Result<GenerationResult, GenerationError> {
        // 1. Validate context
        context.validate()?;

        // 2. Decide everything target-independent once
        let plan = ClientPlan::from_api(&context.api);
        tracing::debug!(
            target = %context.target,
            endpoints = plan.endpoints.len(),
            "Planned client"
        );

        // 3. Build render context for the target
        let render_context = self
            .context_builder
            .build(&plan, &context.metadata, context.target)?;

        // 4. Render templates to artifacts
        let artifacts = self
            .template_renderer
            .render(context.target, &render_context)?;

        tracing::info!(
            target = %context.target,
            project = %context.metadata.project_name,
            files = artifacts.len(),
            "Generated client project"
        );

        Ok(GenerationResult {
            target: context.target,
            artifacts,
            metadata: context.metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ApiDescription;
    use crate::generation::{ArtifactMap, GenerationMetadata, RenderContext, Target};
    use serde_json::json;

    struct EchoContextBuilder;
    struct EchoRenderer;

    impl ContextBuilder for EchoContextBuilder {
        fn build(
            &self,
            plan: &ClientPlan,
            metadata: &GenerationMetadata,
            _target: Target,
        ) -> Result<RenderContext, GenerationError> {
            let mut context = RenderContext::new();
            context.add_variable("project_name", json!(metadata.project_name));
            context.add_variable("endpoint_count", json!(plan.endpoints.len()));
            Ok(context)
        }
    }

    impl TemplateRenderer for EchoRenderer {
        fn render(
            &self,
            target: Target,
            context: &RenderContext,
        ) -> Result<ArtifactMap, GenerationError> {
            let mut artifacts = ArtifactMap::new();
            artifacts.insert(
                format!("{target}.txt"),
                context
                    .get("project_name")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
            );
            Ok(artifacts)
        }
    }

    #[test]
    fn test_orchestrator_workflow() {
        let orchestrator =
            GenerationOrchestrator::new(Arc::new(EchoContextBuilder), Arc::new(EchoRenderer));
        let api = ApiDescription {
            title: "Pets".to_string(),
            ..Default::default()
        };

        let result = orchestrator
            .generate(GenerationContext::new(api, Target::Go))
            .unwrap();
        assert_eq!(result.target, Target::Go);
        assert_eq!(result.artifacts["go.txt"], "pets-client");
    }

    #[test]
    fn test_orchestrator_rejects_invalid_metadata() {
        let orchestrator =
            GenerationOrchestrator::new(Arc::new(EchoContextBuilder), Arc::new(EchoRenderer));
        let context = GenerationContext::new(ApiDescription::default(), Target::Rust).with_metadata(
            GenerationMetadata {
                project_name: String::new(),
                ..Default::default()
            },
        );
        assert!(matches!(
            orchestrator.generate(context),
            Err(GenerationError::ValidationError(_))
        ));
    }
}
