//! Registry for target-specific context builders

use std::collections::HashMap;
use std::sync::Arc;

use crate::generation::{
    ClientPlan, ContextBuilder, GenerationError, GenerationMetadata, RenderContext, Target,
};

/// Registry that manages target-specific context builders
pub struct ContextBuilderRegistry {
    builders: HashMap<Target, Arc<dyn ContextBuilder>>,
}

impl ContextBuilderRegistry {
    /// Create a new registry with default builders
    pub fn new() -> Self {
        let mut builders = HashMap::new();

        // Register default builders
        builders.insert(
            Target::Python,
            Arc::new(super::PythonContextBuilder::new()) as Arc<dyn ContextBuilder>,
        );
        builders.insert(
            Target::TypeScript,
            Arc::new(super::TypeScriptContextBuilder::new()) as Arc<dyn ContextBuilder>,
        );
        builders.insert(
            Target::Go,
            Arc::new(super::GoContextBuilder::new()) as Arc<dyn ContextBuilder>,
        );
        builders.insert(
            Target::Rust,
            Arc::new(super::RustContextBuilder::new()) as Arc<dyn ContextBuilder>,
        );

        Self { builders }
    }

    /// Register a custom builder for a target
    pub fn register(&mut self, target: Target, builder: Arc<dyn ContextBuilder>) {
        self.builders.insert(target, builder);
    }

    /// Get a builder for a specific target
    pub fn get(&self, target: Target) -> Result<Arc<dyn ContextBuilder>, GenerationError> {
        self.builders
            .get(&target)
            .cloned()
            .ok_or_else(|| GenerationError::UnsupportedTarget(target.to_string()))
    }

    /// Check if a target has a registered builder
    pub fn has_builder(&self, target: Target) -> bool {
        self.builders.contains_key(&target)
    }

    /// Get all supported targets, in declaration order
    pub fn supported_targets(&self) -> Vec<Target> {
        Target::all()
            .iter()
            .copied()
            .filter(|t| self.has_builder(*t))
            .collect()
    }
}

impl Default for ContextBuilderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Composite context builder that delegates to target-specific builders
pub struct CompositeContextBuilder {
    registry: Arc<ContextBuilderRegistry>,
}

impl CompositeContextBuilder {
    pub fn new(registry: Arc<ContextBuilderRegistry>) -> Self {
        Self { registry }
    }
}

impl Default for CompositeContextBuilder {
    fn default() -> Self {
        Self::new(Arc::new(ContextBuilderRegistry::default()))
    }
}

impl ContextBuilder for CompositeContextBuilder {
    fn build(
        &self,
        plan: &ClientPlan,
        metadata: &GenerationMetadata,
        target: Target,
    ) -> Result<RenderContext, GenerationError> {
        tracing::debug!(
            target = %target,
            endpoints = plan.endpoints.len(),
            "CompositeContextBuilder selecting builder"
        );
        let builder = self.registry.get(target)?;
        builder.build(plan, metadata, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ApiDescription;

    #[test]
    fn test_registry_default_builders() {
        let registry = ContextBuilderRegistry::new();

        for target in Target::all() {
            assert!(registry.has_builder(*target));
        }
        assert_eq!(registry.supported_targets(), Target::all().to_vec());
    }

    #[test]
    fn test_composite_builder() {
        let composite = CompositeContextBuilder::default();
        let api = ApiDescription::default();
        let plan = ClientPlan::from_api(&api);
        let metadata = GenerationMetadata::for_api(&api);

        for target in Target::all() {
            let context = composite.build(&plan, &metadata, *target).unwrap();
            assert_eq!(context.get("target"), Some(&serde_json::json!(target.to_string())));
        }
    }
}
