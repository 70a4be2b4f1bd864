//! Port interfaces for the generation domain
//!
//! Generation is pure computation, so these ports are synchronous.

use crate::generation::{
    ArtifactMap, ClientPlan, GenerationError, GenerationMetadata, RenderContext, Target,
};

/// Turns a language-neutral plan into target identifiers, types and literals
pub trait ContextBuilder: Send + Sync {
    /// Build a render context for template rendering
    fn build(
        &self,
        plan: &ClientPlan,
        metadata: &GenerationMetadata,
        target: Target,
    ) -> Result<RenderContext, GenerationError>;
}

/// Renders a target's template set against a render context
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, target: Target, context: &RenderContext)
    -> Result<ArtifactMap, GenerationError>;
}
