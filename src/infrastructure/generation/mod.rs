//! Generation infrastructure implementations

pub mod context_builders;
pub mod engine;
pub mod template_renderer;

pub use context_builders::*;
pub use engine::{default_orchestrator, generate};
pub use template_renderer::TeraTemplateRenderer;
