//! Generation domain module - turns the canonical model into client projects
//!
//! A generation run plans the client once ([`ClientPlan`]), lets a per-target
//! [`ContextBuilder`] decide identifiers, types and literals, and renders the
//! target's templates into an [`ArtifactMap`].

pub mod context;
pub mod defaults;
pub mod errors;
pub mod orchestrator;
pub mod plan;
pub mod rules;
pub mod sanitizers;
pub mod traits;
pub mod types;

pub use context::*;
pub use defaults::{CLIENT_DEFAULTS, ClientDefaults};
pub use errors::*;
pub use orchestrator::*;
pub use plan::*;
pub use traits::*;
pub use types::*;
