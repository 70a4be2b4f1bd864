//! Infrastructure layer - concrete implementations of domain ports

pub mod generation;
pub mod output;
pub mod source;
pub mod templates;

pub use output::FileSystemOutputService;
pub use source::{CompositeSourceLoader, FileSourceLoader, HttpSourceLoader};
