//! Embedded template sets, one per target

pub mod embedded;
pub mod errors;
pub mod manifest;
pub mod types;

pub use embedded::{embedded_paths, embedded_source, load_template};
pub use errors::*;
pub use types::*;
