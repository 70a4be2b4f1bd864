//! Target-specific context builders

mod common;
pub mod go;
pub mod python;
pub mod registry;
pub mod rust;
pub mod typescript;

pub use go::GoContextBuilder;
pub use python::PythonContextBuilder;
pub use registry::{CompositeContextBuilder, ContextBuilderRegistry};
pub use rust::RustContextBuilder;
pub use typescript::TypeScriptContextBuilder;
