//! Documentation source loaders

pub mod composite_loader;
pub mod file_loader;
pub mod http_loader;

pub use composite_loader::CompositeSourceLoader;
pub use file_loader::FileSourceLoader;
pub use http_loader::HttpSourceLoader;
