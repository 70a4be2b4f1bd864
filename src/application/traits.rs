//! Port interfaces for the application layer

use async_trait::async_trait;
use std::path::Path;

use crate::application::ApplicationError;
use crate::generation::Artifact;

/// Fetches raw documentation text from wherever `source` points
#[async_trait]
pub trait SourceLoader: Send + Sync {
    async fn load(&self, source: &str) -> Result<String, ApplicationError>;
}

/// Service for writing generated artifacts to the output destination
#[async_trait]
pub trait OutputService: Send + Sync {
    /// Write all artifacts to the output destination
    async fn write_artifacts(&self, artifacts: &[Artifact]) -> Result<(), ApplicationError>;

    /// Ensure a directory exists
    async fn ensure_directory(&self, path: &Path) -> Result<(), ApplicationError>;
}
