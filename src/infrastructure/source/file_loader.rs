//! File-based documentation loader

use async_trait::async_trait;
use tokio::fs;

use crate::application::{ApplicationError, SourceLoader};

/// Loads documentation from local files
pub struct FileSourceLoader;

impl FileSourceLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceLoader for FileSourceLoader {
    async fn load(&self, source: &str) -> Result<String, ApplicationError> {
        let path = source.strip_prefix("file://").unwrap_or(source);
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ApplicationError::load(source, e.to_string()))?;
        tracing::debug!(source, bytes = content.len(), "Read documentation file");
        Ok(content)
    }
}
