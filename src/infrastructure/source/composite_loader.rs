//! Composite loader that dispatches on the source's scheme

use async_trait::async_trait;

use crate::application::{ApplicationError, SourceLoader};
use crate::infrastructure::source::{FileSourceLoader, HttpSourceLoader};

/// Sends URLs to the HTTP loader and everything else to the file loader
pub struct CompositeSourceLoader {
    http: HttpSourceLoader,
    file: FileSourceLoader,
}

impl CompositeSourceLoader {
    pub fn new() -> Self {
        Self::with_http(HttpSourceLoader::new())
    }

    /// Uses a preconfigured HTTP loader (credentials, retry policy)
    pub fn with_http(http: HttpSourceLoader) -> Self {
        Self {
            http,
            file: FileSourceLoader::new(),
        }
    }
}

impl Default for CompositeSourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceLoader for CompositeSourceLoader {
    async fn load(&self, source: &str) -> Result<String, ApplicationError> {
        if source.starts_with("http://") || source.starts_with("https://") {
            tracing::debug!(source, "Using HTTP loader");
            self.http.load(source).await
        } else {
            tracing::debug!(source, "Using file loader");
            self.file.load(source).await
        }
    }
}
