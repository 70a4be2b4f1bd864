//! Use case for printing the canonical model of a document

use std::sync::Arc;

use crate::application::{ApplicationError, InspectRequest, SourceLoader};
use crate::core::ApiDescription;
use crate::normalization;

pub struct InspectUseCase {
    source_loader: Arc<dyn SourceLoader>,
}

impl InspectUseCase {
    pub fn new(source_loader: Arc<dyn SourceLoader>) -> Self {
        Self { source_loader }
    }

    pub async fn execute(&self, request: InspectRequest) -> Result<ApiDescription, ApplicationError> {
        request.validate()?;
        let raw = self.source_loader.load(&request.input).await?;
        Ok(normalization::parse(request.format, &raw)?)
    }
}
