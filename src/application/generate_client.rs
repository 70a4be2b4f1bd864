//! Use case for generating client libraries

use std::sync::Arc;

use crate::application::{
    ApplicationError, GenerateClientRequest, GenerateClientResponse, OutputService, SourceLoader,
};
use crate::generation::{Artifact, GenerationContext, GenerationOrchestrator};
use crate::normalization;

/// Use case for generating client libraries
pub struct GenerateClientUseCase {
    source_loader: Arc<dyn SourceLoader>,
    generation_orchestrator: Arc<GenerationOrchestrator>,
    output_service: Arc<dyn OutputService>,
}

impl GenerateClientUseCase {
    pub fn new(
        source_loader: Arc<dyn SourceLoader>,
        generation_orchestrator: Arc<GenerationOrchestrator>,
        output_service: Arc<dyn OutputService>,
    ) -> Self {
        Self {
            source_loader,
            generation_orchestrator,
            output_service,
        }
    }

    pub async fn execute(
        &self,
        request: GenerateClientRequest,
    ) -> Result<GenerateClientResponse, ApplicationError> {
        // 1. Validate request
        request.validate()?;

        // 2. Load and normalize the documentation
        let raw = self.source_loader.load(&request.input).await?;
        let mut api = normalization::parse(request.format, &raw)?;

        if let Some(base_url) = &request.base_url {
            api.base_url = base_url.trim_end_matches('/').to_string();
        }
        let endpoint_count = api.endpoints.len();

        // 3. Build generation context
        let mut context = GenerationContext::new(api, request.target);
        if let Some(project_name) = &request.project_name {
            context.metadata.project_name = project_name.clone();
        }

        // 4. Generate code
        let result = self.generation_orchestrator.generate(context)?;

        // 5. Place artifacts under the output directory and write them
        self.output_service
            .ensure_directory(&request.output_dir)
            .await?;
        let artifacts = Artifact::place_all(&request.output_dir, &result.artifacts);
        self.output_service.write_artifacts(&artifacts).await?;

        tracing::info!(
            target = %result.target,
            artifacts = artifacts.len(),
            output = %request.output_dir.display(),
            "Wrote client project"
        );

        Ok(GenerateClientResponse {
            target: result.target,
            artifacts_count: artifacts.len(),
            endpoint_count,
            output_path: request.output_dir,
            metadata: result.metadata,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::generation::Target;
    use crate::infrastructure::generation::default_orchestrator;
    use crate::normalization::InputFormat;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    pub(crate) const PETS: &str = r#"{"openapi":"3.0.0","info":{"title":"Pets","version":"1.0"},"paths":{"/pets/{id}":{"get":{"operationId":"getPet","parameters":[{"name":"id","in":"path","required":true,"schema":{"type":"string"}}]}}}}"#;

    pub(crate) struct StaticSourceLoader(pub &'static str);

    #[async_trait]
    impl SourceLoader for StaticSourceLoader {
        async fn load(&self, _source: &str) -> Result<String, ApplicationError> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Default)]
    struct RecordingOutputService {
        written: Mutex<Vec<Artifact>>,
    }

    #[async_trait]
    impl OutputService for RecordingOutputService {
        async fn write_artifacts(&self, artifacts: &[Artifact]) -> Result<(), ApplicationError> {
            self.written.lock().unwrap().extend_from_slice(artifacts);
            Ok(())
        }

        async fn ensure_directory(&self, _path: &Path) -> Result<(), ApplicationError> {
            Ok(())
        }
    }

    fn request(target: Target) -> GenerateClientRequest {
        GenerateClientRequest {
            input: "pets.json".to_string(),
            format: InputFormat::OpenApi,
            target,
            project_name: None,
            output_dir: PathBuf::from("/output"),
            base_url: None,
        }
    }

    #[tokio::test]
    async fn test_execute_success() {
        let output = Arc::new(RecordingOutputService::default());
        let use_case = GenerateClientUseCase::new(
            Arc::new(StaticSourceLoader(PETS)),
            Arc::new(default_orchestrator()),
            output.clone(),
        );

        let response = use_case.execute(request(Target::Rust)).await.unwrap();
        assert_eq!(response.endpoint_count, 1);
        assert_eq!(response.metadata.project_name, "pets-client");
        assert_eq!(response.output_path, PathBuf::from("/output"));

        let written = output.written.lock().unwrap();
        assert_eq!(written.len(), response.artifacts_count);
        assert!(written.iter().all(|a| a.path.starts_with("/output")));
        assert!(
            written
                .iter()
                .any(|a| a.path == Path::new("/output").join("tests").join("get_pet.rs"))
        );
    }

    #[tokio::test]
    async fn test_execute_applies_overrides() {
        let output = Arc::new(RecordingOutputService::default());
        let use_case = GenerateClientUseCase::new(
            Arc::new(StaticSourceLoader(PETS)),
            Arc::new(default_orchestrator()),
            output.clone(),
        );

        let mut req = request(Target::Python);
        req.project_name = Some("petstore".to_string());
        req.base_url = Some("https://staging.pets.test/".to_string());
        let response = use_case.execute(req).await.unwrap();
        assert_eq!(response.metadata.project_name, "petstore");

        let written = output.written.lock().unwrap();
        let config = written
            .iter()
            .find(|a| a.path.ends_with("config.py"))
            .unwrap();
        assert!(config.content.contains("\"https://staging.pets.test\""));
    }

    #[tokio::test]
    async fn test_execute_rejects_invalid_request() {
        let use_case = GenerateClientUseCase::new(
            Arc::new(StaticSourceLoader(PETS)),
            Arc::new(default_orchestrator()),
            Arc::new(RecordingOutputService::default()),
        );

        let mut req = request(Target::Go);
        req.project_name = Some("1pets".to_string());
        assert!(matches!(
            use_case.execute(req).await,
            Err(ApplicationError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_surfaces_parse_failures() {
        let use_case = GenerateClientUseCase::new(
            Arc::new(StaticSourceLoader("{not json")),
            Arc::new(default_orchestrator()),
            Arc::new(RecordingOutputService::default()),
        );

        assert!(matches!(
            use_case.execute(request(Target::Go)).await,
            Err(ApplicationError::ParseError(_))
        ));
    }
}
