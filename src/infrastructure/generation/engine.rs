//! Default wiring of the generation pipeline

use std::sync::Arc;

use crate::core::ApiDescription;
use crate::generation::{
    ArtifactMap, GenerationContext, GenerationError, GenerationOrchestrator, Target,
};
use crate::infrastructure::generation::{CompositeContextBuilder, TeraTemplateRenderer};

/// Orchestrator over every registered target builder and the embedded templates
pub fn default_orchestrator() -> GenerationOrchestrator {
    GenerationOrchestrator::new(
        Arc::new(CompositeContextBuilder::default()),
        Arc::new(TeraTemplateRenderer::new()),
    )
}

/// Generate entry point: `generate(model, target) -> {path: text}`.
///
/// Project metadata is derived from the API title. Two calls with the same
/// model and target return identical maps.
pub fn generate(api: &ApiDescription, target: Target) -> Result<ArtifactMap, GenerationError> {
    let result = default_orchestrator().generate(GenerationContext::new(api.clone(), target))?;
    Ok(result.artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Endpoint, HttpMethod, Parameter, ParameterLocation};

    fn pets() -> ApiDescription {
        let mut endpoint = Endpoint::new(HttpMethod::Get, "/pets/{id}");
        endpoint.operation_id = "getPet".to_string();
        endpoint.parameters = vec![Parameter::new("id", ParameterLocation::Path, true)];
        ApiDescription {
            title: "Pets".to_string(),
            base_url: "https://api.pets.test/v1".to_string(),
            endpoints: vec![endpoint],
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_python_layout() {
        let artifacts = generate(&pets(), Target::Python).unwrap();
        for path in [
            "pyproject.toml",
            "src/pets_client/__init__.py",
            "src/pets_client/client.py",
            "src/pets_client/auth.py",
            "src/pets_client/request.py",
            "src/pets_client/errors.py",
            "src/pets_client/config.py",
            "tests/test_get_pet.py",
            "examples/basic_usage.py",
            ".env.example",
            "README.md",
        ] {
            assert!(artifacts.contains_key(path), "missing {path}");
        }
        assert!(artifacts["src/pets_client/client.py"].contains("def get_pet(self, id: str)"));
    }

    #[test]
    fn test_generate_is_deterministic() {
        for target in Target::all() {
            assert_eq!(
                generate(&pets(), *target).unwrap(),
                generate(&pets(), *target).unwrap()
            );
        }
    }

    #[test]
    fn test_generate_with_no_endpoints() {
        let api = ApiDescription::default();
        for target in Target::all() {
            let artifacts = generate(&api, *target).unwrap();
            assert!(artifacts.contains_key(".env.example"));
        }
    }
}
