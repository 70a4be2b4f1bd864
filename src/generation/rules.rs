//! Business rules for the generation domain

use crate::generation::GenerationError;

/// Validates project name format
pub fn validate_project_name(name: &str) -> Result<(), GenerationError> {
    if name.is_empty() {
        return Err(GenerationError::ValidationError(
            "Project name cannot be empty".to_string(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(GenerationError::ValidationError(
            "Project name must contain only alphanumeric characters, dashes, and underscores"
                .to_string(),
        ));
    }

    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(GenerationError::ValidationError(
            "Project name must start with a letter".to_string(),
        ));
    }

    Ok(())
}

/// Generated manifests need a `major.minor.patch` version
pub fn validate_version(version: &str) -> Result<(), GenerationError> {
    let parts: Vec<&str> = version.split('.').collect();
    let numeric = parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    if !numeric {
        return Err(GenerationError::ValidationError(format!(
            "Version '{version}' is not of the form MAJOR.MINOR.PATCH"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("my-project").is_ok());
        assert!(validate_project_name("my_project").is_ok());
        assert!(validate_project_name("project123").is_ok());

        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("-project").is_err());
        assert!(validate_project_name("_project").is_err());
        assert!(validate_project_name("1project").is_err());
        assert!(validate_project_name("my project").is_err());
        assert!(validate_project_name("my@project").is_err());
    }

    #[test]
    fn test_validate_version() {
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("12.0.3").is_ok());
        assert!(validate_version("1.0").is_err());
        assert!(validate_version("1.0.x").is_err());
        assert!(validate_version("").is_err());
    }
}
