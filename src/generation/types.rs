//! Core types for the generation domain

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::generation::GenerationError;

/// Relative forward-slash path to full file text, ordered by path
pub type ArtifactMap = BTreeMap<String, String>;

/// Supported client-library target languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Python,
    TypeScript,
    Go,
    Rust,
}

impl Target {
    /// Get the display name for this target
    pub fn display_name(&self) -> &'static str {
        match self {
            Target::Python => "Python",
            Target::TypeScript => "TypeScript",
            Target::Go => "Go",
            Target::Rust => "Rust",
        }
    }

    /// Get the source file extension for this target
    pub fn file_extension(&self) -> &'static str {
        match self {
            Target::Python => "py",
            Target::TypeScript => "ts",
            Target::Go => "go",
            Target::Rust => "rs",
        }
    }

    /// Get all supported targets
    pub fn all() -> &'static [Target] {
        &[Target::Python, Target::TypeScript, Target::Go, Target::Rust]
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Python => write!(f, "python"),
            Target::TypeScript => write!(f, "typescript"),
            Target::Go => write!(f, "go"),
            Target::Rust => write!(f, "rust"),
        }
    }
}

impl FromStr for Target {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Ok(Target::Python),
            "typescript" | "ts" => Ok(Target::TypeScript),
            "go" | "golang" => Ok(Target::Go),
            "rust" | "rs" => Ok(Target::Rust),
            _ => Err(GenerationError::UnsupportedTarget(s.to_string())),
        }
    }
}

/// A generated file placed under an output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: String,
}

impl Artifact {
    /// Places every entry of `artifacts` below `root`, keeping map order
    pub fn place_all(root: &Path, artifacts: &ArtifactMap) -> Vec<Artifact> {
        artifacts
            .iter()
            .map(|(relative, content)| Artifact {
                path: relative.split('/').fold(root.to_path_buf(), |p, part| p.join(part)),
                content: content.clone(),
            })
            .collect()
    }
}

/// Result of generation
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub target: Target,
    pub artifacts: ArtifactMap,
    pub metadata: crate::generation::GenerationMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_str() {
        assert_eq!(Target::from_str("python").unwrap(), Target::Python);
        assert_eq!(Target::from_str("typescript").unwrap(), Target::TypeScript);
        assert_eq!(Target::from_str("go").unwrap(), Target::Go);
        assert_eq!(Target::from_str("rust").unwrap(), Target::Rust);

        // Aliases
        assert_eq!(Target::from_str("py").unwrap(), Target::Python);
        assert_eq!(Target::from_str("ts").unwrap(), Target::TypeScript);
        assert_eq!(Target::from_str("golang").unwrap(), Target::Go);
        assert_eq!(Target::from_str("rs").unwrap(), Target::Rust);

        // Case insensitivity
        assert_eq!(Target::from_str("RUST").unwrap(), Target::Rust);
        assert_eq!(Target::from_str("TypeScript").unwrap(), Target::TypeScript);

        assert!(Target::from_str("javascript").is_err());
        assert!(Target::from_str("").is_err());
    }

    #[test]
    fn test_target_display_roundtrips() {
        for target in Target::all() {
            assert_eq!(Target::from_str(&target.to_string()).unwrap(), *target);
        }
        assert_eq!(Target::Go.display_name(), "Go");
        assert_eq!(Target::TypeScript.file_extension(), "ts");
    }

    #[test]
    fn test_artifacts_are_placed_under_root() {
        let mut map = ArtifactMap::new();
        map.insert("src/client.rs".to_string(), "x".to_string());
        map.insert("Cargo.toml".to_string(), "y".to_string());

        let placed = Artifact::place_all(Path::new("/out"), &map);
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].path, Path::new("/out").join("Cargo.toml"));
        assert_eq!(placed[1].path, Path::new("/out").join("src").join("client.rs"));
    }
}
