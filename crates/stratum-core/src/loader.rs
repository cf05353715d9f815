//! Document discovery and parsing
//!
//! Provider documents (environment sets, resource profiles, mixins) live
//! in directories scanned by extension. Each document carries a `kind`
//! discriminator; loaders skip documents whose tag does not match.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{CoreError, Result};

/// Shared `metadata` block of provider documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocMetadata {
    pub name: String,
}

/// Recursively list files under `root` with the given extension (without
/// the leading dot), sorted for deterministic load order. A missing root
/// yields an empty list.
pub fn list_files(root: impl AsRef<Path>, ext: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().map(|e| e == ext).unwrap_or(false))
        .collect();
    files.sort();
    files
}

/// Parse one YAML document into `T`, attaching the file path to any error.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|err| CoreError::FileLoad {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    serde_yaml::from_str(&content).map_err(|err| CoreError::FileLoad {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_list_files_filters_by_extension_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.yaml"), "kind: Mixin").unwrap();
        fs::write(dir.path().join("a.yaml"), "kind: Mixin").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore").unwrap();

        let files = list_files(dir.path(), "yaml");
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.yaml"]);
    }

    #[test]
    fn test_list_files_missing_root_is_empty() {
        assert!(list_files("/no/such/dir", "yaml").is_empty());
    }

    #[test]
    fn test_load_yaml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, ": not yaml").unwrap();
        let err = load_yaml::<DocMetadata>(&path).unwrap_err();
        assert!(err.to_string().contains("bad.yaml"));
    }
}
