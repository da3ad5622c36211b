//! Reasoning catalog loading
//!
//! The catalog is read once at startup. A configured file that is missing
//! or malformed leaves the engine with an empty catalog, which makes the
//! selection phase fall back to its default strategies.

use autologic_domain::ReasoningCatalog;
use std::path::Path;
use tracing::{info, warn};

const BUILTIN_CATALOG: &str = include_str!("../../data/reasoning_strategies.json");

pub struct CatalogLoader;

impl CatalogLoader {
    /// Load from `path`, or the built-in catalog when no path is given
    pub fn load(path: Option<&Path>) -> ReasoningCatalog {
        match path {
            Some(path) => Self::load_file(path),
            None => Self::builtin(),
        }
    }

    /// The catalog shipped with the binary
    pub fn builtin() -> ReasoningCatalog {
        match ReasoningCatalog::from_json(BUILTIN_CATALOG) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Built-in reasoning catalog is invalid: {}", e);
                ReasoningCatalog::empty()
            }
        }
    }

    fn load_file(path: &Path) -> ReasoningCatalog {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    "Could not read reasoning catalog {}: {}; continuing without strategies",
                    path.display(),
                    e
                );
                return ReasoningCatalog::empty();
            }
        };

        match ReasoningCatalog::from_json(&content) {
            Ok(catalog) => {
                info!("Loaded {} reasoning strategies from {}", catalog.len(), path.display());
                catalog
            }
            Err(e) => {
                warn!(
                    "Invalid reasoning catalog {}: {}; continuing without strategies",
                    path.display(),
                    e
                );
                ReasoningCatalog::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autologic_domain::DEFAULT_STRATEGY_IDS;

    #[test]
    fn test_builtin_catalog_has_defaults() {
        let catalog = CatalogLoader::builtin();
        assert_eq!(catalog.len(), 39);
        for id in DEFAULT_STRATEGY_IDS {
            assert!(catalog.get(id).is_some(), "missing {id}");
        }
    }

    #[test]
    fn test_load_without_path_is_builtin() {
        assert_eq!(CatalogLoader::load(None), CatalogLoader::builtin());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"id": "analogy", "name": "Analogy", "description": "Find a similar solved problem."}]"#,
        )
        .unwrap();

        let catalog = CatalogLoader::load(Some(&path));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("analogy").unwrap().name, "Analogy");
    }

    #[test]
    fn test_missing_file_yields_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = CatalogLoader::load(Some(&dir.path().join("absent.json")));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_malformed_file_yields_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(CatalogLoader::load(Some(&path)).is_empty());
    }
}
