//! Action definition loader.
//!
//! Loads `ActionDefinition` records from RON data files and builds validated
//! catalogs from them.

use std::path::Path;

use actions_core::{ActionCatalog, ActionDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Embedded default content, in registration order.
const BUILTIN: &[(&str, &str)] = &[
    ("personal.ron", include_str!("../../data/actions/personal.ron")),
    ("organization.ron", include_str!("../../data/actions/organization.ron")),
];

/// Action file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionFile {
    pub actions: Vec<ActionDefinition>,
}

/// Loader for action definitions from RON files.
pub struct ActionLoader;

impl ActionLoader {
    /// Load action definitions from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<ActionDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load actions from {}: {}", path.display(), e))
    }

    /// Parse action definitions from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<ActionDefinition>> {
        let file: ActionFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse action RON: {}", e))?;
        Ok(file.actions)
    }

    /// Load every `.ron` file in a directory, in file-name order.
    pub fn load_dir(dir: &Path) -> LoadResult<Vec<ActionDefinition>> {
        let mut paths = std::fs::read_dir(dir)
            .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "ron"))
            .collect::<Vec<_>>();
        paths.sort();

        let mut definitions = Vec::new();
        for path in paths {
            definitions.extend(Self::load(&path)?);
        }
        Ok(definitions)
    }

    /// The definitions embedded in this crate.
    pub fn builtin() -> LoadResult<Vec<ActionDefinition>> {
        let mut definitions = Vec::new();
        for (file, content) in BUILTIN {
            let parsed = Self::parse(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", file, e))?;
            definitions.extend(parsed);
        }
        Ok(definitions)
    }

    /// Load a file or directory and validate it into a catalog.
    ///
    /// Every definition error is reported, not just the first.
    pub fn load_catalog(path: &Path) -> LoadResult<ActionCatalog> {
        let definitions = if path.is_dir() {
            Self::load_dir(path)?
        } else {
            Self::load(path)?
        };
        Ok(ActionCatalog::load(definitions)?)
    }

    /// Validate the embedded definitions into a catalog.
    pub fn builtin_catalog() -> LoadResult<ActionCatalog> {
        Ok(ActionCatalog::load(Self::builtin()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actions_core::{ActorMode, Effect, ExecutionMode};
    use tempfile::TempDir;

    const BROKEN: &str = r#"(
        actions: [
            (
                name: "Plot",
                types: ["Immediate", "Indicator"],
                effects: ["AddInfluence lots"],
            ),
        ],
    )"#;

    #[test]
    fn test_builtin_catalog() {
        let catalog = ActionLoader::builtin_catalog().expect("Failed to load builtin actions");

        assert!(catalog.len() >= 6, "Should have at least 6 actions");

        let bribe = catalog.get("Bribe").unwrap();
        assert_eq!(bribe.execution_mode(), ExecutionMode::Immediate);
        assert_eq!(
            bribe.effects(),
            &[Effect::RemoveMoney(50), Effect::AddInfluence(5)]
        );

        let dues = catalog.get("Collect Dues").unwrap();
        assert_eq!(dues.execution_mode(), ExecutionMode::Repeatable);
        assert_eq!(dues.actor_mode(), ActorMode::Organization);

        assert!(catalog.get("Smuggle").unwrap().is_illegal());
        // 6.0 over 2 ticks
        assert_eq!(catalog.get("Carouse").unwrap().fixed_progression(), 3.0);
    }

    #[test]
    fn test_load_dir_orders_by_file_name() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("b.ron"),
            r#"(actions: [(name: "Second", types: ["Immediate"])])"#,
        )
        .unwrap();
        std::fs::write(
            temp.path().join("a.ron"),
            r#"(actions: [(name: "First", types: ["Immediate"])])"#,
        )
        .unwrap();
        std::fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let catalog = ActionLoader::load_catalog(temp.path()).unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["First", "Second"]);
    }

    #[test]
    fn test_load_catalog_reports_every_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.ron");
        std::fs::write(&path, BROKEN).unwrap();

        let error = ActionLoader::load_catalog(&path).unwrap_err();
        let message = format!("{error}");
        assert!(message.starts_with("2 action definition error(s)"), "{message}");
        assert!(message.contains("Plot"));
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let error = ActionLoader::load(&temp.path().join("absent.ron")).unwrap_err();
        assert!(format!("{error}").contains("Failed to read file"));
    }
}
