//! Name-keyed set of validated templates.

use std::collections::HashMap;

use super::definition::ActionDefinition;
use super::error::{LoadError, LoadErrorKind, LoadErrors};
use super::instance::ActionInstance;
use super::template::ActionTemplate;
use crate::state::{InstanceId, Target};

/// Every invocable action, read-only once loaded.
///
/// Iteration follows registration (authoring) order.
#[derive(Clone, Debug, Default)]
pub struct ActionCatalog {
    templates: Vec<ActionTemplate>,
    index: HashMap<String, usize>,
}

impl ActionCatalog {
    /// Builds a catalog from authoring records.
    ///
    /// All definitions are validated; if any fails, every collected error is
    /// returned and no catalog is produced.
    pub fn load<I>(definitions: I) -> Result<Self, LoadErrors>
    where
        I: IntoIterator<Item = ActionDefinition>,
    {
        let mut catalog = Self::default();
        let mut errors = Vec::new();

        for definition in definitions {
            match ActionTemplate::from_definition(&definition) {
                Ok(template) => {
                    if catalog.index.contains_key(template.name()) {
                        errors.push(LoadError::new(template.name(), LoadErrorKind::DuplicateName));
                        continue;
                    }
                    catalog
                        .index
                        .insert(template.name().to_owned(), catalog.templates.len());
                    catalog.templates.push(template);
                }
                Err(found) => errors.extend(found),
            }
        }

        if errors.is_empty() {
            Ok(catalog)
        } else {
            Err(LoadErrors(errors))
        }
    }

    pub fn get(&self, name: &str) -> Option<&ActionTemplate> {
        self.index.get(name).map(|&slot| &self.templates[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(ActionTemplate::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Clones the named template into a fresh, unresolved instance.
    pub fn instantiate(&self, id: InstanceId, name: &str, target: Target) -> Option<ActionInstance> {
        self.get(name)
            .map(|template| ActionInstance::new(id, template, target))
    }
}
