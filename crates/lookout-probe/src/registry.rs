//! In-memory probe registry with query support.

use crate::{
    definition::ProbeDefinition,
    error::{ProbeDefinitionError, Result},
    loader::ProbeLoader,
};
use lookout_core::Category;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Ordered cache of probe definitions.
///
/// Definitions keep their file order; platform names are unique.
#[derive(Clone, Default)]
pub struct ProbeRegistry {
    definitions: Arc<RwLock<Vec<ProbeDefinition>>>,
}

impl ProbeRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from an already-loaded list.
    ///
    /// Later duplicates of a platform name replace earlier ones in place.
    #[must_use]
    pub fn from_definitions(definitions: impl IntoIterator<Item = ProbeDefinition>) -> Self {
        let registry = Self::new();
        for definition in definitions {
            registry.upsert(definition);
        }
        registry
    }

    /// Create a registry from a loader. Never fails: an unreadable source
    /// gives an empty registry.
    #[must_use]
    pub fn load_from(loader: &ProbeLoader) -> Self {
        let registry = Self::new();
        registry.reload(loader);
        registry
    }

    /// Replace the cache with freshly loaded definitions.
    pub fn reload(&self, loader: &ProbeLoader) {
        let definitions = loader.load();

        let mut cache = self
            .definitions
            .write()
            .expect("acquire write lock on definitions");

        *cache = definitions;

        info!(count = cache.len(), "reloaded probe definitions");
    }

    /// Get a probe definition by platform name.
    ///
    /// # Errors
    /// Returns error if the platform is not registered.
    pub fn get(&self, name: &str) -> Result<ProbeDefinition> {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        cache
            .iter()
            .find(|def| def.name() == name)
            .cloned()
            .ok_or_else(|| ProbeDefinitionError::NotFound {
                name: name.to_string(),
            })
    }

    /// All definitions in registry order.
    #[must_use]
    pub fn get_all(&self) -> Vec<ProbeDefinition> {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        cache.clone()
    }

    /// Query probes by category.
    #[must_use]
    pub fn get_by_category(&self, category: Category) -> Vec<ProbeDefinition> {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        cache
            .iter()
            .filter(|def| def.category() == category)
            .cloned()
            .collect()
    }

    /// Number of registered probes.
    #[must_use]
    pub fn count(&self) -> usize {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        cache.len()
    }

    /// True when no probes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Check if a platform is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        cache.iter().any(|def| def.name() == name)
    }

    /// Probe count per category.
    #[must_use]
    pub fn count_by_category(&self) -> HashMap<Category, usize> {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        let mut counts: HashMap<Category, usize> = HashMap::new();

        for definition in cache.iter() {
            *counts.entry(definition.category()).or_insert(0) += 1;
        }

        counts
    }

    /// Add a definition, or replace the one with the same name in place.
    pub fn upsert(&self, definition: ProbeDefinition) {
        let mut cache = self
            .definitions
            .write()
            .expect("acquire write lock on definitions");

        let name = definition.name().to_string();
        if let Some(existing) = cache.iter_mut().find(|def| def.name() == name) {
            *existing = definition;
        } else {
            cache.push(definition);
        }

        debug!(platform = %name, "upserted probe definition");
    }

    /// Remove a definition. Returns `true` if it was present.
    pub fn remove(&self, name: &str) -> bool {
        let mut cache = self
            .definitions
            .write()
            .expect("acquire write lock on definitions");

        let before = cache.len();
        cache.retain(|def| def.name() != name);
        let removed = cache.len() != before;

        if removed {
            debug!(platform = %name, "removed probe definition");
        }

        removed
    }
}
