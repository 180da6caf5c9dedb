//! Generator registry -- a named collection of available generation
//! strategies.
//!
//! The registry lets the CLI pick a strategy from configuration (e.g.
//! `generation.generator = "template"`) without the wizard knowing which
//! implementations exist.

use std::collections::HashMap;
use std::sync::Arc;

use super::template::TemplateGenerator;
use super::trait_def::PlanGenerator;

/// Errors from registry lookups.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("unknown plan generator {name:?} (available: {})", .available.join(", "))]
    Unknown {
        name: String,
        available: Vec<String>,
    },
}

/// A collection of registered [`PlanGenerator`] implementations, keyed by
/// name.
///
/// # Example
///
/// ```ignore
/// let registry = GeneratorRegistry::with_defaults();
/// let generator = registry.resolve("template")?;
/// ```
#[derive(Default)]
pub struct GeneratorRegistry {
    generators: HashMap<String, Arc<dyn PlanGenerator>>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the bundled strategies.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TemplateGenerator);
        registry
    }

    /// Register a generator under [`PlanGenerator::name`].
    ///
    /// If a generator with the same name is already registered, it is
    /// replaced and the old one is returned.
    pub fn register(
        &mut self,
        generator: impl PlanGenerator + 'static,
    ) -> Option<Arc<dyn PlanGenerator>> {
        let name = generator.name().to_string();
        self.generators.insert(name, Arc::new(generator))
    }

    /// Look up a generator by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn PlanGenerator>> {
        self.generators.get(name).cloned()
    }

    /// Look up a generator by name, reporting the available names on a miss.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn PlanGenerator>, GeneratorError> {
        self.get(name).ok_or_else(|| GeneratorError::Unknown {
            name: name.to_string(),
            available: self.list().into_iter().map(str::to_string).collect(),
        })
    }

    /// Registered names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generators.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("generators", &self.list())
            .finish()
    }
}
