//! Ordered registry of source definitions.

use crate::{
    definition::SourceDefinition,
    error::{Result, SourceError},
    loader::SourceLoader,
};
use pricescout_core::Marketplace;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// The set of sources a search fans out to.
///
/// Iteration order is the marketplace order (Wildberries, Ozon, Yandex.Market),
/// which is also the order listings appear in aggregated results.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    definitions: BTreeMap<Marketplace, SourceDefinition>,
}

impl SourceRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in definition of every marketplace.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for marketplace in Marketplace::ALL {
            registry
                .definitions
                .insert(marketplace, SourceDefinition::builtin(marketplace));
        }
        registry
    }

    /// Built-ins, overridden by whatever the loader finds.
    ///
    /// # Errors
    /// Returns error if the loader's directory can't be read.
    pub fn builtin_with_overrides(loader: &SourceLoader) -> Result<Self> {
        let mut registry = Self::builtin();
        for definition in loader.load_all()? {
            registry.insert(definition)?;
        }
        Ok(registry)
    }

    /// Add or replace the definition for its marketplace.
    ///
    /// # Errors
    /// Returns error if the definition is invalid.
    pub fn insert(&mut self, definition: SourceDefinition) -> Result<()> {
        definition.validate()?;
        let marketplace = definition.marketplace;
        if self.definitions.insert(marketplace, definition).is_some() {
            debug!(%marketplace, "replaced source definition");
        }
        Ok(())
    }

    /// Drop the given marketplaces.
    pub fn disable(&mut self, marketplaces: &[Marketplace]) {
        for marketplace in marketplaces {
            if self.definitions.remove(marketplace).is_some() {
                info!(%marketplace, "source disabled by configuration");
            }
        }
    }

    /// Get a definition by marketplace.
    ///
    /// # Errors
    /// Returns error if the marketplace has no definition.
    pub fn get(&self, marketplace: Marketplace) -> Result<&SourceDefinition> {
        self.definitions
            .get(&marketplace)
            .ok_or(SourceError::NotFound { marketplace })
    }

    /// All definitions in result order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceDefinition> {
        self.definitions.values()
    }

    /// Number of registered sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether no sources are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
