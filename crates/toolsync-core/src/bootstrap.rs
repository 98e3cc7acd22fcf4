//! The implicit first plugin of every resolution
//!
//! `@toolsync/core` is registered before any caller-supplied plugin and acts
//! as the default module loader. Plugins cannot be imported by name at
//! runtime, so it resolves references against a [`PluginCatalog`] the
//! embedding program fills with the plugins it ships.

use crate::context::ModuleContext;
use crate::plugin::{HookResult, Plugin};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Name of the bootstrap plugin.
pub const CORE_PLUGIN_NAME: &str = "@toolsync/core";

/// Plugins available for lookup by string reference.
#[derive(Debug, Clone, Default)]
pub struct PluginCatalog {
    entries: BTreeMap<String, Arc<dyn Plugin>>,
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `plugin` loadable by its own name.
    pub fn with(mut self, plugin: impl Plugin + 'static) -> Self {
        self.insert(Arc::new(plugin));
        self
    }

    pub fn insert(&mut self, plugin: Arc<dyn Plugin>) {
        self.entries.insert(plugin.name().to_string(), plugin);
    }

    /// Make `plugin` loadable under an additional reference.
    pub fn alias(&mut self, reference: impl Into<String>, plugin: Arc<dyn Plugin>) {
        self.entries.insert(reference.into(), plugin);
    }

    pub fn get(&self, reference: &str) -> Option<&Arc<dyn Plugin>> {
        self.entries.get(reference)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The bootstrap plugin. Contributes no configuration.
#[derive(Debug, Clone, Default)]
pub struct CorePlugin {
    catalog: PluginCatalog,
}

impl CorePlugin {
    pub fn new(catalog: PluginCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PluginCatalog {
        &self.catalog
    }
}

#[async_trait]
impl Plugin for CorePlugin {
    fn name(&self) -> &str {
        CORE_PLUGIN_NAME
    }

    fn description(&self) -> Option<&str> {
        Some("Default module loader backed by the built-in plugin catalog")
    }

    async fn load_module(
        &self,
        reference: &str,
        ctx: &ModuleContext<'_>,
    ) -> HookResult<Option<Arc<dyn Plugin>>> {
        let found = self.catalog.get(reference).cloned();
        if found.is_none() {
            ctx.log.debug(format!("Module {reference} is not in the catalog"));
        }
        Ok(found)
    }
}
