//! Append-only registry of loaded plugins
//!
//! The registry owns the ordered plugin list. Plugins are deduplicated by
//! name (first registration wins) and never removed. String references are
//! resolved by asking loaded plugins' module loaders, most recently loaded
//! first, so a later plugin can shadow the default loader.

use crate::context::{ModuleContext, PluginLogger};
use crate::plugin::{Plugin, PluginRef};
use crate::{Error, Result};
use std::sync::Arc;
use toolsync_fs::Workspace;

/// Default upper bound on the number of loaded plugins.
pub const DEFAULT_PLUGIN_LIMIT: usize = 256;

#[derive(Debug)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
    limit: usize,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_PLUGIN_LIMIT)
    }

    /// Create a registry that refuses to grow past `limit` plugins.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            plugins: Vec::new(),
            limit,
        }
    }

    /// Append `plugin` unless a plugin with the same name is registered.
    ///
    /// Returns whether the plugin was added.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) -> Result<bool> {
        if self.contains(plugin.name()) {
            tracing::debug!(plugin = %plugin.name(), "Plugin is already loaded, skipping");
            return Ok(false);
        }
        if self.plugins.len() >= self.limit {
            return Err(Error::PluginLimitExceeded { limit: self.limit });
        }
        tracing::debug!(plugin = %plugin.name(), index = self.plugins.len(), "Loaded plugin");
        self.plugins.push(plugin);
        Ok(true)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name() == name)
    }

    pub fn get(&self, index: usize) -> Option<&Arc<dyn Plugin>> {
        self.plugins.get(index)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    pub fn into_plugins(self) -> Vec<Arc<dyn Plugin>> {
        self.plugins
    }

    /// Turn a reference into a plugin.
    ///
    /// Inline plugins are returned as is. Strings go to each loaded plugin's
    /// `load_module` in reverse registration order; the first `Some` wins.
    pub async fn resolve(
        &self,
        reference: &PluginRef,
        workspace: &Workspace,
    ) -> Result<Arc<dyn Plugin>> {
        let reference = match reference {
            PluginRef::Plugin(plugin) => return Ok(Arc::clone(plugin)),
            PluginRef::Module(reference) => reference,
        };

        for loader in self.plugins.iter().rev() {
            let ctx = ModuleContext {
                log: PluginLogger::new(loader.name()),
                workspace,
            };
            tracing::trace!(plugin = %loader.name(), %reference, "Trying module loader");
            let module = loader
                .load_module(reference, &ctx)
                .await
                .map_err(|source| Error::LoadModule {
                    plugin: loader.name().to_string(),
                    reference: reference.clone(),
                    source,
                })?;
            if let Some(plugin) = module {
                tracing::debug!(
                    loader = %loader.name(),
                    %reference,
                    plugin = %plugin.name(),
                    "Resolved module"
                );
                return Ok(plugin);
            }
        }

        Err(Error::ModuleNotFound {
            reference: reference.clone(),
        })
    }

    /// Resolve and register each reference in order.
    ///
    /// A string reference that matches the name of a loaded plugin is
    /// skipped without resolving it. Safe to call again with overlapping
    /// input. Returns the number of plugins added.
    pub async fn load_plugins<I>(&mut self, references: I, workspace: &Workspace) -> Result<usize>
    where
        I: IntoIterator<Item = PluginRef>,
    {
        let mut added = 0;
        for reference in references {
            if let PluginRef::Module(name) = &reference {
                if self.contains(name) {
                    tracing::debug!(plugin = %name, "Plugin is already loaded, skipping");
                    continue;
                }
            }
            let plugin = self.resolve(&reference, workspace).await?;
            if self.register(plugin)? {
                added += 1;
            }
        }
        Ok(added)
    }
}
