//! Config resolution loop
//!
//! Resolution walks the plugin list with an index cursor while the list
//! keeps growing: a plugin's `load_config` may append plugins, and those are
//! visited in turn once the cursor reaches them. The loop ends when the
//! cursor catches up with the list length.
//!
//! Each plugin's `load_config` runs exactly once per resolution, with the
//! configuration merged by the plugins visited before it. Contributions are
//! merged in visitation order, so the final map is a left fold over the
//! plugin list.

use crate::context::{ConfigContext, PluginLogger};
use crate::plugin::{ConfigurationMap, Plugin, PluginRef};
use crate::registry::{DEFAULT_PLUGIN_LIMIT, PluginRegistry};
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::sync::Arc;
use toolsync_fs::Workspace;
use toolsync_patch::modify;

/// Tunables for a resolution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Maximum length of the plugin list, bootstrap plugin included
    pub max_plugins: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_plugins: DEFAULT_PLUGIN_LIMIT,
        }
    }
}

/// Working state of one resolution run.
#[derive(Debug)]
pub struct ResolutionContext<'w> {
    registry: PluginRegistry,
    config: ConfigurationMap,
    workspace: &'w Workspace,
}

impl<'w> ResolutionContext<'w> {
    pub fn new(workspace: &'w Workspace, options: ResolveOptions) -> Self {
        Self {
            registry: PluginRegistry::with_limit(options.max_plugins),
            config: Map::new(),
            workspace,
        }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ConfigurationMap {
        &self.config
    }

    /// Seed the configuration map with caller-supplied raw configuration.
    pub fn seed_config(&mut self, config: &ConfigurationMap) -> Result<()> {
        modify(&mut self.config, config)?;
        Ok(())
    }

    pub async fn load_plugins<I>(&mut self, references: I) -> Result<usize>
    where
        I: IntoIterator<Item = PluginRef>,
    {
        self.registry.load_plugins(references, self.workspace).await
    }

    /// Visit plugins from index 0 until no unvisited plugin remains.
    pub async fn run(&mut self) -> Result<()> {
        let mut cursor = 0;
        while let Some(plugin) = self.registry.get(cursor).cloned() {
            cursor += 1;
            self.visit(plugin).await?;
        }
        tracing::debug!(
            plugins = self.registry.len(),
            keys = self.config.len(),
            "Resolution reached a fixpoint"
        );
        Ok(())
    }

    async fn visit(&mut self, plugin: Arc<dyn Plugin>) -> Result<()> {
        let name = plugin.name().to_string();
        let options = self
            .config
            .get(&name)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        let ctx = ConfigContext {
            log: PluginLogger::new(&name),
            options: &options,
            workspace: self.workspace,
        };

        tracing::debug!(plugin = %name, "Loading config");
        let result = plugin
            .load_config(&options, &ctx)
            .await
            .map_err(|source| Error::LoadConfig {
                plugin: name.clone(),
                source,
            })?;

        let Some(result) = result else {
            tracing::trace!(plugin = %name, "Plugin contributed nothing");
            return Ok(());
        };

        if let Some(modifier) = &result.config {
            tracing::debug!(plugin = %name, keys = modifier.len(), "Merging config fragment");
            modify(&mut self.config, modifier).map_err(|source| Error::Merge {
                plugin: name.clone(),
                source,
            })?;
        }

        if !result.plugins.is_empty() {
            let requested = result.plugins.len();
            let added = self.load_plugins(result.plugins).await?;
            tracing::debug!(plugin = %name, requested, added, "Loaded plugins requested by plugin");
        }

        Ok(())
    }

    pub fn finish(self) -> Resolved {
        Resolved {
            plugins: self.registry.into_plugins(),
            config: self.config,
        }
    }
}

/// Outcome of a resolution run. Read-only.
#[derive(Debug, Clone)]
pub struct Resolved {
    plugins: Vec<Arc<dyn Plugin>>,
    config: ConfigurationMap,
}

impl Resolved {
    /// Final plugin list in registration order.
    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn config(&self) -> &ConfigurationMap {
        &self.config
    }

    /// The resolved options for `plugin`, or `None` if nothing configured it.
    pub fn options(&self, plugin: &str) -> Option<&Value> {
        self.config.get(plugin)
    }
}

/// Resolve `plugins` and `config` into a converged configuration.
///
/// `bootstrap` is registered first, then the initial references in order.
pub async fn resolve(
    workspace: &Workspace,
    bootstrap: Arc<dyn Plugin>,
    plugins: Vec<PluginRef>,
    config: &ConfigurationMap,
    options: ResolveOptions,
) -> Result<Resolved> {
    let mut ctx = ResolutionContext::new(workspace, options);
    ctx.seed_config(config)?;
    ctx.load_plugins(std::iter::once(PluginRef::Plugin(bootstrap)).chain(plugins))
        .await?;
    ctx.run().await?;
    Ok(ctx.finish())
}
