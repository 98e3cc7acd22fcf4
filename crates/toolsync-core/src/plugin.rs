//! The plugin contract
//!
//! A plugin is a named unit with three optional capabilities, expressed as
//! async hooks with no-op default bodies:
//!
//! - [`Plugin::load_module`] resolves a string reference to another plugin
//! - [`Plugin::load_config`] contributes configuration and further plugins
//! - [`Plugin::setup_package`] mutates a package manifest
//!
//! Plugins are shared as `Arc<dyn Plugin>` and never change once loaded.

use crate::context::{ConfigContext, ModuleContext, SetupContext};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use toolsync_fs::Package;
use toolsync_patch::{Error as PatchError, modify};

/// Error type returned by plugin hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by plugin hooks.
pub type HookResult<T> = std::result::Result<T, BoxError>;

/// Plugin name to the configuration value intended for that plugin.
pub type ConfigurationMap = Map<String, Value>;

/// A fragment merged into the [`ConfigurationMap`] with the rules of
/// `toolsync_patch`.
pub type Modifier = Map<String, Value>;

#[async_trait]
pub trait Plugin: Send + Sync {
    /// Globally unique name, also the key of this plugin's options.
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    /// Resolve `reference` to a plugin. `Ok(None)` means "not mine".
    async fn load_module(
        &self,
        _reference: &str,
        _ctx: &ModuleContext<'_>,
    ) -> HookResult<Option<Arc<dyn Plugin>>> {
        Ok(None)
    }

    /// Contribute configuration and/or more plugins.
    ///
    /// Called at most once per resolution with this plugin's slice of the
    /// configuration map as it stands when the plugin is visited.
    async fn load_config(
        &self,
        _options: &Value,
        _ctx: &ConfigContext<'_>,
    ) -> HookResult<Option<LoadConfigResult>> {
        Ok(None)
    }

    /// Mutate `package.manifest` for one package.
    async fn setup_package(
        &self,
        _package: &mut Package,
        _ctx: &SetupContext<'_>,
    ) -> HookResult<()> {
        Ok(())
    }
}

impl fmt::Debug for dyn Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name())
            .field("description", &self.description())
            .finish()
    }
}

/// A plugin, or a string that a loaded plugin's module loader resolves.
#[derive(Clone)]
pub enum PluginRef {
    Plugin(Arc<dyn Plugin>),
    Module(String),
}

impl PluginRef {
    pub fn plugin(plugin: impl Plugin + 'static) -> Self {
        PluginRef::Plugin(Arc::new(plugin))
    }

    pub fn module(reference: impl Into<String>) -> Self {
        PluginRef::Module(reference.into())
    }

    /// The plugin name for an inline plugin, the raw reference otherwise.
    pub fn label(&self) -> &str {
        match self {
            PluginRef::Plugin(plugin) => plugin.name(),
            PluginRef::Module(reference) => reference,
        }
    }
}

impl fmt::Debug for PluginRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginRef::Plugin(plugin) => f.debug_tuple("Plugin").field(&plugin.name()).finish(),
            PluginRef::Module(reference) => f.debug_tuple("Module").field(reference).finish(),
        }
    }
}

impl From<Arc<dyn Plugin>> for PluginRef {
    fn from(plugin: Arc<dyn Plugin>) -> Self {
        PluginRef::Plugin(plugin)
    }
}

impl From<&str> for PluginRef {
    fn from(reference: &str) -> Self {
        PluginRef::Module(reference.to_string())
    }
}

impl From<String> for PluginRef {
    fn from(reference: String) -> Self {
        PluginRef::Module(reference)
    }
}

/// What a plugin's `load_config` hook contributes.
#[derive(Debug, Clone, Default)]
pub struct LoadConfigResult {
    /// Plugins to append to the plugin list
    pub plugins: Vec<PluginRef>,
    /// Merged into the configuration map
    pub config: Option<Modifier>,
}

impl LoadConfigResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plugin(mut self, plugin: impl Into<PluginRef>) -> Self {
        self.plugins.push(plugin.into());
        self
    }

    pub fn with_plugins<I, P>(mut self, plugins: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PluginRef>,
    {
        self.plugins.extend(plugins.into_iter().map(Into::into));
        self
    }

    /// Merge `options` into the modifier under `plugin`'s key.
    ///
    /// Fails if `options` conflicts with operators already queued for the
    /// same key.
    pub fn with_options(
        mut self,
        plugin: impl Into<String>,
        options: Value,
    ) -> std::result::Result<Self, PatchError> {
        let mut fragment = Map::new();
        fragment.insert(plugin.into(), options);
        let config = self.config.get_or_insert_with(Map::new);
        modify(config, &fragment)?;
        Ok(self)
    }

    /// Use `config` as the whole modifier.
    pub fn with_config(mut self, config: Modifier) -> Self {
        self.config = Some(config);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty() && self.config.as_ref().is_none_or(Map::is_empty)
    }
}
