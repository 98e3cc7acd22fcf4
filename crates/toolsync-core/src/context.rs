//! Contexts handed to plugin hooks

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Display;
use toolsync_fs::{NormalizedPath, Package, Workspace};

/// Logger bound to one plugin.
///
/// Every event carries a `plugin` field so output from different plugins
/// can be told apart.
#[derive(Debug, Clone)]
pub struct PluginLogger {
    plugin: String,
}

impl PluginLogger {
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
        }
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn debug(&self, message: impl Display) {
        tracing::debug!(plugin = %self.plugin, "{}", message);
    }

    pub fn info(&self, message: impl Display) {
        tracing::info!(plugin = %self.plugin, "{}", message);
    }

    pub fn warn(&self, message: impl Display) {
        tracing::warn!(plugin = %self.plugin, "{}", message);
    }

    pub fn error(&self, message: impl Display) {
        tracing::error!(plugin = %self.plugin, "{}", message);
    }
}

/// Deserialize plugin options into the plugin's own options type.
///
/// A `null` value is treated like an empty object so option structs with
/// `#[serde(default)]` fields work when no options were configured.
pub fn parse_options<T: DeserializeOwned>(plugin: &str, options: &Value) -> Result<T> {
    let value = if options.is_null() {
        Value::Object(Default::default())
    } else {
        options.clone()
    };
    serde_json::from_value(value).map_err(|source| Error::InvalidOptions {
        plugin: plugin.to_string(),
        source,
    })
}

/// Context for [`Plugin::load_module`](crate::Plugin::load_module).
#[derive(Debug, Clone)]
pub struct ModuleContext<'a> {
    pub log: PluginLogger,
    pub workspace: &'a Workspace,
}

/// Context for [`Plugin::load_config`](crate::Plugin::load_config).
#[derive(Debug, Clone)]
pub struct ConfigContext<'a> {
    pub log: PluginLogger,
    /// This plugin's options as currently resolved
    pub options: &'a Value,
    pub workspace: &'a Workspace,
}

impl ConfigContext<'_> {
    pub fn parse_options<T: DeserializeOwned>(&self) -> Result<T> {
        parse_options(self.log.plugin(), self.options)
    }
}

/// Context for [`Plugin::setup_package`](crate::Plugin::setup_package).
#[derive(Debug, Clone)]
pub struct SetupContext<'a> {
    pub log: PluginLogger,
    /// This plugin's resolved options
    pub options: &'a Value,
    pub root_dir: &'a NormalizedPath,
    /// The root package; while the root itself is being set up this is the
    /// state it had before the pass started
    pub root_package: Option<&'a Package>,
}

impl SetupContext<'_> {
    pub fn parse_options<T: DeserializeOwned>(&self) -> Result<T> {
        parse_options(self.log.plugin(), self.options)
    }
}
