//! On-disk engine configuration
//!
//! A config file holds the initial input of a resolution: plugin references
//! and raw per-plugin configuration.
//!
//! ```json
//! {
//!   "plugins": ["@toolsync/builtin/prettier"],
//!   "config": {
//!     "@toolsync/builtin/prettier": { "version": "3.3.0" }
//!   }
//! }
//! ```
//!
//! The same shape is accepted as TOML or YAML, chosen by file extension.

use crate::context::ConfigContext;
use crate::plugin::{ConfigurationMap, HookResult, LoadConfigResult, Plugin, PluginRef};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use toolsync_fs::{ConfigStore, NormalizedPath};

/// File names looked up in the workspace root, in order.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["toolsync.json", "toolsync.toml", "toolsync.yaml"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Plugin references, resolved through the loaded module loaders
    #[serde(default)]
    pub plugins: Vec<String>,

    /// Raw configuration keyed by plugin name
    #[serde(default)]
    pub config: ConfigurationMap,
}

impl EngineConfig {
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    /// The first default config file present in `root`.
    pub fn find(root: &NormalizedPath) -> Option<NormalizedPath> {
        DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| root.join(name))
            .find(NormalizedPath::is_file)
    }

    pub fn plugin_refs(&self) -> Vec<PluginRef> {
        self.plugins.iter().cloned().map(PluginRef::Module).collect()
    }
}

/// Name of [`ConfigFilePlugin`].
pub const CONFIG_FILE_PLUGIN_NAME: &str = "@toolsync/core/config-file";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFileOptions {
    config_file: Option<String>,
}

/// Loads an [`EngineConfig`] from the file named by its `configFile` option
/// and contributes its plugins and configuration.
///
/// A missing file contributes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigFilePlugin;

impl ConfigFilePlugin {
    /// Options entry pointing this plugin at `path`.
    pub fn options_for(path: &NormalizedPath) -> Value {
        serde_json::json!({ "configFile": path.as_str() })
    }
}

#[async_trait]
impl Plugin for ConfigFilePlugin {
    fn name(&self) -> &str {
        CONFIG_FILE_PLUGIN_NAME
    }

    fn description(&self) -> Option<&str> {
        Some("Loads plugins and configuration from a JSON, TOML or YAML file")
    }

    async fn load_config(
        &self,
        _options: &Value,
        ctx: &ConfigContext<'_>,
    ) -> HookResult<Option<LoadConfigResult>> {
        let options: ConfigFileOptions = ctx.parse_options()?;
        let Some(config_file) = options.config_file else {
            ctx.log.debug("No configFile option set");
            return Ok(None);
        };

        let path = if std::path::Path::new(&config_file).is_absolute() {
            NormalizedPath::new(&config_file)
        } else {
            ctx.workspace.root_dir.join(&config_file)
        };

        if !path.is_file() {
            ctx.log.warn(format!("Config file {path} does not exist"));
            return Ok(None);
        }

        let file = EngineConfig::load(&path)?;
        ctx.log.debug(format!(
            "Loaded {} plugin reference(s) and {} config key(s) from {path}",
            file.plugins.len(),
            file.config.len()
        ));

        let plugins = file.plugin_refs();
        Ok(Some(
            LoadConfigResult::new()
                .with_plugins(plugins)
                .with_config(file.config),
        ))
    }
}
