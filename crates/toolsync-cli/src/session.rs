//! Turning command-line input into a resolution

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use toolsync_core::{
    CONFIG_FILE_PLUGIN_NAME, ConfigContext, ConfigFilePlugin, ConfigurationMap, Engine,
    EngineConfig, HookResult, LoadConfigResult, Plugin, PluginRef, Resolved,
};
use toolsync_fs::{NormalizedPath, discover};

use crate::cli::ResolveArgs;
use crate::error::{CliError, Result};

/// Name of [`CliPlugin`].
pub const CLI_PLUGIN_NAME: &str = "@toolsync/cli";

/// The plugin standing for the command line: it contributes the plugins
/// named by `--plugin` and, when a config file is in play, the config-file
/// plugin with its options.
#[derive(Debug, Default, Clone)]
pub struct CliPlugin {
    plugins: Vec<String>,
    config: ConfigurationMap,
}

impl CliPlugin {
    pub fn new(plugins: Vec<String>) -> Self {
        Self {
            plugins,
            config: Map::new(),
        }
    }

    /// Load `path` through the config-file plugin.
    pub fn with_config_file(mut self, path: &NormalizedPath) -> Self {
        self.plugins.push(CONFIG_FILE_PLUGIN_NAME.to_string());
        self.config.insert(
            CONFIG_FILE_PLUGIN_NAME.to_string(),
            ConfigFilePlugin::options_for(path),
        );
        self
    }
}

#[async_trait]
impl Plugin for CliPlugin {
    fn name(&self) -> &str {
        CLI_PLUGIN_NAME
    }

    fn description(&self) -> Option<&str> {
        Some("Plugins and config files given on the command line")
    }

    async fn load_config(
        &self,
        _options: &Value,
        ctx: &ConfigContext<'_>,
    ) -> HookResult<Option<LoadConfigResult>> {
        ctx.log.debug(format!(
            "Contributing {} plugin reference(s) from the command line",
            self.plugins.len()
        ));
        let mut result = LoadConfigResult::new().with_plugins(self.plugins.iter().cloned());
        if !self.config.is_empty() {
            result = result.with_config(self.config.clone());
        }
        Ok(Some(result))
    }
}

/// A discovered workspace plus the initial input of a resolution.
#[derive(Debug)]
pub struct Session {
    pub engine: Engine,
    pub config_file: Option<NormalizedPath>,
    plugins: Vec<PluginRef>,
}

impl Session {
    pub fn open(args: &ResolveArgs) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let root = args
            .root
            .as_deref()
            .map(|root| absolute(&cwd, root))
            .unwrap_or_else(|| cwd.clone());
        if !root.is_dir() {
            return Err(CliError::user(format!(
                "Workspace root {} is not a directory",
                root.display()
            )));
        }

        let workspace = discover(&root)?;
        tracing::debug!(
            root = %workspace.root_dir,
            packages = workspace.len(),
            "Opened workspace"
        );

        let config_file = match &args.config {
            Some(path) => {
                let path = absolute(&cwd, path);
                if !path.is_file() {
                    return Err(CliError::user(format!(
                        "Config file {} does not exist",
                        path.display()
                    )));
                }
                Some(NormalizedPath::new(path))
            }
            None => EngineConfig::find(&workspace.root_dir),
        };

        let mut cli = CliPlugin::new(args.plugins.clone());
        if let Some(path) = &config_file {
            tracing::debug!(path = %path, "Using config file");
            cli = cli.with_config_file(path);
        }

        Ok(Self {
            engine: Engine::with_catalog(workspace, toolsync_builtin::catalog()),
            config_file,
            plugins: vec![PluginRef::plugin(cli)],
        })
    }

    pub async fn resolve(&self) -> Result<Resolved> {
        Ok(self
            .engine
            .resolve(self.plugins.clone(), &Map::new())
            .await?)
    }
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
