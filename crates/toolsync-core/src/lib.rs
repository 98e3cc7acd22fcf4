//! Configuration composition engine for toolsync
//!
//! Plugins contribute configuration, pull in more plugins, and finally set
//! up each package of a multi-package repository. This crate implements:
//!
//! - **Plugin registry**: ordered, append-only, deduplicated by name, with
//!   string references resolved by loaded plugins' module loaders
//! - **Resolution loop**: visits the growing plugin list once per plugin
//!   and folds each contribution into the configuration map
//! - **Setup dispatch**: runs setup hooks per package and persists changed
//!   manifests
//!
//! # Architecture
//!
//! ```text
//!                 toolsync-cli
//!                      |
//!                toolsync-core
//!                  /       \
//!        toolsync-fs   toolsync-patch
//! ```
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use serde_json::{Map, Value, json};
//! use toolsync_core::{
//!     ConfigContext, Engine, HookResult, LoadConfigResult, Plugin, PluginRef,
//! };
//! use toolsync_fs::Workspace;
//!
//! struct Formatter;
//!
//! #[async_trait]
//! impl Plugin for Formatter {
//!     fn name(&self) -> &str {
//!         "formatter"
//!     }
//!
//!     async fn load_config(
//!         &self,
//!         _options: &Value,
//!         _ctx: &ConfigContext<'_>,
//!     ) -> HookResult<Option<LoadConfigResult>> {
//!         Ok(Some(LoadConfigResult::new().with_options("editor", json!({ "formatOnSave": true }))?))
//!     }
//! }
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let engine = Engine::new(Workspace::default());
//! let resolved = engine
//!     .resolve(vec![PluginRef::plugin(Formatter)], &Map::new())
//!     .await
//!     .unwrap();
//! assert_eq!(resolved.options("editor"), Some(&json!({ "formatOnSave": true })));
//! # });
//! ```

pub mod bootstrap;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod plugin;
pub mod registry;
pub mod resolver;
pub mod setup;

pub use bootstrap::{CORE_PLUGIN_NAME, CorePlugin, PluginCatalog};
pub use config::{CONFIG_FILE_PLUGIN_NAME, ConfigFilePlugin, EngineConfig};
pub use context::{ConfigContext, ModuleContext, PluginLogger, SetupContext, parse_options};
pub use engine::Engine;
pub use error::{Error, Result};
pub use plugin::{
    BoxError, ConfigurationMap, HookResult, LoadConfigResult, Modifier, Plugin, PluginRef,
};
pub use registry::{DEFAULT_PLUGIN_LIMIT, PluginRegistry};
pub use resolver::{ResolutionContext, ResolveOptions, Resolved, resolve};
pub use setup::{
    DryRunWriter, FsManifestWriter, ManifestWriter, PackageOutcome, SetupReport, package_label,
    setup_package, setup_workspace,
};
