//! Top-level entry point tying resolution and setup together

use crate::bootstrap::{CorePlugin, PluginCatalog};
use crate::plugin::{ConfigurationMap, Plugin, PluginRef};
use crate::resolver::{self, ResolveOptions, Resolved};
use crate::setup::{self, ManifestWriter, SetupReport};
use crate::Result;
use std::sync::Arc;
use toolsync_fs::Workspace;

/// Owns the workspace and the bootstrap plugin for resolution and setup.
///
/// No state is kept between calls to [`Engine::resolve`]; every run starts
/// from the bootstrap plugin and the given input.
#[derive(Debug)]
pub struct Engine {
    workspace: Workspace,
    bootstrap: Arc<dyn Plugin>,
    options: ResolveOptions,
}

impl Engine {
    /// Engine with an empty plugin catalog.
    pub fn new(workspace: Workspace) -> Self {
        Self::with_catalog(workspace, PluginCatalog::new())
    }

    pub fn with_catalog(workspace: Workspace, catalog: PluginCatalog) -> Self {
        Self {
            workspace,
            bootstrap: Arc::new(CorePlugin::new(catalog)),
            options: ResolveOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Resolve the initial plugins and configuration to a fixpoint.
    pub async fn resolve(
        &self,
        plugins: Vec<PluginRef>,
        config: &ConfigurationMap,
    ) -> Result<Resolved> {
        tracing::debug!(
            root = %self.workspace.root_dir,
            initial_plugins = plugins.len(),
            "Resolving plugins"
        );
        resolver::resolve(
            &self.workspace,
            Arc::clone(&self.bootstrap),
            plugins,
            config,
            self.options,
        )
        .await
    }

    /// Run setup hooks of `resolved` against every package.
    pub async fn setup(
        &mut self,
        resolved: &Resolved,
        writer: &dyn ManifestWriter,
    ) -> Result<SetupReport> {
        setup::setup_workspace(resolved, &mut self.workspace, writer).await
    }
}
