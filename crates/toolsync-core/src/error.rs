//! Error types for toolsync-core

use crate::plugin::BoxError;

/// Result type for toolsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving plugins or running setup.
///
/// Every variant aborts the current resolution or setup pass.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No loaded plugin could resolve a string reference
    #[error("Module {reference} not found")]
    ModuleNotFound { reference: String },

    /// A plugin's module loader failed
    #[error("Plugin {plugin} failed to load module {reference}: {source}")]
    LoadModule {
        plugin: String,
        reference: String,
        #[source]
        source: BoxError,
    },

    /// A plugin's config hook failed
    #[error("Plugin {plugin} failed to load config: {source}")]
    LoadConfig {
        plugin: String,
        #[source]
        source: BoxError,
    },

    /// A config fragment returned by a plugin could not be merged
    #[error("Failed to merge config from plugin {plugin}: {source}")]
    Merge {
        plugin: String,
        #[source]
        source: toolsync_patch::Error,
    },

    /// A plugin's setup hook failed for a package
    #[error("Setup of package {package} failed in plugin {plugin}: {source}")]
    Setup {
        package: String,
        plugin: String,
        #[source]
        source: BoxError,
    },

    /// The mutated manifest of a package could not be written
    #[error("Failed to write manifest of package {package}: {source}")]
    Persist {
        package: String,
        #[source]
        source: toolsync_fs::Error,
    },

    /// The plugin list grew past the configured bound
    #[error("Plugin limit of {limit} exceeded; a plugin keeps requesting new plugins")]
    PluginLimitExceeded { limit: usize },

    /// Plugin options did not match the shape the plugin expects
    #[error("Invalid options for plugin {plugin}: {source}")]
    InvalidOptions {
        plugin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem error from toolsync-fs
    #[error(transparent)]
    Fs(#[from] toolsync_fs::Error),

    /// Patch error from toolsync-patch
    #[error(transparent)]
    Patch(#[from] toolsync_patch::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
