//! Built-in plugins shipped with toolsync
//!
//! Each plugin is loadable by its full name (`@toolsync/builtin/<id>`) and
//! by its short id through [`catalog`].

pub mod package_meta;
pub mod prettier;

pub use package_meta::PackageMetaPlugin;
pub use prettier::PrettierPlugin;

use std::sync::Arc;
use toolsync_core::{ConfigFilePlugin, Plugin, PluginCatalog};

/// Prefix shared by every built-in plugin name.
pub const BUILTIN_PREFIX: &str = "@toolsync/builtin/";

/// Catalog with every built-in plugin plus the config-file plugin.
pub fn catalog() -> PluginCatalog {
    let mut catalog = PluginCatalog::new().with(ConfigFilePlugin);
    let builtins: [Arc<dyn Plugin>; 2] = [Arc::new(PackageMetaPlugin), Arc::new(PrettierPlugin)];
    for plugin in builtins {
        if let Some(id) = plugin.name().strip_prefix(BUILTIN_PREFIX) {
            catalog.alias(id, Arc::clone(&plugin));
        }
        catalog.insert(plugin);
    }
    catalog
}
