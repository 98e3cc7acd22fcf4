//! Filesystem access for toolsync
//!
//! Provides normalized paths, atomic writes, format-agnostic config loading
//! and the package discovery collaborator used by the engine.

pub mod config;
pub mod error;
pub mod io;
pub mod path;
pub mod workspace;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use workspace::{MANIFEST_FILE, Package, Workspace, discover};
