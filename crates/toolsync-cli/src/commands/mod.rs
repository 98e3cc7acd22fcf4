//! Command implementations for toolsync-cli

pub mod config;
pub mod plugins;
pub mod prepare;

pub use config::run_config;
pub use plugins::run_plugins;
pub use prepare::run_prepare;
