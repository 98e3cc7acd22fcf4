//! Prettier formatting setup for the root package

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use toolsync_core::{HookResult, Plugin, SetupContext};
use toolsync_fs::Package;

pub const NAME: &str = "@toolsync/builtin/prettier";

/// Version range installed when no `version` option is configured.
pub const DEFAULT_VERSION: &str = "^3.3.3";

const FORMAT_SCRIPT: &str = "prettier --write .";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Options {
    version: Option<String>,
}

/// Adds a `format` script and a `prettier` dev dependency to the root
/// package. Member packages are untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrettierPlugin;

#[async_trait]
impl Plugin for PrettierPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> Option<&str> {
        Some("Format the repository with prettier")
    }

    async fn setup_package(&self, package: &mut Package, ctx: &SetupContext<'_>) -> HookResult<()> {
        if !package.is_root {
            return Ok(());
        }
        let options: Options = ctx.parse_options()?;
        let version = options.version.as_deref().unwrap_or(DEFAULT_VERSION);

        set_entry(&mut package.manifest, "scripts", "format", FORMAT_SCRIPT)?;
        set_entry(&mut package.manifest, "devDependencies", "prettier", version)?;
        ctx.log.debug(format!("Using prettier {version}"));
        Ok(())
    }
}

/// Set `manifest[section][key] = value`, creating `section` if needed.
fn set_entry(manifest: &mut Value, section: &str, key: &str, value: &str) -> HookResult<()> {
    let manifest = manifest
        .as_object_mut()
        .ok_or("package manifest is not an object")?;
    let section_value = manifest
        .entry(section)
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(entries) = section_value.as_object_mut() else {
        return Err(format!("'{section}' in package manifest is not an object").into());
    };
    entries.insert(key.to_string(), Value::String(value.to_string()));
    Ok(())
}
