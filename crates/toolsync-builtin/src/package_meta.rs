//! Keeps member package metadata in line with the root package

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use toolsync_core::{HookResult, Plugin, SetupContext};
use toolsync_fs::Package;

pub const NAME: &str = "@toolsync/builtin/package-meta";

/// Fields copied verbatim from the root manifest into every member.
const INHERITED_FIELDS: &[&str] = &["license", "engines", "homepage"];

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Options {
    /// Applied to every public member package
    publish_config: Option<Value>,
}

/// Copies `license`, `engines`, `homepage` and `repository` from the root
/// package into each member, pointing `repository.directory` at the member.
///
/// With a `publishConfig` option, public members get it and private members
/// lose any they had.
#[derive(Debug, Default, Clone, Copy)]
pub struct PackageMetaPlugin;

#[async_trait]
impl Plugin for PackageMetaPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> Option<&str> {
        Some("Sync package metadata like repository between workspace packages")
    }

    async fn setup_package(&self, package: &mut Package, ctx: &SetupContext<'_>) -> HookResult<()> {
        let options: Options = ctx.parse_options()?;
        let root = ctx.root_package.map(|root| &root.manifest);

        if package.is_root {
            match root.and_then(|m| m.get("repository")) {
                None => ctx.log.warn("Root package has no repository field"),
                Some(Value::String(_)) => ctx
                    .log
                    .warn("Repository field is a string, consider using an object instead"),
                Some(_) => {}
            }
            return Ok(());
        }

        let relative_dir = package.relative_dir.to_string();
        let is_private = package
            .manifest
            .get("private")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let Some(manifest) = package.manifest.as_object_mut() else {
            return Err(format!("manifest of {relative_dir} is not an object").into());
        };

        if let Some(root) = root {
            for field in INHERITED_FIELDS {
                if let Some(value) = root.get(*field).filter(|v| !v.is_null()) {
                    manifest.insert(field.to_string(), value.clone());
                }
            }

            match root.get("repository") {
                Some(Value::String(url)) => {
                    manifest.insert("repository".to_string(), Value::String(url.clone()));
                }
                Some(Value::Object(repository)) => {
                    let mut repository = repository.clone();
                    repository.insert("directory".to_string(), Value::String(relative_dir));
                    manifest.insert("repository".to_string(), Value::Object(repository));
                }
                _ => {}
            }
        }

        match options.publish_config {
            Some(publish_config) if !is_private => {
                manifest.insert("publishConfig".to_string(), publish_config);
            }
            _ => {
                manifest.remove("publishConfig");
            }
        }

        Ok(())
    }
}
