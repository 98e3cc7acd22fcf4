//! End-to-end runs over a multi-package repository on disk
//!
//! Exercises the complete flow: config file -> plugin resolution -> setup ->
//! manifests written back.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use toolsync_core::{
    CONFIG_FILE_PLUGIN_NAME, ConfigContext, ConfigFilePlugin, Engine, FsManifestWriter,
    HookResult, LoadConfigResult, ModuleContext, Plugin, PluginRef, SetupContext,
};
use toolsync_fs::{NormalizedPath, Package, discover};
use toolsync_patch::ArrayOp;

fn write(dir: &TempDir, file: &str, content: &str) {
    let path = dir.path().join(file);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read_manifest(dir: &TempDir, package: &str) -> Value {
    let content = fs::read_to_string(dir.path().join(package).join("package.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// A root package with two members and a `toolsync.toml`.
fn setup_test_repo() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(
        &temp,
        "package.json",
        r#"{
  "name": "acme",
  "private": true,
  "license": "MIT",
  "repository": { "type": "git", "url": "https://github.com/acme/tools" },
  "workspaces": ["packages/*", "tools/cli"]
}"#,
    );
    write(&temp, "packages/core/package.json", r#"{ "name": "@acme/core" }"#);
    write(
        &temp,
        "packages/internal/package.json",
        r#"{ "name": "@acme/internal", "private": true }"#,
    );
    write(&temp, "tools/cli/package.json", r#"{ "name": "@acme/cli" }"#);
    write(
        &temp,
        "toolsync.toml",
        r#"
plugins = ["package-meta", "prettier"]

[config."@toolsync/builtin/prettier"]
version = "3.3.3"

[config."@toolsync/builtin/package-meta"]
publishConfig = { access = "public" }
"#,
    );
    temp
}

fn config_file_input(temp: &TempDir) -> (Vec<PluginRef>, Map<String, Value>) {
    let path = NormalizedPath::new(temp.path()).join("toolsync.toml");
    let mut config = Map::new();
    config.insert(
        CONFIG_FILE_PLUGIN_NAME.to_string(),
        ConfigFilePlugin::options_for(&path),
    );
    (vec![PluginRef::module(CONFIG_FILE_PLUGIN_NAME)], config)
}

#[tokio::test]
async fn test_prepare_applies_builtin_plugins_from_config_file() {
    let temp = setup_test_repo();
    let (plugins, config) = config_file_input(&temp);
    let mut engine = Engine::with_catalog(
        discover(temp.path()).unwrap(),
        toolsync_builtin::catalog(),
    );

    let resolved = engine.resolve(plugins, &config).await.unwrap();
    assert_eq!(
        resolved.plugin_names(),
        vec![
            "@toolsync/core",
            CONFIG_FILE_PLUGIN_NAME,
            "@toolsync/builtin/package-meta",
            "@toolsync/builtin/prettier",
        ]
    );

    let report = engine.setup(&resolved, &FsManifestWriter).await.unwrap();
    assert_eq!(report.changed_count(), 4);

    let root = read_manifest(&temp, "");
    assert_eq!(root["scripts"]["format"], json!("prettier --write ."));
    assert_eq!(root["devDependencies"]["prettier"], json!("3.3.3"));

    assert_eq!(
        read_manifest(&temp, "packages/core"),
        json!({
            "name": "@acme/core",
            "license": "MIT",
            "repository": {
                "type": "git",
                "url": "https://github.com/acme/tools",
                "directory": "packages/core"
            },
            "publishConfig": { "access": "public" }
        })
    );
    assert_eq!(
        read_manifest(&temp, "tools/cli")["repository"]["directory"],
        json!("tools/cli")
    );
    assert!(read_manifest(&temp, "packages/internal").get("publishConfig").is_none());
}

#[tokio::test]
async fn test_second_prepare_changes_nothing() {
    let temp = setup_test_repo();

    for expected_changes in [4, 0] {
        let (plugins, config) = config_file_input(&temp);
        let mut engine = Engine::with_catalog(
            discover(temp.path()).unwrap(),
            toolsync_builtin::catalog(),
        );
        let resolved = engine.resolve(plugins, &config).await.unwrap();
        let report = engine.setup(&resolved, &FsManifestWriter).await.unwrap();
        assert_eq!(report.changed_count(), expected_changes);
    }
}

/// Serves `acme:*` references, shadowing the default loader for them.
struct AcmeLoader;

/// Owns a `steps` list other plugins extend, and writes it as a script.
struct Pipeline;

/// Adds a lint step into the pipeline through array operators.
struct LintStep;

#[async_trait]
impl Plugin for AcmeLoader {
    fn name(&self) -> &str {
        "acme:loader"
    }

    async fn load_module(
        &self,
        reference: &str,
        _ctx: &ModuleContext<'_>,
    ) -> HookResult<Option<Arc<dyn Plugin>>> {
        Ok(match reference {
            "acme:pipeline" => Some(Arc::new(Pipeline)),
            "acme:lint" => Some(Arc::new(LintStep)),
            _ => None,
        })
    }

    async fn load_config(
        &self,
        _options: &Value,
        _ctx: &ConfigContext<'_>,
    ) -> HookResult<Option<LoadConfigResult>> {
        Ok(Some(LoadConfigResult::new().with_plugins(["acme:pipeline", "acme:lint"])))
    }
}

#[async_trait]
impl Plugin for Pipeline {
    fn name(&self) -> &str {
        "acme:pipeline"
    }

    async fn load_config(
        &self,
        _options: &Value,
        _ctx: &ConfigContext<'_>,
    ) -> HookResult<Option<LoadConfigResult>> {
        let steps = vec![
            json!({ "id": "build", "run": "tsc -b" }),
            json!({ "id": "test", "run": "vitest run" }),
        ];
        Ok(Some(
            LoadConfigResult::new().with_options(self.name(), json!({ "steps": steps }))?,
        ))
    }

    async fn setup_package(&self, package: &mut Package, ctx: &SetupContext<'_>) -> HookResult<()> {
        if !package.is_root {
            return Ok(());
        }
        let steps = ctx.options["steps"].as_array().ok_or("steps must be an array")?;
        let commands: Vec<&str> = steps.iter().filter_map(|s| s["run"].as_str()).collect();
        package.manifest["scripts"]["ci"] = json!(commands.join(" && "));
        Ok(())
    }
}

#[async_trait]
impl Plugin for LintStep {
    fn name(&self) -> &str {
        "acme:lint"
    }

    async fn load_config(
        &self,
        _options: &Value,
        _ctx: &ConfigContext<'_>,
    ) -> HookResult<Option<LoadConfigResult>> {
        let steps = vec![
            ArrayOp::insert_before("test", json!({ "id": "lint", "run": "eslint ." })).into_value(),
            ArrayOp::update("build", json!({ "run": "tsc -b --force" })).into_value(),
        ];
        Ok(Some(
            LoadConfigResult::new().with_options("acme:pipeline", json!({ "steps": steps }))?,
        ))
    }
}

#[tokio::test]
async fn test_plugins_extend_each_other_through_array_operators() {
    let temp = TempDir::new().unwrap();
    write(&temp, "package.json", r#"{ "name": "acme", "scripts": {} }"#);
    let mut engine = Engine::new(discover(temp.path()).unwrap());

    let resolved = engine
        .resolve(vec![PluginRef::plugin(AcmeLoader)], &Map::new())
        .await
        .unwrap();
    engine.setup(&resolved, &FsManifestWriter).await.unwrap();

    assert_eq!(
        resolved.options("acme:pipeline"),
        Some(&json!({ "steps": [
            { "id": "build", "run": "tsc -b --force" },
            { "id": "lint", "run": "eslint ." },
            { "id": "test", "run": "vitest run" }
        ] }))
    );
    assert_eq!(
        read_manifest(&temp, "")["scripts"]["ci"],
        json!("tsc -b --force && eslint . && vitest run")
    );
}

#[tokio::test]
async fn test_invalid_config_file_reports_the_plugin() {
    let temp = setup_test_repo();
    write(&temp, "toolsync.toml", "plugins = [");
    let (plugins, config) = config_file_input(&temp);
    let engine = Engine::with_catalog(
        discover(temp.path()).unwrap(),
        toolsync_builtin::catalog(),
    );

    let err = engine.resolve(plugins, &config).await.unwrap_err();

    assert!(
        err.to_string().contains(CONFIG_FILE_PLUGIN_NAME),
        "got: {err}"
    );
}
