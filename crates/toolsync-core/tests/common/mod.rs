#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use toolsync_core::{
    ConfigContext, HookResult, LoadConfigResult, ModuleContext, Plugin, PluginRef, SetupContext,
};
use toolsync_fs::{NormalizedPath, Package, Workspace};

/// Shared record of hook invocations: `(plugin, options seen)`.
#[derive(Debug, Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<(String, Value)>>>);

impl Calls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, plugin: &str, options: &Value) {
        self.0
            .lock()
            .unwrap()
            .push((plugin.to_string(), options.clone()));
    }

    pub fn names(&self) -> Vec<String> {
        self.0.lock().unwrap().iter().map(|(n, _)| n.clone()).collect()
    }

    /// `(plugin, package)` pairs recorded by [`SetupPlugin`].
    pub fn entries(&self) -> Vec<(String, String)> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .map(|(n, o)| {
                let package = o["package"].as_str().unwrap_or_default().to_string();
                (n.clone(), package)
            })
            .collect()
    }

    pub fn options_seen_by(&self, plugin: &str) -> Vec<Value> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(n, _)| n == plugin)
            .map(|(_, o)| o.clone())
            .collect()
    }

    pub fn count(&self, plugin: &str) -> usize {
        self.options_seen_by(plugin).len()
    }
}

/// A plugin whose `load_config` returns a fixed result and records the call.
pub struct ConfigPlugin {
    name: String,
    plugins: Vec<String>,
    config: Option<Map<String, Value>>,
    calls: Calls,
}

impl ConfigPlugin {
    pub fn new(name: &str, calls: &Calls) -> Self {
        Self {
            name: name.to_string(),
            plugins: Vec::new(),
            config: None,
            calls: calls.clone(),
        }
    }

    pub fn requests(mut self, plugins: &[&str]) -> Self {
        self.plugins = plugins.iter().map(|p| p.to_string()).collect();
        self
    }

    /// `config` must be a JSON object.
    pub fn contributes(mut self, config: Value) -> Self {
        self.config = config.as_object().cloned();
        self
    }

    pub fn into_ref(self) -> PluginRef {
        PluginRef::plugin(self)
    }
}

#[async_trait]
impl Plugin for ConfigPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load_config(
        &self,
        options: &Value,
        _ctx: &ConfigContext<'_>,
    ) -> HookResult<Option<LoadConfigResult>> {
        self.calls.record(&self.name, options);
        if self.plugins.is_empty() && self.config.is_none() {
            return Ok(None);
        }
        let mut result = LoadConfigResult::new().with_plugins(self.plugins.clone());
        if let Some(config) = &self.config {
            result = result.with_config(config.clone());
        }
        Ok(Some(result))
    }
}

/// Resolves `spawn-N` to a plugin that requests `spawn-(N+1)`, forever.
pub struct SpawnLoader;

struct Spawned {
    n: u64,
    name: String,
}

#[async_trait]
impl Plugin for SpawnLoader {
    fn name(&self) -> &str {
        "spawn-loader"
    }

    async fn load_module(
        &self,
        reference: &str,
        _ctx: &ModuleContext<'_>,
    ) -> HookResult<Option<Arc<dyn Plugin>>> {
        let Some(n) = reference.strip_prefix("spawn-") else {
            return Ok(None);
        };
        let n: u64 = n.parse()?;
        Ok(Some(Arc::new(Spawned {
            n,
            name: format!("spawn-{n}"),
        })))
    }

    async fn load_config(
        &self,
        _options: &Value,
        _ctx: &ConfigContext<'_>,
    ) -> HookResult<Option<LoadConfigResult>> {
        Ok(Some(LoadConfigResult::new().with_plugin("spawn-0")))
    }
}

#[async_trait]
impl Plugin for Spawned {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load_config(
        &self,
        _options: &Value,
        _ctx: &ConfigContext<'_>,
    ) -> HookResult<Option<LoadConfigResult>> {
        Ok(Some(
            LoadConfigResult::new().with_plugin(format!("spawn-{}", self.n + 1)),
        ))
    }
}

/// A plugin whose `load_config` always fails.
pub struct FailingConfig(pub &'static str);

#[async_trait]
impl Plugin for FailingConfig {
    fn name(&self) -> &str {
        self.0
    }

    async fn load_config(
        &self,
        _options: &Value,
        _ctx: &ConfigContext<'_>,
    ) -> HookResult<Option<LoadConfigResult>> {
        Err("config source unavailable".into())
    }
}

type SetupFn = dyn Fn(&mut Package, &SetupContext<'_>) -> HookResult<()> + Send + Sync;

/// A plugin whose `setup_package` runs a closure and records the package.
pub struct SetupPlugin {
    name: String,
    calls: Calls,
    f: Box<SetupFn>,
}

impl SetupPlugin {
    pub fn new<F>(name: &str, calls: &Calls, f: F) -> Self
    where
        F: Fn(&mut Package, &SetupContext<'_>) -> HookResult<()> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            calls: calls.clone(),
            f: Box::new(f),
        }
    }

    pub fn noop(name: &str, calls: &Calls) -> Self {
        Self::new(name, calls, |_, _| Ok(()))
    }

    pub fn into_ref(self) -> PluginRef {
        PluginRef::plugin(self)
    }
}

#[async_trait]
impl Plugin for SetupPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    async fn setup_package(
        &self,
        package: &mut Package,
        ctx: &SetupContext<'_>,
    ) -> HookResult<()> {
        self.calls.record(
            &self.name,
            &json!({ "package": package.relative_dir.as_str() }),
        );
        (self.f)(package, ctx)
    }
}

/// Write `package.json` into `dir` (relative to `root`).
pub fn write_manifest(root: &TempDir, dir: &str, manifest: Value) {
    let path = root.path().join(dir);
    std::fs::create_dir_all(&path).unwrap();
    std::fs::write(
        path.join("package.json"),
        serde_json::to_string_pretty(&manifest).unwrap(),
    )
    .unwrap();
}

pub fn read_manifest(root: &TempDir, dir: &str) -> Value {
    let content = std::fs::read_to_string(root.path().join(dir).join("package.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// A repository with a root package and two members under `packages/`.
pub fn monorepo() -> TempDir {
    let temp = TempDir::new().unwrap();
    write_manifest(
        &temp,
        "",
        json!({ "name": "root", "private": true, "workspaces": ["packages/*"] }),
    );
    write_manifest(&temp, "packages/a", json!({ "name": "a" }));
    write_manifest(&temp, "packages/b", json!({ "name": "b" }));
    temp
}

pub fn empty_workspace() -> Workspace {
    Workspace::empty(NormalizedPath::new("/repo"))
}
