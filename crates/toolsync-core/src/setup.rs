//! Per-package setup dispatch
//!
//! After resolution, every plugin's `setup_package` hook runs against every
//! package: root package first, then the members in discovery order, and for
//! each package the plugins in final list order. All plugins see the same
//! in-memory manifest; it is written once per package after the last plugin
//! ran, and only if it changed.

use crate::context::{PluginLogger, SetupContext};
use crate::resolver::Resolved;
use crate::{Error, Result};
use serde_json::Value;
use std::sync::Mutex;
use toolsync_fs::{NormalizedPath, Package, Workspace, io};

/// Persists a package manifest after setup.
pub trait ManifestWriter: Send + Sync {
    fn write(&self, package: &Package) -> toolsync_fs::Result<()>;
}

/// Writes `package.json` back to the package directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsManifestWriter;

impl ManifestWriter for FsManifestWriter {
    fn write(&self, package: &Package) -> toolsync_fs::Result<()> {
        io::write_json(&package.manifest_path(), &package.manifest)
    }
}

/// Collects manifests instead of writing them, for previews and tests.
#[derive(Debug, Default)]
pub struct DryRunWriter {
    written: Mutex<Vec<(NormalizedPath, Value)>>,
}

impl DryRunWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manifests that would have been written, in write order.
    pub fn written(&self) -> Vec<(NormalizedPath, Value)> {
        self.written
            .lock()
            .map(|w| w.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl ManifestWriter for DryRunWriter {
    fn write(&self, package: &Package) -> toolsync_fs::Result<()> {
        tracing::info!(path = %package.manifest_path(), "Would write manifest (dry run)");
        let mut written = self
            .written
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        written.push((package.manifest_path(), package.manifest.clone()));
        Ok(())
    }
}

/// Result of setting up one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutcome {
    pub package: String,
    pub is_root: bool,
    /// Whether plugins changed the manifest (and it was written)
    pub changed: bool,
}

/// Report of a setup pass over the whole workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupReport {
    pub packages: Vec<PackageOutcome>,
}

impl SetupReport {
    pub fn changed(&self) -> impl Iterator<Item = &PackageOutcome> {
        self.packages.iter().filter(|p| p.changed)
    }

    pub fn changed_count(&self) -> usize {
        self.changed().count()
    }
}

/// Display label for a package in logs and errors.
pub fn package_label(package: &Package) -> String {
    if package.relative_dir.as_str().is_empty() {
        "<root>".to_string()
    } else {
        package.relative_dir.to_string()
    }
}

/// Run every plugin's setup hook against every package in `workspace`.
///
/// Fails fast: an error in any package stops the pass, leaving earlier
/// packages written.
pub async fn setup_workspace(
    resolved: &Resolved,
    workspace: &mut Workspace,
    writer: &dyn ManifestWriter,
) -> Result<SetupReport> {
    let mut report = SetupReport::default();
    let root_dir = workspace.root_dir.clone();

    if let Some(root) = workspace.root_package.as_mut() {
        let snapshot = root.clone();
        let outcome = setup_package(resolved, root, &root_dir, Some(&snapshot), writer).await?;
        report.packages.push(outcome);
    }

    for package in workspace.packages.iter_mut() {
        let outcome = setup_package(
            resolved,
            package,
            &root_dir,
            workspace.root_package.as_ref(),
            writer,
        )
        .await?;
        report.packages.push(outcome);
    }

    tracing::info!(
        packages = report.packages.len(),
        changed = report.changed_count(),
        "Setup complete"
    );
    Ok(report)
}

/// Run every plugin's setup hook against one package, then persist it.
pub async fn setup_package(
    resolved: &Resolved,
    package: &mut Package,
    root_dir: &NormalizedPath,
    root_package: Option<&Package>,
    writer: &dyn ManifestWriter,
) -> Result<PackageOutcome> {
    let label = package_label(package);
    let before = package.manifest.clone();
    let empty = Value::Object(Default::default());

    for plugin in resolved.plugins() {
        let ctx = SetupContext {
            log: PluginLogger::new(plugin.name()),
            options: resolved.options(plugin.name()).unwrap_or(&empty),
            root_dir,
            root_package,
        };
        tracing::trace!(package = %label, plugin = %plugin.name(), "Running setup hook");
        plugin
            .setup_package(package, &ctx)
            .await
            .map_err(|source| Error::Setup {
                package: label.clone(),
                plugin: plugin.name().to_string(),
                source,
            })?;
    }

    let changed = package.manifest != before;
    if changed {
        writer.write(package).map_err(|source| Error::Persist {
            package: label.clone(),
            source,
        })?;
        tracing::info!(package = %label, "Updated manifest");
    } else {
        tracing::debug!(package = %label, "Manifest unchanged");
    }

    Ok(PackageOutcome {
        package: label,
        is_root: package.is_root,
        changed,
    })
}
