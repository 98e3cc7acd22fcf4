//! Package discovery for multi-package repositories
//!
//! A [`Workspace`] is the set of packages the engine runs setup hooks
//! against. The root `package.json` declares member packages through its
//! `workspaces` field. Entries are glob patterns relative to the root
//! (`"tools/cli"`, `"packages/*"`, `"apps/**"`); entries starting with `!`
//! exclude matching members. Only directories that contain a manifest count
//! as packages, and anything under `node_modules` is ignored.

use crate::{Error, NormalizedPath, Result, io};
use glob::{MatchOptions, Pattern};
use serde_json::Value;
use std::path::Path;

/// File name of a package manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// A package inside the workspace.
///
/// The manifest is held in memory and handed to plugins mutably; writing it
/// back to disk is the caller's responsibility.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    /// Absolute package directory
    pub dir: NormalizedPath,
    /// Directory relative to the workspace root (empty for the root)
    pub relative_dir: NormalizedPath,
    pub is_root: bool,
    /// Parsed `package.json`
    pub manifest: Value,
}

impl Package {
    pub fn new(
        dir: NormalizedPath,
        relative_dir: NormalizedPath,
        is_root: bool,
        manifest: Value,
    ) -> Self {
        Self {
            dir,
            relative_dir,
            is_root,
            manifest,
        }
    }

    /// Read a package from its directory.
    pub fn load(root: &NormalizedPath, dir: NormalizedPath, is_root: bool) -> Result<Self> {
        let manifest_path = dir.join(MANIFEST_FILE);
        let content = io::read_text(&manifest_path)?;
        let manifest: Value =
            serde_json::from_str(&content).map_err(|e| Error::InvalidManifest {
                path: manifest_path.to_native(),
                message: e.to_string(),
            })?;
        if !manifest.is_object() {
            return Err(Error::InvalidManifest {
                path: manifest_path.to_native(),
                message: "manifest must be a JSON object".to_string(),
            });
        }

        let relative_dir = dir.relative_to(root).unwrap_or_else(|| dir.clone());
        Ok(Self::new(dir, relative_dir, is_root, manifest))
    }

    /// Path of the manifest file.
    pub fn manifest_path(&self) -> NormalizedPath {
        self.dir.join(MANIFEST_FILE)
    }

    /// The `name` field of the manifest, if any.
    pub fn name(&self) -> Option<&str> {
        self.manifest.get("name").and_then(Value::as_str)
    }
}

/// The discovered workspace: a root directory, an optional root package and
/// the member packages (the root package is not repeated in `packages`).
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub root_dir: NormalizedPath,
    pub root_package: Option<Package>,
    pub packages: Vec<Package>,
}

impl Workspace {
    /// A workspace with no packages, used when the engine only resolves config.
    pub fn empty(root_dir: NormalizedPath) -> Self {
        Self {
            root_dir,
            root_package: None,
            packages: Vec::new(),
        }
    }

    /// Number of packages including the root package.
    pub fn len(&self) -> usize {
        self.packages.len() + usize::from(self.root_package.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate packages with the root package first.
    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.root_package.iter().chain(self.packages.iter())
    }
}

/// Discover the workspace rooted at `root`.
///
/// A missing root manifest yields an empty workspace rather than an error;
/// a root manifest that cannot be parsed is an error.
pub fn discover(root: impl AsRef<Path>) -> Result<Workspace> {
    let root_native =
        dunce::canonicalize(root.as_ref()).map_err(|e| Error::io(root.as_ref(), e))?;
    let root_dir = NormalizedPath::new(&root_native);

    if !root_dir.join(MANIFEST_FILE).is_file() {
        tracing::debug!(root = %root_dir, "No root manifest found, workspace is empty");
        return Ok(Workspace::empty(root_dir));
    }

    let root_package = Package::load(&root_dir, root_dir.clone(), true)?;
    let patterns = workspace_patterns(&root_package.manifest);

    let mut members = expand_patterns(&root_dir, &patterns)?;
    members.sort();

    let packages = members
        .into_iter()
        .map(|dir| Package::load(&root_dir, dir, false))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        root = %root_dir,
        packages = packages.len(),
        "Discovered workspace packages"
    );

    Ok(Workspace {
        root_dir,
        root_package: Some(root_package),
        packages,
    })
}

/// Read `workspaces` as either an array or `{ "packages": [...] }`.
fn workspace_patterns(manifest: &Value) -> Vec<String> {
    let entries = match manifest.get("workspaces") {
        Some(Value::Array(entries)) => entries,
        Some(Value::Object(map)) => match map.get("packages") {
            Some(Value::Array(entries)) => entries,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    entries
        .iter()
        .filter_map(Value::as_str)
        .map(String::from)
        .collect()
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

fn invalid_pattern(pattern: &str, err: glob::PatternError) -> Error {
    Error::InvalidWorkspacePattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    }
}

/// Expand workspace patterns into member directories, without the root.
fn expand_patterns(root: &NormalizedPath, patterns: &[String]) -> Result<Vec<NormalizedPath>> {
    let mut includes = Vec::new();
    let mut excludes = Vec::new();
    for raw in patterns {
        let pattern = raw.trim_end_matches('/');
        match pattern.strip_prefix('!') {
            Some(negated) => {
                let negated = negated.trim_start_matches("./");
                excludes.push(Pattern::new(negated).map_err(|e| invalid_pattern(raw, e))?);
            }
            None => includes.push(pattern.trim_start_matches("./")),
        }
    }

    let escaped_root = Pattern::escape(root.as_str());
    let mut members: Vec<NormalizedPath> = Vec::new();
    for pattern in includes {
        let full_pattern = format!("{escaped_root}/{pattern}");
        let entries =
            glob::glob_with(&full_pattern, MATCH_OPTIONS).map_err(|e| invalid_pattern(pattern, e))?;

        let mut matched = false;
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping unreadable path");
                    continue;
                }
            };
            let dir = NormalizedPath::new(&path);
            if !dir.is_dir() || !dir.join(MANIFEST_FILE).is_file() {
                continue;
            }
            let Some(relative) = dir.relative_to(root) else {
                continue;
            };
            let relative = relative.as_str();
            if relative.is_empty() || relative.split('/').any(|s| s == "node_modules") {
                continue;
            }
            if excludes.iter().any(|p| p.matches_with(relative, MATCH_OPTIONS)) {
                tracing::debug!(package = %relative, "Excluded by negated workspace pattern");
                continue;
            }
            matched = true;
            if !members.contains(&dir) {
                members.push(dir);
            }
        }

        if !matched {
            tracing::warn!(%pattern, "Workspace pattern matched no packages");
        }
    }
    Ok(members)
}
