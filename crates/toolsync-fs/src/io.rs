//! Atomic I/O operations with file locking

use crate::{Error, NormalizedPath, Result};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so a manifest is never left half written.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file lives in the same directory so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    let written = finish_temp_file(&mut temp_file, &temp_path, content).and_then(|()| {
        fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))
    });
    if let Err(err) = written {
        drop(temp_file);
        if let Err(cleanup) = fs::remove_file(&temp_path) {
            tracing::warn!(path = %temp_path.display(), error = %cleanup, "Failed to remove temp file");
        }
        return Err(err);
    }

    tracing::trace!(path = %path, bytes = content.len(), "Wrote file atomically");
    Ok(())
}

/// Lock, fill and flush the temp file.
fn finish_temp_file(file: &mut fs::File, temp_path: &Path, content: &[u8]) -> Result<()> {
    file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: temp_path.to_path_buf(),
    })?;
    file.write_all(content).map_err(|e| Error::io(temp_path, e))?;
    file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    FileExt::unlock(&*file).map_err(|_| Error::LockFailed {
        path: temp_path.to_path_buf(),
    })
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Serialize a JSON value the way package manifests are usually formatted:
/// two-space indentation and a trailing newline.
pub fn write_json(path: &NormalizedPath, value: &serde_json::Value) -> Result<()> {
    let mut content =
        serde_json::to_string_pretty(value).map_err(|e| Error::ConfigSerialize {
            path: path.to_native(),
            format: "JSON".into(),
            message: e.to_string(),
        })?;
    content.push('\n');
    write_atomic(path, content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn write_atomic_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = NormalizedPath::new(temp.path()).join("nested/dir/file.txt");

        write_atomic(&path, b"hello").unwrap();

        assert_eq!(read_text(&path).unwrap(), "hello");
    }

    #[test]
    fn write_atomic_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = NormalizedPath::new(temp.path()).join("file.txt");

        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(entries, vec!["file.txt".to_string()]);
        assert_eq!(read_text(&path).unwrap(), "two");
    }

    #[test]
    fn failed_write_removes_temp_file() {
        let temp = TempDir::new().unwrap();
        // A non-empty directory in the way makes the final rename fail
        std::fs::create_dir_all(temp.path().join("file.txt/occupied")).unwrap();
        let path = NormalizedPath::new(temp.path()).join("file.txt");

        let err = write_atomic(&path, b"data").unwrap_err();

        assert!(matches!(err, Error::Io { .. }), "got: {err}");
        let entries: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(entries, vec!["file.txt".to_string()]);
    }

    #[test]
    fn write_json_appends_trailing_newline() {
        let temp = TempDir::new().unwrap();
        let path = NormalizedPath::new(temp.path()).join("package.json");

        write_json(&path, &json!({ "name": "demo" })).unwrap();

        assert_eq!(read_text(&path).unwrap(), "{\n  \"name\": \"demo\"\n}\n");
    }

    #[test]
    fn read_text_reports_path_on_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = NormalizedPath::new(temp.path()).join("missing.json");

        let err = read_text(&path).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
