//! Atomic filesystem operations.
//!
//! All atomic writes follow this pattern:
//! 1. Write content to a temporary file in the same directory
//! 2. Sync the file to disk (fsync)
//! 3. Rename it over the target
//! 4. Sync the parent directory so the rename itself is durable (POSIX)
//!
//! `std::fs::rename` replaces an existing target on every supported platform.
//! Source and destination must be on the same filesystem, which holds because
//! the temporary file lives next to the target.
//!
//! On crash, a temporary file may remain (named `.{filename}.tmp`). Callers
//! that own a directory are expected to sweep these up on open.
//!
//! The temp name is fixed per target, so concurrent writers to the same path
//! must be serialized by the caller.

use crate::error::{LeaseError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Suffix of in-flight temporary files.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Atomically write bytes to a file.
///
/// The target is never observable in a partial state: readers see either the
/// old content or the new content.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            LeaseError::store(
                format!("failed to create parent directory '{}'", parent.display()),
                e,
            )
        })?;
    }

    let temp_path = temp_path_for(path)?;
    write_and_sync(&temp_path, content)?;
    replace(&temp_path, path)?;

    Ok(())
}

/// Atomically write a string to a file.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Remove a file and make the removal durable.
///
/// Returns `false` if the file did not exist.
pub fn remove_durable<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => {
            sync_parent(path);
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(LeaseError::store(
            format!("failed to remove '{}'", path.display()),
            e,
        )),
    }
}

/// Whether `path` names an in-flight temporary file left by `atomic_write`.
pub fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.') && n.ends_with(TEMP_SUFFIX))
}

/// Temporary file path in the same directory as the target.
fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            LeaseError::StoreUnavailable(format!("invalid file path '{}'", target.display()))
        })?;

    Ok(parent.join(format!(".{}{}", filename, TEMP_SUFFIX)))
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        LeaseError::store(
            format!("failed to create temporary file '{}'", path.display()),
            e,
        )
    })?;

    file.write_all(content).map_err(|e| {
        let _ = fs::remove_file(path);
        LeaseError::store("failed to write to temporary file", e)
    })?;

    file.sync_all().map_err(|e| {
        let _ = fs::remove_file(path);
        LeaseError::store("failed to sync temporary file to disk", e)
    })?;

    Ok(())
}

fn replace(source: &Path, target: &Path) -> Result<()> {
    fs::rename(source, target).map_err(|e| {
        let _ = fs::remove_file(source);
        LeaseError::store(
            format!("failed to atomically replace '{}'", target.display()),
            e,
        )
    })?;

    sync_parent(target);
    Ok(())
}

/// Best-effort fsync of the directory entry holding `path`.
#[cfg(unix)]
fn sync_parent(path: &Path) {
    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.lock");

        atomic_write(&file_path, b"hello world").unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "hello world");
    }

    #[test]
    fn test_atomic_write_replace_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.lock");

        fs::write(&file_path, "original content").unwrap();
        atomic_write_file(&file_path, "new content").unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "new content");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("locks").join("a.lock");

        atomic_write(&file_path, b"nested content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "nested content");
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.lock");

        atomic_write(&file_path, b"content").unwrap();

        assert!(!temp_dir.path().join(".test.lock.tmp").exists());
    }

    #[test]
    fn test_temp_path_naming() {
        let temp = temp_path_for(Path::new("/var/locks/abc.lock")).unwrap();

        assert_eq!(temp, Path::new("/var/locks/.abc.lock.tmp"));
        assert!(is_temp_file(&temp));
        assert!(!is_temp_file(Path::new("/var/locks/abc.lock")));
    }

    #[test]
    fn test_remove_durable() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("gone.lock");
        fs::write(&file_path, "x").unwrap();

        assert!(remove_durable(&file_path).unwrap());
        assert!(!file_path.exists());
        assert!(!remove_durable(&file_path).unwrap());
    }

    #[test]
    fn test_write_into_missing_root_fails_as_store_error() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where a directory is expected.
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = atomic_write(blocker.join("a.lock"), b"x").unwrap_err();
        assert!(matches!(err, LeaseError::StoreUnavailable(_)));
    }

    #[test]
    fn test_atomic_write_concurrent_different_files() {
        let temp_dir = TempDir::new().unwrap();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let path = temp_dir.path().join(format!("file_{}.lock", i));
                let content = format!("content {}", i);
                std::thread::spawn(move || {
                    atomic_write_file(&path, &content).unwrap();
                    (path, content)
                })
            })
            .collect();

        for handle in handles {
            let (path, expected_content) = handle.join().unwrap();
            assert_eq!(fs::read_to_string(&path).unwrap(), expected_content);
        }
    }
}
