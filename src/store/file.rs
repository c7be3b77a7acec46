//! Durable directory-backed lock store.
//!
//! # Layout
//!
//! Each lease lives in its own file holding the JSON-serialized [`Lock`].
//! Ids of up to `MAX_HEX_ID_LEN` bytes are stored as `<hex(file_id)>.lock`;
//! longer ids (deep document paths) as `sha256-<hex(sha256(file_id))>.lock`,
//! so every name stays well under the file system's name limit. Both forms
//! keep arbitrary identifiers safe as file names.
//!
//! # Atomicity
//!
//! Record writes use [`atomic_write`], so a reader never sees a torn record
//! and a crash leaves either the old or the new record behind. The
//! read-compare-write of `compare_and_swap` is serialized per key by a striped
//! mutex, which makes the store safe for any number of threads in the one
//! process that owns the directory.
//!
//! # Recovery
//!
//! Opening a store removes temporary files left by an interrupted write.
//! Records that cannot be read or parsed are reported as
//! `StoreUnavailable`; they are never treated as absent.

use super::stripes::Stripes;
use super::{DEFAULT_STRIPES, LockStore};
use crate::error::{LeaseError, Result};
use crate::fs::{atomic_write_file, is_temp_file, remove_durable};
use crate::ids::FileId;
use crate::locks::Lock;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extension of lease record files.
const RECORD_EXTENSION: &str = "lock";

/// Longest id (in bytes) named by its plain hex encoding.
pub(crate) const MAX_HEX_ID_LEN: usize = 100;

/// Prefix of record names derived from a digest of the id.
const DIGEST_PREFIX: &str = "sha256-";

/// File name of the record for `file_id`.
fn record_file_name(file_id: &FileId) -> String {
    let raw = file_id.as_str().as_bytes();
    if raw.len() <= MAX_HEX_ID_LEN {
        format!("{}.{}", hex::encode(raw), RECORD_EXTENSION)
    } else {
        format!(
            "{}{}.{}",
            DIGEST_PREFIX,
            hex::encode(Sha256::digest(raw)),
            RECORD_EXTENSION
        )
    }
}

/// Lease records persisted as one JSON file per file id.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    stripes: Stripes<()>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            LeaseError::store(
                format!("failed to create lock directory '{}'", dir.display()),
                e,
            )
        })?;

        let store = Self {
            dir,
            stripes: Stripes::new(DEFAULT_STRIPES),
        };
        store.remove_stale_temp_files()?;
        Ok(store)
    }

    fn record_path(&self, file_id: &FileId) -> PathBuf {
        self.dir.join(record_file_name(file_id))
    }

    fn read_dir(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            LeaseError::store(
                format!("failed to read lock directory '{}'", self.dir.display()),
                e,
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| LeaseError::store("failed to read lock directory entry", e))?;
            paths.push(entry.path());
        }
        Ok(paths)
    }

    /// Paths of every lease record currently on disk.
    fn record_paths(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .read_dir()?
            .into_iter()
            .filter(|path| {
                !is_temp_file(path)
                    && path.extension().and_then(|e| e.to_str()) == Some(RECORD_EXTENSION)
            })
            .collect())
    }

    fn remove_stale_temp_files(&self) -> Result<()> {
        let mut removed = 0;
        for path in self.read_dir()?.into_iter().filter(|p| is_temp_file(p)) {
            if remove_durable(&path)? {
                removed += 1;
            }
        }
        if removed > 0 {
            warn!(
                dir = %self.dir.display(),
                removed,
                "removed temporary files left by an interrupted write"
            );
        }
        Ok(())
    }

    fn write_record(&self, path: &Path, lock: &Lock) -> Result<()> {
        let json = serde_json::to_string_pretty(lock)
            .map_err(|e| LeaseError::store("failed to serialize lock record", e))?;
        atomic_write_file(path, &json)
    }
}

/// Read the record at `path`; a missing file is `None`.
fn read_record(path: &Path) -> Result<Option<Lock>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(LeaseError::store(
                format!("failed to read lock file '{}'", path.display()),
                e,
            ));
        }
    };

    let lock: Lock = serde_json::from_str(&content).map_err(|e| {
        LeaseError::store(format!("failed to parse lock file '{}'", path.display()), e)
    })?;

    let expected_name = record_file_name(&lock.file_id);
    if path.file_name().and_then(|s| s.to_str()) != Some(expected_name.as_str()) {
        return Err(LeaseError::StoreUnavailable(format!(
            "lock file '{}' holds a record for '{}'",
            path.display(),
            lock.file_id
        )));
    }

    Ok(Some(lock))
}

impl LockStore for FileStore {
    fn get(&self, file_id: &FileId) -> Result<Option<Lock>> {
        read_record(&self.record_path(file_id))
    }

    fn compare_and_swap(
        &self,
        file_id: &FileId,
        expected: Option<&Lock>,
        new: Option<&Lock>,
    ) -> Result<bool> {
        let _guard = self.stripes.lock(file_id)?;
        let path = self.record_path(file_id);

        let current = read_record(&path)?;
        if current.as_ref() != expected {
            return Ok(false);
        }

        match new {
            Some(lock) => self.write_record(&path, lock)?,
            None => {
                remove_durable(&path)?;
            }
        }
        Ok(true)
    }

    fn list_all(&self, now: DateTime<Utc>) -> Result<Vec<FileId>> {
        let mut ids = Vec::new();
        for path in self.record_paths()? {
            // Released between listing and reading: simply gone.
            if let Some(lock) = read_record(&path)?
                && lock.is_active_at(now)
            {
                ids.push(lock.file_id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut removed = 0;
        for path in self.record_paths()? {
            let Some(seen) = read_record(&path)? else {
                continue;
            };
            if !seen.is_expired_at(cutoff) {
                continue;
            }

            // Re-check under the key guard; the owner may have refreshed.
            let _guard = self.stripes.lock(&seen.file_id)?;
            match read_record(&path)? {
                Some(current) if current.is_expired_at(cutoff) => {
                    if remove_durable(&path)? {
                        debug!(file_id = %current.file_id, "evicted expired lease");
                        removed += 1;
                    }
                }
                _ => {}
            }
        }
        Ok(removed)
    }
}
