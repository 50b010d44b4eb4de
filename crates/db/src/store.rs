//! Whole-document JSON persistence for the catalog.
//!
//! The document is read in full and written in full; there is no incremental
//! path. Writes go to a sibling temp file which is then renamed over the
//! document, so a concurrent reader sees either the old or the new catalog.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bookstock_core::catalog::Catalog;
use tokio::sync::{Mutex, MutexGuard};

use crate::error::StoreError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Handle to one catalog document on disk.
///
/// Cheap to clone; clones share the same writer lock.
#[derive(Debug, Clone)]
pub struct BookStore {
    path: PathBuf,
    write_lock: Option<Arc<Mutex<()>>>,
}

impl BookStore {
    /// `serialize_writes` enables a per-store lock that callers hold across a
    /// read-modify-write (see [`BookStore::write_guard`]).
    pub fn new(path: impl Into<PathBuf>, serialize_writes: bool) -> Self {
        Self {
            path: path.into(),
            write_lock: serialize_writes.then(|| Arc::new(Mutex::new(()))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn serializes_writes(&self) -> bool {
        self.write_lock.is_some()
    }

    /// Acquire the writer lock, if enabled. Hold the guard for the whole
    /// load-mutate-save sequence.
    pub async fn write_guard(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    /// Read and parse the whole document.
    pub async fn load(&self) -> Result<Catalog, StoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Serialize the whole catalog (2-space pretty print) and replace the
    /// document with it.
    pub async fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(catalog).map_err(StoreError::Encode)?;
        let tmp = self.temp_path();

        if let Err(source) = tokio::fs::write(&tmp, &bytes).await {
            return Err(StoreError::Write { path: tmp, source });
        }

        if let Err(source) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::Write {
                path: self.path.clone(),
                source,
            });
        }

        tracing::debug!(path = %self.path.display(), books = catalog.len(), "Catalog saved");
        Ok(())
    }

    /// Create an empty document (and its parent directory) if none exists.
    /// Temp files left behind by an earlier process are removed first.
    ///
    /// Returns `true` when a new document was written.
    pub async fn init_if_missing(&self) -> Result<bool, StoreError> {
        self.remove_stale_temp_files().await?;

        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;
        if exists {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        self.save(&Catalog::default()).await?;
        tracing::info!(path = %self.path.display(), "Created empty catalog document");
        Ok(true)
    }

    /// Delete `<document>.*.tmp` siblings. Only safe before this process
    /// starts writing.
    pub async fn remove_stale_temp_files(&self) -> Result<usize, StoreError> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };
        let prefix = format!("{}.", self.file_name().to_string_lossy());

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(source) => return Err(StoreError::Read { path: dir, source }),
        };

        let mut removed = 0;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(source) => return Err(StoreError::Read { path: dir, source }),
            };
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !(name.starts_with(&prefix) && name.ends_with(".tmp")) {
                continue;
            }

            let path = entry.path();
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::warn!(path = %path.display(), "Removed stale catalog temp file");
                    removed += 1;
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "Could not remove stale temp file");
                }
            }
        }
        Ok(removed)
    }

    fn file_name(&self) -> OsString {
        self.path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("catalog"))
    }

    /// Unique per call so unlocked concurrent writers never share a temp file.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.file_name();
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        name.push(format!(".{}.{n}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }
}
