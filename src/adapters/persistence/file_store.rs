//! File Store - Atomic One-File-Per-Key Storage
//!
//! Implements the `KeyValueStore` port on the local filesystem. Each key
//! maps to `<data_dir>/<sanitized key>.json`. Values are written to a
//! uniquely named temp file and then renamed into place, so a reader
//! always sees either the old or the new value, never a partial write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, instrument};

use crate::ports::key_value::KeyValueStore;

/// Filesystem-backed key-value store.
pub struct FileKeyValueStore {
    /// Directory holding one file per key.
    data_dir: PathBuf,
    /// Sequence for temp file names; overlapping writes never share one.
    tmp_seq: AtomicU64,
}

impl FileKeyValueStore {
    /// Create a store rooted at `data_dir`, creating the directory if needed.
    pub async fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = data_dir.as_ref();
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;

        Ok(Self {
            data_dir: dir.to_path_buf(),
            tmp_seq: AtomicU64::new(0),
        })
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", sanitize_key(key)))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Map a storage key onto a safe file stem.
///
/// Characters outside `[A-Za-z0-9._-]` become `_`, so `@players_data`
/// is stored as `_players_data.json`.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    #[instrument(skip(self))]
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No stored value");
                Ok(None)
            }
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let seq = self.tmp_seq.fetch_add(1, Ordering::Relaxed);
        let tmp_path = self
            .data_dir
            .join(format!("{}.{seq}.tmp", sanitize_key(key)));

        // Write to tmp file
        fs::write(&tmp_path, value)
            .await
            .context("Failed to write tmp value file")?;

        // Atomic rename
        fs::rename(&tmp_path, &path)
            .await
            .context("Failed to rename value file")?;

        debug!(path = %path.display(), "Value written");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}
