// Rentals kept as one JSON document on disk.
//
// Every append rewrites the whole document: read, decode, push, encode,
// write to a sibling temp file, rename over the original. Appends to the
// same path are serialized through a process-wide lock so concurrent
// writers can't drop each other's records.

use crate::core::codec::RecordCodec;
use crate::db::models::{RecordCollection, RentalRecord};
use crate::error::{RentalError, Result};
use std::collections::HashMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

type PathLock = Arc<Mutex<()>>;

// One lock per resolved file path, shared by every store instance in the
// process. Entries are never removed; there is one per distinct file.
static PATH_LOCKS: LazyLock<std::sync::Mutex<HashMap<PathBuf, PathLock>>> =
    LazyLock::new(|| std::sync::Mutex::new(HashMap::new()));

fn lock_for(path: &Path) -> PathLock {
    let key = lock_key(path);
    let mut locks = PATH_LOCKS.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(locks.entry(key).or_default())
}

/// Resolve `path` so every spelling of the same file maps to one key.
///
/// The deepest existing ancestor is canonicalized (symlinks, `..`); the
/// components below it don't exist yet and are folded lexically.
fn lock_key(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut missing: Vec<Component<'_>> = Vec::new();
    let mut existing = absolute.as_path();
    let mut key = loop {
        if let Ok(real) = std::fs::canonicalize(existing) {
            break real;
        }
        match existing.parent() {
            Some(parent) => {
                missing.extend(existing.components().next_back());
                existing = parent;
            }
            None => break PathBuf::new(),
        }
    };

    for component in missing.into_iter().rev() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                key.pop();
            }
            other => key.push(other),
        }
    }
    key
}

#[derive(Clone)]
pub struct FileRecordStore {
    path: PathBuf,
    lock: PathLock,
}

impl FileRecordStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let lock = lock_for(&path);
        Self { path, lock }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record and persist the whole collection
    ///
    /// The record gets the next free id (one past the highest stored id).
    /// If the existing file can't be decoded nothing is written and
    /// `CorruptStore` is returned.
    pub async fn append(&self, record: RentalRecord) -> Result<RentalRecord> {
        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut records = match self.read_existing().await? {
            Some(records) => records,
            None => {
                tracing::info!(path = %self.path.display(), "creating new rentals file");
                Vec::new()
            }
        };

        let next_id = records.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1;
        let stored = record.with_id(next_id);
        records.push(stored.clone());

        self.write_atomic(&records).await?;

        tracing::info!(
            path = %self.path.display(),
            id = next_id,
            total = records.len(),
            "rental appended"
        );
        Ok(stored)
    }

    /// Everything stored so far. A missing file is an empty collection.
    pub async fn list(&self) -> Result<RecordCollection> {
        let records = self.read_existing().await?.unwrap_or_default();
        tracing::debug!(path = %self.path.display(), total = records.len(), "listed rentals file");
        Ok(records)
    }

    async fn read_existing(&self) -> Result<Option<RecordCollection>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match RecordCodec::decode_slice(&bytes) {
            Ok(records) => Ok(Some(records)),
            Err(RentalError::MalformedDocument(reason)) => {
                tracing::warn!(path = %self.path.display(), %reason, "rentals file is corrupt");
                Err(RentalError::CorruptStore {
                    path: self.path.clone(),
                    reason,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn write_atomic(&self, records: &[RentalRecord]) -> Result<()> {
        let bytes = RecordCodec::to_bytes(records)?;
        let tmp_path = self.tmp_path();

        let written = async {
            let mut file = tokio::fs::File::create(&tmp_path).await?;
            file.write_all(&bytes).await?;
            file.sync_all().await?;
            tokio::fs::rename(&tmp_path, &self.path).await
        }
        .await;

        if let Err(e) = written {
            // Leave the previous document as it was; just drop the partial temp file.
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}
