//! Cache store abstraction for parsed annotation results.
//!
//! A successful load is persisted as one flat JSON blob keyed by a
//! caller-provided path, and read back verbatim on the next run, bypassing
//! parsing and sampling entirely. Nothing validates that a cached blob
//! still matches the source file; invalidating a stale cache is the
//! caller's job.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LoadError;
use crate::record::ImageRecord;

/// The blob persisted after a successful load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub images: Vec<ImageRecord>,
    pub seen_labels: HashMap<String, usize>,
    pub split_len: usize,
}

/// Storage for cache records, injected into the loader so tests can swap
/// the filesystem out for an in-memory map.
pub trait CacheStore {
    fn get(&self, key: &Path) -> Result<Option<CacheRecord>, LoadError>;
    fn put(&self, key: &Path, record: &CacheRecord) -> Result<(), LoadError>;
}

/// Cache store backed by one JSON file per key.
///
/// A missing file is a miss; an unreadable or undecodable file is
/// [`LoadError::CacheCorrupt`] rather than a silent miss. Writes are not
/// atomic and the file is not locked; a crash mid-write leaves the blob
/// absent or corrupt and the load simply has to re-run.
#[derive(Debug, Default)]
pub struct FileCacheStore;

impl CacheStore for FileCacheStore {
    fn get(&self, key: &Path) -> Result<Option<CacheRecord>, LoadError> {
        let contents = match fs::read_to_string(key) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No cache blob at {:?}", key);
                return Ok(None);
            }
            Err(e) => {
                return Err(LoadError::Io {
                    path: key.to_path_buf(),
                    source: e,
                })
            }
        };
        let record = serde_json::from_str(&contents).map_err(|e| LoadError::CacheCorrupt {
            path: key.to_path_buf(),
            source: e,
        })?;
        debug!("Cache hit at {:?}", key);
        Ok(Some(record))
    }

    fn put(&self, key: &Path, record: &CacheRecord) -> Result<(), LoadError> {
        let json = serde_json::to_string(record).map_err(LoadError::CacheEncode)?;
        fs::write(key, json).map_err(|e| LoadError::Io {
            path: key.to_path_buf(),
            source: e,
        })?;
        info!("Cache written to {:?}", key);
        Ok(())
    }
}

/// In-memory cache store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    records: Mutex<HashMap<PathBuf, CacheRecord>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &Path) -> Result<Option<CacheRecord>, LoadError> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(key).cloned())
    }

    fn put(&self, key: &Path, record: &CacheRecord) -> Result<(), LoadError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.insert(key.to_path_buf(), record.clone());
        Ok(())
    }
}
