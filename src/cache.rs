// src/cache.rs
//! Durable seen-article cache. The cache exists to skip redundant
//! fetch/summarization cost on reruns, not to suppress output across runs;
//! records are upserted and never deleted by the pipeline.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// One persisted article record, keyed by the `title+link` fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub fingerprint: String,
    pub source: String,
    pub title: String,
    pub body_text: String,
    pub link: String,
    pub processed_at: DateTime<Utc>,
}

/// Storage contract for the pipeline. Upsert is idempotent: repeated
/// upserts with the same fingerprint overwrite prior fields. Implementations
/// must serialize writers; the pipeline assumes one writer at a time.
pub trait CacheStore: Send + Sync {
    fn get(&self, fingerprint: &str) -> Result<Option<CacheRecord>>;
    fn upsert(&self, record: CacheRecord) -> Result<()>;
}

/// File-backed store: a JSON map loaded at open, written through on every
/// upsert. A missing file starts empty; a corrupt file is logged and
/// replaced rather than failing the run.
pub struct JsonFileCache {
    path: PathBuf,
    records: Mutex<HashMap<String, CacheRecord>>,
}

impl JsonFileCache {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading cache file {}", path.display()))?;
            match serde_json::from_str::<HashMap<String, CacheRecord>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "cache file unreadable; starting empty");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, map: &HashMap<String, CacheRecord>) -> Result<()> {
        let json = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing cache file {}", self.path.display()))
    }
}

impl CacheStore for JsonFileCache {
    fn get(&self, fingerprint: &str) -> Result<Option<CacheRecord>> {
        let map = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("cache mutex poisoned"))?;
        Ok(map.get(fingerprint).cloned())
    }

    fn upsert(&self, record: CacheRecord) -> Result<()> {
        let mut map = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("cache mutex poisoned"))?;
        map.insert(record.fingerprint.clone(), record);
        self.persist(&map)
    }
}

/// In-memory store for tests and dry runs.
#[derive(Default)]
pub struct MemoryCache {
    records: Mutex<HashMap<String, CacheRecord>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, fingerprint: &str) -> Result<Option<CacheRecord>> {
        let map = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("cache mutex poisoned"))?;
        Ok(map.get(fingerprint).cloned())
    }

    fn upsert(&self, record: CacheRecord) -> Result<()> {
        let mut map = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("cache mutex poisoned"))?;
        map.insert(record.fingerprint.clone(), record);
        Ok(())
    }
}
