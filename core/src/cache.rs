//! Dataset cache keyed by input-file fingerprints.
//!
//! Meant to be owned by a presentation layer that reloads the same inputs
//! repeatedly. An entry is reused only while every input file still has
//! the fingerprint recorded at load time. Writes made through the store
//! are invisible to the cache: call `invalidate` or `clear` after them.

use crate::error::AnalyticsResult;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl Fingerprint {
    pub fn of(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

struct Entry<T> {
    fingerprints: Vec<Fingerprint>,
    value: Arc<T>,
}

pub struct DatasetCache<T> {
    entries: HashMap<Vec<PathBuf>, Entry<T>>,
    hits: u64,
    misses: u64,
}

impl<T> Default for DatasetCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<T> DatasetCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `paths`, or run `load` when there is no
    /// entry or any input's fingerprint changed.
    pub fn get_or_load<F>(&mut self, paths: &[&Path], load: F) -> AnalyticsResult<Arc<T>>
    where
        F: FnOnce() -> AnalyticsResult<T>,
    {
        let key: Vec<PathBuf> = paths.iter().map(|p| p.to_path_buf()).collect();
        let current = paths
            .iter()
            .map(|p| Fingerprint::of(p))
            .collect::<std::io::Result<Vec<_>>>()?;

        if let Some(entry) = self.entries.get(&key) {
            if entry.fingerprints == current {
                self.hits += 1;
                return Ok(Arc::clone(&entry.value));
            }
        }

        self.misses += 1;
        log::debug!("Dataset cache miss for {key:?}");
        let value = Arc::new(load()?);
        self.entries.insert(
            key,
            Entry {
                fingerprints: current,
                value: Arc::clone(&value),
            },
        );
        Ok(value)
    }

    /// Drop every entry that reads `path`. Returns how many were dropped.
    pub fn invalidate(&mut self, path: &Path) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.iter().any(|p| p == path));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
