//! Snapshot cache owned by the host
//!
//! Loaded or generated snapshots are memoized by a caller-chosen key. The
//! cache is a plain value handed to whoever needs it; there is no global
//! instance. Until [`SnapshotCache::initialize`] is called every lookup
//! falls through to the loader.

use std::collections::HashMap;

use tracing::debug;

use crate::model::GraphSnapshot;

#[derive(Debug, Default)]
pub struct SnapshotCache {
    entries: HashMap<String, GraphSnapshot>,
    initialized: bool,
    hits: u64,
    misses: u64,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start caching. Drops anything cached by a previous lifecycle.
    pub fn initialize(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
        self.initialized = true;
    }

    /// Forget all entries; the cache stays initialized
    pub fn clear(&mut self) {
        debug!(entries = self.entries.len(), "clearing snapshot cache");
        self.entries.clear();
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since the last [`SnapshotCache::initialize`]
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    /// Return the cached snapshot for `key`, or run `load` and remember its result.
    ///
    /// Failed loads are not cached.
    pub fn get_or_load<F, E>(&mut self, key: &str, load: F) -> Result<GraphSnapshot, E>
    where
        F: FnOnce() -> Result<GraphSnapshot, E>,
    {
        if !self.initialized {
            return load();
        }
        if let Some(hit) = self.entries.get(key) {
            self.hits += 1;
            return Ok(hit.clone());
        }

        self.misses += 1;
        let snapshot = load()?;
        self.entries.insert(key.to_string(), snapshot.clone());
        Ok(snapshot)
    }
}
