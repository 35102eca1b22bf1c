//! Retained log text keyed by source identifier, shared across requests.
//!
//! A corpus is published only once its analysis has finished, as a single
//! replace, so readers see either the whole text or nothing. Re-analyzing an
//! identifier overwrites the previous entry; concurrent re-analysis of the
//! same identifier is last-writer-wins.
//!
//! With [`EvictionPolicy::Never`] the store grows for the lifetime of the
//! process, one full log per identifier. That is acceptable for a single
//! operator; anything longer-lived should use [`EvictionPolicy::Lru`].

use ahash::AHashMap;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvictionPolicy {
    #[default]
    Never,
    /// Keep at most this many corpora, dropping the least recently used.
    Lru(NonZeroUsize),
}

enum Entries {
    Unbounded(AHashMap<String, Arc<str>>),
    Bounded(LruCache<String, Arc<str>>),
}

pub struct CorpusStore {
    policy: EvictionPolicy,
    entries: Mutex<Entries>,
}

impl CorpusStore {
    pub fn new(policy: EvictionPolicy) -> Self {
        let entries = match policy {
            EvictionPolicy::Never => Entries::Unbounded(AHashMap::new()),
            EvictionPolicy::Lru(cap) => Entries::Bounded(LruCache::new(cap)),
        };
        Self { policy, entries: Mutex::new(entries) }
    }

    pub fn unbounded() -> Self {
        Self::new(EvictionPolicy::Never)
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Publishes `corpus` under `id`, replacing any earlier entry.
    pub fn publish(&self, id: &str, corpus: String) {
        let bytes = corpus.len();
        let text: Arc<str> = Arc::from(corpus);
        let mut entries = self.lock();
        match &mut *entries {
            Entries::Unbounded(map) => {
                map.insert(id.to_string(), text);
            }
            Entries::Bounded(cache) => {
                if let Some((evicted, _)) = cache.push(id.to_string(), text) {
                    if evicted != id {
                        debug!(source_id = %evicted, "corpus evicted");
                    }
                }
            }
        }
        info!(source_id = %id, bytes, "corpus published");
    }

    pub fn get(&self, id: &str) -> Option<Arc<str>> {
        let mut entries = self.lock();
        match &mut *entries {
            Entries::Unbounded(map) => map.get(id).cloned(),
            Entries::Bounded(cache) => cache.get(id).cloned(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        let entries = self.lock();
        match &*entries {
            Entries::Unbounded(map) => map.contains_key(id),
            Entries::Bounded(cache) => cache.contains(id),
        }
    }

    pub fn remove(&self, id: &str) -> Option<Arc<str>> {
        let mut entries = self.lock();
        match &mut *entries {
            Entries::Unbounded(map) => map.remove(id),
            Entries::Bounded(cache) => cache.pop(id),
        }
    }

    pub fn len(&self) -> usize {
        let entries = self.lock();
        match &*entries {
            Entries::Unbounded(map) => map.len(),
            Entries::Bounded(cache) => cache.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Entries are only ever replaced whole, so a poisoned lock still guards
    // consistent data.
    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CorpusStore {
    fn default() -> Self {
        Self::unbounded()
    }
}
