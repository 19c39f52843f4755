//! Import cache: Moka in-memory, keyed by content hash.
//!
//! Only successful extractions are cached. A file that failed to parse is
//! parsed again on the next run so its error carries the current path.

use std::sync::Arc;

use moka::sync::Cache;
use tach_core::constants::DEFAULT_PARSE_CACHE_CAPACITY;

use super::types::RawImport;

/// In-memory import cache using Moka (TinyLFU admission).
pub struct ParseCache {
    inner: Cache<u64, Arc<[RawImport]>>,
}

impl ParseCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    pub fn get(&self, content_hash: u64) -> Option<Arc<[RawImport]>> {
        self.inner.get(&content_hash)
    }

    pub fn insert(&self, content_hash: u64, imports: Arc<[RawImport]>) {
        self.inner.insert(content_hash, imports);
    }

    /// Number of cached entries. Moka updates this lazily.
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new(DEFAULT_PARSE_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for ParseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_comes_from_constants() {
        let cache = ParseCache::default();
        assert_eq!(
            cache.inner.policy().max_capacity(),
            Some(DEFAULT_PARSE_CACHE_CAPACITY)
        );
    }

    #[test]
    fn inserted_imports_are_served_by_hash() {
        let cache = ParseCache::new(16);
        let imports: Arc<[RawImport]> = vec![RawImport::new("os", 1)].into();
        cache.insert(7, Arc::clone(&imports));
        assert_eq!(cache.get(7).as_deref(), Some(&*imports));
        assert!(cache.get(8).is_none());
        assert_eq!(cache.entry_count(), 1);
    }
}
