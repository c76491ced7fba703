//! Exactly-once, per-key cache for expensive shared resources.
//!
//! Provides [`IndexCache`], used to hold one path index per API version.
//! Each key owns a slot guarded by its own mutex, so at most one load runs
//! per key at a time while loads for different keys proceed in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

type Slot<T> = Arc<Mutex<Option<Arc<T>>>>;

/// Thread-safe cache whose entries are populated at most once.
///
/// A failed load leaves the slot empty so the next caller retries; a
/// successful value is kept for the lifetime of the cache.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use snippetgen_core::IndexCache;
///
/// let cache = IndexCache::<str>::new();
/// let value = cache
///     .get_or_try_load("v1.0", || Ok::<_, ()>(Arc::from("index")))
///     .unwrap();
/// assert_eq!(&*value, "index");
/// ```
pub struct IndexCache<T: ?Sized + Send + Sync> {
    slots: DashMap<String, Slot<T>>,
}

impl<T: ?Sized + Send + Sync> IndexCache<T> {
    /// Create a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Get the cached value for `key`, running `load` if nothing is cached yet.
    ///
    /// Concurrent callers for the same key block on the slot while the first
    /// caller loads, then observe its result.
    ///
    /// # Errors
    ///
    /// Returns whatever error `load` returns. The error is not cached.
    pub fn get_or_try_load<E, F>(&self, key: &str, load: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<Arc<T>, E>,
    {
        let slot = {
            let entry = self
                .slots
                .entry(key.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(None)));
            Arc::clone(entry.value())
        };

        let mut guard = slot.lock();
        if let Some(value) = guard.as_ref() {
            return Ok(Arc::clone(value));
        }

        debug!(key, "loading cache entry");
        let value = load()?;
        *guard = Some(Arc::clone(&value));
        Ok(value)
    }

    /// Get the cached value for `key`, if it has been loaded.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        let slot = self.slots.get(key).map(|s| Arc::clone(s.value()))?;
        let guard = slot.lock();
        guard.as_ref().map(Arc::clone)
    }

    /// Number of keys holding a loaded value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.value().lock().is_some())
            .count()
    }

    /// Whether no key holds a loaded value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ?Sized + Send + Sync> Default for IndexCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + Send + Sync> std::fmt::Debug for IndexCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexCache")
            .field("keys", &self.slots.len())
            .finish_non_exhaustive()
    }
}
