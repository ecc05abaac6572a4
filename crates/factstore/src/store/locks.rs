//! Per-session write serialization
//!
//! Hands out one async mutex per session key so that load→merge→save cycles
//! on the same key never interleave, while different keys proceed in
//! parallel. Locks are kept in an LRU cache with a soft capacity: idle locks
//! are evicted least-recently-used first, but a lock that is held or awaited
//! is never evicted, even if that leaves the cache over capacity.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use tokio::sync::{Mutex as TokioMutex, OwnedMutexGuard};

use crate::session::SessionKey;

/// Default number of idle session locks kept around
pub const DEFAULT_LOCK_CAPACITY: usize = 1024;

type SessionLock = Arc<TokioMutex<()>>;

#[derive(Debug)]
pub struct SessionLocks {
    cache: Mutex<LruCache<SessionKey, SessionLock>>,
    capacity: NonZeroUsize,
}

impl SessionLocks {
    /// Create a registry keeping at most `capacity` idle locks.
    ///
    /// A capacity of 0 falls back to [`DEFAULT_LOCK_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(DEFAULT_LOCK_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::unbounded()),
            capacity,
        }
    }

    /// Wait for exclusive access to `key`'s record set
    pub async fn lock(&self, key: &SessionKey) -> OwnedMutexGuard<()> {
        self.handle(key).lock_owned().await
    }

    /// Fetch or create the lock for `key`, then evict idle locks past capacity
    fn handle(&self, key: &SessionKey) -> SessionLock {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());

        let lock = match cache.get(key) {
            Some(lock) => lock.clone(),
            None => {
                let lock = SessionLock::default();
                cache.put(key.clone(), lock.clone());
                lock
            }
        };

        Self::evict_idle(&mut cache, self.capacity.get());
        lock
    }

    fn evict_idle(cache: &mut LruCache<SessionKey, SessionLock>, capacity: usize) {
        let excess = cache.len().saturating_sub(capacity);
        if excess == 0 {
            return;
        }

        // A strong count of 1 means only the cache references the lock
        let idle: Vec<SessionKey> = cache
            .iter()
            .rev()
            .filter(|(_, lock)| Arc::strong_count(lock) == 1)
            .map(|(key, _)| key.clone())
            .take(excess)
            .collect();

        for key in idle {
            cache.pop(&key);
        }
    }

    /// Number of locks currently cached
    pub fn len(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_CAPACITY)
    }
}
