//! Test utilities for factstore - controllable clock and fault injection
//!
//! - [`ManualClock`] lets tests pin "now" to exact milliseconds so expiry
//!   boundaries can be asserted precisely.
//! - [`FailingSessionStore`] wraps the in-memory backend and fails loads or
//!   saves on demand to exercise backing-store error paths.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::error::{FactStoreError, Result};
use crate::memory::types::MemoryRecord;
use crate::session::SessionKey;
use crate::storage::{InMemorySessionStore, SessionStore};

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    /// Clock reading `millis` since the Unix epoch
    pub fn at_millis(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    pub fn set_millis(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance_millis(&self, delta: i64) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }

    pub fn millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis()).unwrap_or_default()
    }
}

/// In-memory session store that can be switched into failing mode.
#[derive(Debug, Default)]
pub struct FailingSessionStore {
    inner: InMemorySessionStore,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

impl FailingSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// The wrapped store, for inspecting contents regardless of failure mode
    pub fn inner(&self) -> &InMemorySessionStore {
        &self.inner
    }
}

#[async_trait]
impl SessionStore for FailingSessionStore {
    async fn load(&self, key: &SessionKey) -> Result<Vec<MemoryRecord>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(FactStoreError::Storage(format!(
                "injected load failure for {key}"
            )));
        }
        self.inner.load(key).await
    }

    async fn save(&self, key: &SessionKey, records: &[MemoryRecord]) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(FactStoreError::Storage(format!(
                "injected save failure for {key}"
            )));
        }
        self.inner.save(key, records).await
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_moves_only_when_told() {
        let clock = ManualClock::at_millis(1_000);
        assert_eq!(clock.now().timestamp_millis(), 1_000);
        assert_eq!(clock.now(), clock.now());

        clock.advance_millis(250);
        assert_eq!(clock.now().timestamp_millis(), 1_250);

        clock.set_millis(5);
        assert_eq!(clock.millis(), 5);
    }

    #[tokio::test]
    async fn test_failing_store_toggles() {
        let store = FailingSessionStore::new();
        let key = SessionKey::try_from("s1").unwrap();

        store.fail_saves(true);
        assert!(matches!(
            store.save(&key, &[]).await,
            Err(FactStoreError::Storage(_))
        ));

        store.fail_saves(false);
        assert!(store.save(&key, &[]).await.is_ok());

        store.fail_loads(true);
        assert!(store.load(&key).await.is_err());
        assert!(store.inner().load(&key).await.unwrap().is_empty());
    }
}
