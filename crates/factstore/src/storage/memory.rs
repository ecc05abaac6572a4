//! In-process session store

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::Result;
use crate::memory::types::MemoryRecord;
use crate::session::SessionKey;
use crate::storage::SessionStore;

/// Session store backed by a concurrent `DashMap<SessionKey, Vec<MemoryRecord>>`.
///
/// Contents live only as long as the process.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<SessionKey, Vec<MemoryRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions that have been saved at least once
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, key: &SessionKey) -> Result<Vec<MemoryRecord>> {
        Ok(self
            .sessions
            .get(key)
            .map(|records| records.value().clone())
            .unwrap_or_default())
    }

    async fn save(&self, key: &SessionKey, records: &[MemoryRecord]) -> Result<()> {
        self.sessions.insert(key.clone(), records.to_vec());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
