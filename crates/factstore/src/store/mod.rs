//! The fact store façade
//!
//! [`FactStore`] exposes the session-scoped operations callers use:
//! `add`, `list`, `upsert`, `search` and `remember`. Every operation runs
//! under the session's lock, so the load → merge → save cycle of a write is
//! atomic with respect to other callers on the same key.

pub mod locks;

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::{Config, StorageBackend};
use crate::error::{FactStoreError, Result};
use crate::memory::types::{DedupeKey, MemoryRecord, NewMemory, UpsertOutcome, Upserted};
use crate::memory::{
    DEFAULT_SEARCH_LIMIT, FactExtractor, VerbatimExtractor, dedupe, filter_expired, rank,
};
use crate::session::SessionKey;
use crate::storage::{FileSessionStore, InMemorySessionStore, SessionStore};

pub use locks::{DEFAULT_LOCK_CAPACITY, SessionLocks};

pub struct FactStore {
    store: Arc<dyn SessionStore>,
    extractor: Arc<dyn FactExtractor>,
    clock: Arc<dyn Clock>,
    locks: SessionLocks,
    default_limit: usize,
}

impl FactStore {
    /// Create a store over `store` with the system clock, the verbatim
    /// extractor and default limits.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            extractor: Arc::new(VerbatimExtractor::default()),
            clock: Arc::new(SystemClock),
            locks: SessionLocks::default(),
            default_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Build a store from configuration, opening the configured backend
    pub async fn from_config(config: &Config) -> Result<Self> {
        let backend: Arc<dyn SessionStore> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(InMemorySessionStore::new()),
            StorageBackend::File => {
                Arc::new(FileSessionStore::open(&config.storage.data_dir).await?)
            }
        };
        tracing::debug!(backend = backend.name(), "Opened session store");

        Ok(Self::new(backend)
            .with_extractor(Arc::new(VerbatimExtractor::new(
                config.extraction.label.clone(),
            )))
            .with_default_limit(config.search.default_limit)
            .with_lock_capacity(config.sessions.max_cached_locks))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn FactExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn with_lock_capacity(mut self, capacity: usize) -> Self {
        self.locks = SessionLocks::new(capacity);
        self
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Append a new record, dedupe, and persist.
    ///
    /// Returns the record that survived dedupe for the new record's key.
    /// Expired records are neither pruned nor considered here.
    pub async fn add(&self, key: &SessionKey, memory: NewMemory) -> Result<MemoryRecord> {
        validate(&memory.label, &memory.text)?;

        let _guard = self.locks.lock(key).await;
        let now = self.clock.now();

        let mut records = self.store.load(key).await?;
        let created = MemoryRecord::new(key.clone(), memory.label, memory.text, memory.ttl_ms, now);
        let dedupe_key = created.dedupe_key();
        records.push(created.clone());

        let records = dedupe(records);
        self.persist(key, &records).await?;

        tracing::debug!(session = %key, id = %created.id, total = records.len(), "Added memory");
        Ok(survivor(&records, &dedupe_key).unwrap_or(created))
    }

    /// The raw persisted sequence, expired records included
    pub async fn list(&self, key: &SessionKey) -> Result<Vec<MemoryRecord>> {
        let _guard = self.locks.lock(key).await;
        self.store.load(key).await
    }

    /// Refresh the live record matching `(label, normalized text)`, or create
    /// one if none exists.
    ///
    /// Expired records are dropped from the persisted set as a side effect.
    /// On a match, `updated_at` moves to now and `ttl_ms` replaces the
    /// existing TTL only when given.
    pub async fn upsert(
        &self,
        key: &SessionKey,
        label: &str,
        text: &str,
        ttl_ms: Option<u64>,
    ) -> Result<Upserted> {
        validate(label, text)?;

        let _guard = self.locks.lock(key).await;
        let now = self.clock.now();

        let loaded = self.store.load(key).await?;
        let loaded_len = loaded.len();
        let mut records = filter_expired(loaded, now);
        let pruned = loaded_len - records.len();

        let (record, outcome) = match records.iter_mut().find(|r| r.matches(label, text)) {
            Some(existing) => {
                existing.touch(now, ttl_ms);
                (existing.clone(), UpsertOutcome::Updated)
            }
            None => {
                let created = MemoryRecord::new(
                    key.clone(),
                    label.to_string(),
                    text.to_string(),
                    ttl_ms,
                    now,
                );
                records.push(created.clone());
                (created, UpsertOutcome::Created)
            }
        };

        let records = dedupe(records);
        self.persist(key, &records).await?;

        tracing::debug!(
            session = %key,
            id = %record.id,
            outcome = ?outcome,
            pruned,
            total = records.len(),
            "Upserted memory"
        );

        let record = survivor(&records, &record.dedupe_key()).unwrap_or(record);
        Ok(Upserted { record, outcome })
    }

    /// Rank live records against `query` and return the best matches.
    ///
    /// `limit` defaults to the configured search limit. An empty or
    /// whitespace-only query matches nothing. Never writes.
    pub async fn search(
        &self,
        key: &SessionKey,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<MemoryRecord>> {
        let limit = limit.unwrap_or(self.default_limit);

        let records = {
            let _guard = self.locks.lock(key).await;
            self.store.load(key).await?
        };
        let live = filter_expired(records, self.clock.now());
        let candidates = live.len();

        let results: Vec<MemoryRecord> = rank(query, live, limit)
            .into_iter()
            .map(|scored| scored.record)
            .collect();

        tracing::debug!(
            session = %key,
            candidates,
            returned = results.len(),
            "Searched memories"
        );
        Ok(results)
    }

    /// Run the extractor over a user utterance and upsert every fact it yields
    pub async fn remember(&self, key: &SessionKey, utterance: &str) -> Result<Vec<Upserted>> {
        let facts = self.extractor.extract(utterance).await?;
        tracing::debug!(
            session = %key,
            extractor = self.extractor.name(),
            facts = facts.len(),
            "Extracted facts"
        );

        let mut stored = Vec::with_capacity(facts.len());
        for fact in facts {
            stored.push(self.upsert(key, &fact.label, &fact.text, fact.ttl_ms).await?);
        }
        Ok(stored)
    }

    async fn persist(&self, key: &SessionKey, records: &[MemoryRecord]) -> Result<()> {
        self.store.save(key, records).await.inspect_err(|e| {
            tracing::warn!(session = %key, backend = self.store.name(), "Failed to save: {e}");
        })
    }
}

/// Reject writes with a blank label or blank text
fn validate(label: &str, text: &str) -> Result<()> {
    if label.trim().is_empty() {
        return Err(FactStoreError::MalformedInput(
            "label must not be empty".to_string(),
        ));
    }
    if text.trim().is_empty() {
        return Err(FactStoreError::MalformedInput(
            "text must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn survivor(records: &[MemoryRecord], key: &DedupeKey) -> Option<MemoryRecord> {
    records.iter().find(|r| &r.dedupe_key() == key).cloned()
}
