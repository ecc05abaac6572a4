//! Session-keyed persistence for record sets
//!
//! A backend stores one ordered sequence of records per session key and
//! replaces it wholesale on every save.

pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::memory::types::MemoryRecord;
use crate::session::SessionKey;

pub use file::FileSessionStore;
pub use memory::InMemorySessionStore;

/// Backing store for per-session record sets.
///
/// Guarantees:
/// - `load` of a key that was never saved returns an empty sequence.
/// - `save` replaces the whole sequence; a failed save leaves the previous
///   sequence in place.
/// - Sequences round-trip exactly, order included.
///
/// Serializing concurrent read-modify-write cycles on one key is the caller's
/// job (see [`crate::store::FactStore`]).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the raw stored sequence for `key`
    async fn load(&self, key: &SessionKey) -> Result<Vec<MemoryRecord>>;

    /// Replace the stored sequence for `key`
    async fn save(&self, key: &SessionKey, records: &[MemoryRecord]) -> Result<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
