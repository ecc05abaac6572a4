//! factstore - per-session fact memory for conversational agents
//!
//! This crate records short textual facts extracted from a dialogue,
//! deduplicates and expires them, and answers relevance queries so a
//! language-model caller can inject the most pertinent facts into a prompt.

pub mod clock;
pub mod config;
pub mod error;
pub mod memory;
pub mod session;
pub mod storage;
pub mod store;
pub mod testing;

pub use error::{FactStoreError, Result};
pub use memory::{MemoryRecord, NewMemory, UpsertOutcome, Upserted};
pub use session::{SessionKey, SessionKeyError};
pub use store::FactStore;
