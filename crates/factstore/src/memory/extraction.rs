//! Fact extraction from conversation turns
//!
//! Extraction decides what, if anything, from a user utterance becomes a
//! stored fact. It sits behind [`FactExtractor`] so a smarter (e.g. model
//! driven) extractor can replace the default without touching the store.

use async_trait::async_trait;

use crate::error::Result;
use crate::memory::types::{NewMemory, labels};

/// Turns an utterance into zero or more facts to upsert
#[async_trait]
pub trait FactExtractor: Send + Sync {
    /// Extract facts from one user utterance
    async fn extract(&self, utterance: &str) -> Result<Vec<NewMemory>>;

    /// Extractor name for logging
    fn name(&self) -> &'static str;
}

/// Stores the raw utterance verbatim under a single label.
///
/// Leaves interpretation to the model that later reads the facts back.
#[derive(Debug, Clone)]
pub struct VerbatimExtractor {
    label: String,
}

impl VerbatimExtractor {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for VerbatimExtractor {
    fn default() -> Self {
        Self::new(labels::CONVERSATION)
    }
}

#[async_trait]
impl FactExtractor for VerbatimExtractor {
    async fn extract(&self, utterance: &str) -> Result<Vec<NewMemory>> {
        if utterance.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![NewMemory::new(self.label.clone(), utterance)])
    }

    fn name(&self) -> &'static str {
        "verbatim"
    }
}
