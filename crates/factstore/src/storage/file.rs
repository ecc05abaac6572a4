//! File-backed session store
//!
//! Each session key maps to `<data_dir>/<key>.json`, a JSON array of records
//! in stored order. Saves go through a temp file and a rename so a reader
//! sees either the old document or the new one, never a torn write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{FactStoreError, Result};
use crate::memory::types::MemoryRecord;
use crate::session::SessionKey;
use crate::storage::SessionStore;

const FILE_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    data_dir: PathBuf,
}

impl FileSessionStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed
    pub async fn open(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await.map_err(|e| {
            FactStoreError::Storage(format!(
                "Failed to create data directory {}: {e}",
                data_dir.display()
            ))
        })?;

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the document holding `key`'s records
    pub fn session_path(&self, key: &SessionKey) -> PathBuf {
        self.data_dir
            .join(format!("{}.{FILE_EXTENSION}", key.as_str()))
    }

    fn temp_path(&self, key: &SessionKey) -> PathBuf {
        self.data_dir
            .join(format!(".{}.{}.tmp", key.as_str(), Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self, key: &SessionKey) -> Result<Vec<MemoryRecord>> {
        let path = self.session_path(key);
        let content = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(FactStoreError::Storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        serde_json::from_slice(&content).map_err(|e| {
            FactStoreError::Storage(format!("Failed to decode {}: {e}", path.display()))
        })
    }

    async fn save(&self, key: &SessionKey, records: &[MemoryRecord]) -> Result<()> {
        let path = self.session_path(key);
        let temp = self.temp_path(key);
        let encoded = serde_json::to_vec_pretty(records)?;

        if let Err(e) = tokio::fs::write(&temp, &encoded).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(FactStoreError::Storage(format!(
                "Failed to write {}: {e}",
                temp.display()
            )));
        }

        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(FactStoreError::Storage(format!(
                "Failed to replace {}: {e}",
                path.display()
            )));
        }

        tracing::trace!(session = %key, path = %path.display(), "Saved record set");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
