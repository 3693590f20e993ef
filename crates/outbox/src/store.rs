//! Durable outbox storage.

use std::path::PathBuf;

use async_trait::async_trait;
use pantry_common::{AppError, AppResult, IdGenerator};
use serde_json::Value;

/// One queued notification body plus its locally assigned key.
///
/// Entries are write-once: created on queue, read and deleted by the flush
/// routine, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxEntry {
    /// Queue key, assigned at put time. Keys sort by creation order.
    pub key: String,
    /// The full notification request body, as it would have been sent.
    pub body: Value,
}

/// Durable key-value queue for undelivered notification bodies.
#[async_trait]
pub trait OutboxStore: Send + Sync {
    /// Persist a body and return its assigned queue key.
    async fn put(&self, body: &Value) -> AppResult<String>;

    /// All queued entries, oldest first.
    async fn get_all(&self) -> AppResult<Vec<OutboxEntry>>;

    /// Remove an entry. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// Filesystem-backed [`OutboxStore`]: one JSON file per entry under a base
/// directory, named by a ULID key so directory order is creation order.
#[derive(Clone)]
pub struct FileOutboxStore {
    base_path: PathBuf,
    id_gen: IdGenerator,
}

impl FileOutboxStore {
    /// Create a store rooted at the given directory.
    #[must_use]
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            id_gen: IdGenerator::new(),
        }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{key}.json"))
    }
}

#[async_trait]
impl OutboxStore for FileOutboxStore {
    async fn put(&self, body: &Value) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create outbox directory: {e}")))?;

        let key = self.id_gen.generate();
        let data = serde_json::to_vec(body)
            .map_err(|e| AppError::Storage(format!("Failed to serialize outbox entry: {e}")))?;

        tokio::fs::write(self.entry_path(&key), data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write outbox entry: {e}")))?;

        Ok(key)
    }

    async fn get_all(&self) -> AppResult<Vec<OutboxEntry>> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let mut dir = tokio::fs::read_dir(&self.base_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to read outbox directory: {e}")))?;

        let mut keys = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to read outbox directory: {e}")))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(key) = name.strip_suffix(".json") {
                keys.push(key.to_string());
            }
        }
        keys.sort_unstable();

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            let raw = tokio::fs::read(self.entry_path(&key))
                .await
                .map_err(|e| AppError::Storage(format!("Failed to read outbox entry: {e}")))?;
            match serde_json::from_slice(&raw) {
                Ok(body) => entries.push(OutboxEntry { key, body }),
                Err(e) => {
                    // Corrupt entry: unreadable forever, so don't let it
                    // wedge the queue
                    tracing::warn!(key = %key, error = %e, "Skipping corrupt outbox entry");
                }
            }
        }

        Ok(entries)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.entry_path(key);
        if path.exists() {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to delete outbox entry: {e}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store() -> FileOutboxStore {
        let dir = std::env::temp_dir().join(format!(
            "pantry-outbox-test-{}",
            IdGenerator::new().generate()
        ));
        FileOutboxStore::new(dir)
    }

    #[tokio::test]
    async fn test_put_get_delete_round_trip() {
        let store = temp_store();

        let body = json!({ "type": "welcome", "orgId": "org-1" });
        let key = store.put(&body).await.unwrap();

        let entries = store.get_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, key);
        assert_eq!(entries[0].body, body);

        store.delete(&key).await.unwrap();
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_entries_come_back_oldest_first() {
        let store = temp_store();

        // No pacing between puts: several land in the same millisecond and
        // the key order must still match insertion order.
        let mut keys = Vec::new();
        for i in 0..20 {
            keys.push(store.put(&json!({ "seq": i })).await.unwrap());
        }

        let entries = store.get_all().await.unwrap();
        let stored: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(stored, keys.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(entries[0].body["seq"], 0);
        assert_eq!(entries[19].body["seq"], 19);
    }

    #[tokio::test]
    async fn test_missing_directory_reads_as_empty() {
        let store = temp_store();
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_absent_key_is_not_an_error() {
        let store = temp_store();
        store.delete("no-such-key").await.unwrap();
    }
}
