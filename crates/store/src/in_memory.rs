//! In-memory history backend — tests and ephemeral sessions.

use archivist_core::error::StoreError;
use archivist_core::message::{Message, ThreadId};
use archivist_core::store::HistoryStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A history store backed by a process-local map.
pub struct InMemoryStore {
    threads: Arc<RwLock<HashMap<String, Vec<Message>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            threads: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn load(&self, thread: &ThreadId) -> Result<Vec<Message>, StoreError> {
        Ok(self
            .threads
            .read()
            .await
            .get(&thread.0)
            .cloned()
            .unwrap_or_default())
    }

    async fn append(&self, thread: &ThreadId, messages: &[Message]) -> Result<(), StoreError> {
        self.threads
            .write()
            .await
            .entry(thread.0.clone())
            .or_default()
            .extend_from_slice(messages);
        Ok(())
    }

    async fn threads(&self) -> Result<Vec<ThreadId>, StoreError> {
        Ok(self
            .threads
            .read()
            .await
            .keys()
            .map(|k| ThreadId(k.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_then_load_roundtrip() {
        let store = InMemoryStore::new();
        let thread = ThreadId::new();

        store.append(&thread, &[Message::user("one")]).await.unwrap();
        store.append(&thread, &[Message::assistant("two")]).await.unwrap();

        let history = store.load(&thread).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "one");
        assert_eq!(history[1].content, "two");
    }

    #[tokio::test]
    async fn empty_append_is_noop() {
        let store = InMemoryStore::new();
        let thread = ThreadId::new();
        store.append(&thread, &[]).await.unwrap();
        assert!(store.load(&thread).await.unwrap().is_empty());
    }
}
