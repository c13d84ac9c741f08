//! HistoryStore trait — durable per-thread conversation logs.
//!
//! The store is an append-only message log keyed by thread: `load`
//! returns the committed history (empty for an unseen thread), and
//! `append` commits new messages atomically. A crash between turns
//! resumes from the last committed message; replaying a turn appends
//! equivalent messages, so re-entry is safe.

use crate::error::StoreError;
use crate::message::{Message, ThreadId};
use async_trait::async_trait;

/// Durable, keyed-by-thread append-only message log.
///
/// Implementations: SQLite, in-memory (tests / ephemeral sessions).
/// No concurrent-write guarantee is required beyond
/// single-thread-at-a-time access per `ThreadId`.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Load the full committed history for a thread, in append order.
    async fn load(&self, thread: &ThreadId) -> std::result::Result<Vec<Message>, StoreError>;

    /// Append messages to a thread, atomically with respect to crashes.
    async fn append(
        &self,
        thread: &ThreadId,
        messages: &[Message],
    ) -> std::result::Result<(), StoreError>;

    /// List all known thread IDs (diagnostics).
    async fn threads(&self) -> std::result::Result<Vec<ThreadId>, StoreError>;
}
