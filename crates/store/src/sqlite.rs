//! SQLite history backend.
//!
//! One `messages` table keyed by `(thread_id, seq)`; `seq` is assigned
//! inside the append transaction, so an append is all-or-nothing and
//! a crash mid-turn leaves the thread at its last committed message.

use archivist_core::error::StoreError;
use archivist_core::message::{Message, ThreadId};
use archivist_core::store::HistoryStore;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

/// A SQLite-backed append-only conversation log.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the history database at `path`.
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite history store initialized at {path}");
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                thread_id   TEXT NOT NULL,
                seq         INTEGER NOT NULL,
                payload     TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                PRIMARY KEY (thread_id, seq)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("messages table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_messages_thread ON messages(thread_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("thread index: {e}")))?;

        debug!("SQLite history migrations complete");
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn load(&self, thread: &ThreadId) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query(
            "SELECT payload FROM messages WHERE thread_id = ? ORDER BY seq ASC",
        )
        .bind(&thread.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("load: {e}")))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in rows {
            let payload: String = row
                .try_get("payload")
                .map_err(|e| StoreError::QueryFailed(format!("payload column: {e}")))?;
            let message: Message =
                serde_json::from_str(&payload).map_err(|e| StoreError::Corrupt {
                    thread: thread.0.clone(),
                    reason: e.to_string(),
                })?;
            messages.push(message);
        }

        debug!(thread = %thread, count = messages.len(), "Loaded history");
        Ok(messages)
    }

    async fn append(&self, thread: &ThreadId, messages: &[Message]) -> Result<(), StoreError> {
        if messages.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Storage(format!("begin: {e}")))?;

        let row = sqlx::query("SELECT COALESCE(MAX(seq), -1) AS max_seq FROM messages WHERE thread_id = ?")
            .bind(&thread.0)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("max seq: {e}")))?;
        let mut seq: i64 = row
            .try_get("max_seq")
            .map_err(|e| StoreError::QueryFailed(format!("max_seq column: {e}")))?;

        for message in messages {
            seq += 1;
            let payload = serde_json::to_string(message)
                .map_err(|e| StoreError::Storage(format!("serialize: {e}")))?;
            sqlx::query(
                "INSERT INTO messages (thread_id, seq, payload, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(&thread.0)
            .bind(seq)
            .bind(payload)
            .bind(message.timestamp.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Storage(format!("insert: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Storage(format!("commit: {e}")))?;

        debug!(thread = %thread, appended = messages.len(), "Appended messages");
        Ok(())
    }

    async fn threads(&self) -> Result<Vec<ThreadId>, StoreError> {
        let rows = sqlx::query("SELECT DISTINCT thread_id FROM messages ORDER BY thread_id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("threads: {e}")))?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("thread_id")
                    .map(|s| ThreadId(s))
                    .map_err(|e| StoreError::QueryFailed(format!("thread_id column: {e}")))
            })
            .collect()
    }
}
