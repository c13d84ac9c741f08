//! SQLite vector index backend.
//!
//! Chunks live in one table with their embeddings stored as
//! little-endian f32 BLOBs. Search embeds the query through the
//! provider, scans the chunk embeddings, and ranks by cosine
//! similarity. At archive scale (tens of thousands of chunks) a full
//! scan is well under query latency noise; swapping in an ANN
//! structure stays behind the `DocumentIndex` trait.

use crate::vector::{blob_to_embedding, cosine_similarity, embedding_to_blob};
use archivist_core::error::IndexError;
use archivist_core::index::{DocumentChunk, DocumentIndex, ScoredChunk};
use archivist_core::provider::Provider;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// A SQLite-backed document index with provider-computed embeddings.
pub struct SqliteIndex {
    pool: SqlitePool,
    provider: Arc<dyn Provider>,
    embedding_model: String,
}

impl SqliteIndex {
    /// Open (or create) the index database at `path`.
    pub async fn new(
        path: &str,
        provider: Arc<dyn Provider>,
        embedding_model: impl Into<String>,
    ) -> Result<Self, IndexError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| IndexError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| IndexError::Storage(format!("Failed to open SQLite: {e}")))?;

        let index = Self {
            pool,
            provider,
            embedding_model: embedding_model.into(),
        };
        index.run_migrations().await?;
        info!("SQLite document index initialized at {path}");
        Ok(index)
    }

    async fn run_migrations(&self) -> Result<(), IndexError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chunks (
                id         TEXT PRIMARY KEY,
                content    TEXT NOT NULL,
                source     TEXT NOT NULL,
                title      TEXT NOT NULL,
                date       TEXT NOT NULL,
                embedding  BLOB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| IndexError::Storage(format!("chunks table: {e}")))?;

        debug!("SQLite index migrations complete");
        Ok(())
    }
}

#[async_trait]
impl DocumentIndex for SqliteIndex {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>, IndexError> {
        if self.count().await? == 0 {
            return Err(IndexError::NotBuilt);
        }

        let query_embedding = self
            .provider
            .embed(&self.embedding_model, &[query.to_string()])
            .await
            .map_err(|e| IndexError::EmbeddingFailed(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| IndexError::EmbeddingFailed("empty embedding response".into()))?;

        let rows = sqlx::query("SELECT content, source, title, date, embedding FROM chunks")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| IndexError::Storage(format!("scan: {e}")))?;

        let mut scored: Vec<ScoredChunk> = rows
            .iter()
            .filter_map(|row| {
                let blob: Vec<u8> = row.try_get("embedding").ok()?;
                let similarity =
                    cosine_similarity(&blob_to_embedding(&blob), &query_embedding);
                Some(ScoredChunk {
                    content: row.try_get("content").ok()?,
                    source: row.try_get("source").ok()?,
                    title: row.try_get("title").ok()?,
                    date: row.try_get("date").ok()?,
                    similarity,
                })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);

        debug!(query_len = query.len(), hits = scored.len(), "Index search");
        Ok(scored)
    }

    async fn upsert(&self, chunks: &[DocumentChunk]) -> Result<(), IndexError> {
        if chunks.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| IndexError::Storage(format!("begin: {e}")))?;

        for chunk in chunks {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO chunks (id, content, source, title, date, embedding)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&chunk.id)
            .bind(&chunk.content)
            .bind(&chunk.source)
            .bind(&chunk.title)
            .bind(&chunk.date)
            .bind(embedding_to_blob(&chunk.embedding))
            .execute(&mut *tx)
            .await
            .map_err(|e| IndexError::Storage(format!("upsert: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| IndexError::Storage(format!("commit: {e}")))?;

        debug!(upserted = chunks.len(), "Index upsert");
        Ok(())
    }

    async fn count(&self) -> Result<usize, IndexError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM chunks")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| IndexError::Storage(format!("count: {e}")))?;
        let n: i64 = row
            .try_get("n")
            .map_err(|e| IndexError::Storage(format!("count column: {e}")))?;
        Ok(n as usize)
    }
}
