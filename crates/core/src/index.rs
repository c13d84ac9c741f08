//! DocumentIndex trait — the semantic archive the search tool queries.
//!
//! The index is an external collaborator from the agent's point of
//! view: read-only at query time, written only by the offline
//! ingestion pipeline. The trait covers both sides so one SQLite
//! backend can serve both.

use crate::error::IndexError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A chunk of a source document, ready for indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Unique chunk ID
    pub id: String,

    /// The chunk text (metadata header + body slice)
    pub content: String,

    /// Source URL of the originating record
    pub source: String,

    /// Title of the originating record
    pub title: String,

    /// Publication date of the originating record
    pub date: String,

    /// Embedding vector for this chunk
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

/// A search hit: a chunk plus its similarity to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub content: String,
    pub source: String,
    pub title: String,
    pub date: String,
    pub similarity: f32,
}

/// The document index contract.
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// The backend name (e.g., "sqlite").
    fn name(&self) -> &str;

    /// Semantic search: top-`k` chunks ranked by similarity.
    ///
    /// Returns `IndexError::NotBuilt` when the index holds no
    /// documents — the search tool turns that into its fixed
    /// "index unavailable" string.
    async fn search(
        &self,
        query: &str,
        k: usize,
    ) -> std::result::Result<Vec<ScoredChunk>, IndexError>;

    /// Insert or replace a batch of chunks (ingestion side).
    async fn upsert(&self, chunks: &[DocumentChunk]) -> std::result::Result<(), IndexError>;

    /// Number of indexed chunks.
    async fn count(&self) -> std::result::Result<usize, IndexError>;
}
