//! Offline CSV ingestion pipeline.
//!
//! Reads tabular news records, drops rows without body text, formats
//! the fixed metadata header per record, splits the body into
//! overlapping chunks, prepends the header to every chunk, embeds
//! chunks in batches through the provider, and upserts into the
//! index. Runs as a separate batch command, never concurrently with
//! serving.

use crate::splitter::TextSplitter;
use archivist_core::error::{Error, IndexError};
use archivist_core::index::{DocumentChunk, DocumentIndex};
use archivist_core::provider::Provider;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One row of the source CSV.
#[derive(Debug, Deserialize)]
struct NewsRecord {
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    topic: String,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    date: String,
}

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() { "n/a" } else { s }
}

impl NewsRecord {
    /// The fixed-layout metadata header prepended to every chunk.
    fn header(&self) -> String {
        format!(
            "Title: {} | Topic: {} | Tags: {} | Date: {} | URL: {} | ",
            if self.title.trim().is_empty() { "Untitled" } else { &self.title },
            or_na(&self.topic),
            or_na(&self.tags),
            or_na(&self.date),
            or_na(&self.url),
        )
    }
}

/// Tunables for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Maximum records to ingest
    pub limit: usize,
    /// Chunk size in characters
    pub chunk_size: usize,
    /// Chunk overlap in characters
    pub chunk_overlap: usize,
    /// Embedding model name
    pub embedding_model: String,
    /// Chunks per embedding request
    pub embed_batch_size: usize,
}

/// What an ingestion run accomplished.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub records_read: usize,
    pub records_indexed: usize,
    pub records_skipped: usize,
    pub chunks_indexed: usize,
}

/// Run the pipeline: CSV at `path` → `index`.
pub async fn ingest_csv(
    path: &Path,
    index: &dyn DocumentIndex,
    provider: &dyn Provider,
    options: &IngestOptions,
) -> Result<IngestReport, Error> {
    info!(path = %path.display(), limit = options.limit, "Starting ingestion");

    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| Error::Index(IndexError::IngestFailed(format!("open csv: {e}"))))?;

    let splitter = TextSplitter::new(options.chunk_size, options.chunk_overlap);
    let mut report = IngestReport::default();
    let mut pending: Vec<DocumentChunk> = Vec::new();

    for result in reader.deserialize::<NewsRecord>() {
        if report.records_indexed >= options.limit {
            break;
        }

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                // A malformed row loses one record, not the batch.
                warn!("Skipping malformed CSV row: {e}");
                report.records_skipped += 1;
                continue;
            }
        };
        report.records_read += 1;

        if record.text.trim().is_empty() {
            report.records_skipped += 1;
            continue;
        }

        let header = record.header();
        for piece in splitter.split(&record.text) {
            pending.push(DocumentChunk {
                id: Uuid::new_v4().to_string(),
                content: format!("{header}{piece}"),
                source: record.url.clone(),
                title: record.title.clone(),
                date: record.date.clone(),
                embedding: Vec::new(),
            });
        }
        report.records_indexed += 1;

        while pending.len() >= options.embed_batch_size {
            let batch: Vec<DocumentChunk> =
                pending.drain(..options.embed_batch_size).collect();
            report.chunks_indexed += flush(batch, index, provider, options).await?;
        }
    }

    if !pending.is_empty() {
        report.chunks_indexed += flush(pending, index, provider, options).await?;
    }

    info!(
        records = report.records_indexed,
        chunks = report.chunks_indexed,
        skipped = report.records_skipped,
        "Ingestion complete"
    );
    Ok(report)
}

/// Embed one batch and upsert it.
async fn flush(
    mut batch: Vec<DocumentChunk>,
    index: &dyn DocumentIndex,
    provider: &dyn Provider,
    options: &IngestOptions,
) -> Result<usize, Error> {
    let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
    let embeddings = provider
        .embed(&options.embedding_model, &texts)
        .await
        .map_err(|e| Error::Index(IndexError::EmbeddingFailed(e.to_string())))?;

    if embeddings.len() != batch.len() {
        return Err(Error::Index(IndexError::EmbeddingFailed(format!(
            "expected {} embeddings, got {}",
            batch.len(),
            embeddings.len()
        ))));
    }

    for (chunk, embedding) in batch.iter_mut().zip(embeddings) {
        chunk.embedding = embedding;
    }

    index.upsert(&batch).await?;
    debug!(batch = batch.len(), "Flushed chunk batch");
    Ok(batch.len())
}
