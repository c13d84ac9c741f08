//! Document index and ingestion pipeline for Archivist.
//!
//! The index side is a SQLite-backed vector store queried by the
//! `search_archive` tool. The ingestion side is an offline batch:
//! CSV records → metadata header + overlapping chunks → embeddings →
//! upsert. The two must not run concurrently against the same index
//! file beyond SQLite's own isolation.

pub mod ingest;
pub mod splitter;
pub mod sqlite;
pub mod vector;

pub use ingest::{ingest_csv, IngestOptions, IngestReport};
pub use splitter::TextSplitter;
pub use sqlite::SqliteIndex;
pub use vector::cosine_similarity;
