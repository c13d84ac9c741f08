//! # Archivist Core
//!
//! Domain types, traits, and error definitions for the Archivist
//! retrieval-augmented agent. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator the agent talks to is defined as a trait here:
//! the reasoning model (`Provider`), the tool surface (`Tool`), the
//! conversation log (`HistoryStore`), and the document index
//! (`DocumentIndex`). Implementations live in their respective crates,
//! so the agent controller can be driven by test doubles in unit tests
//! and by real network/SQLite backends in production.

pub mod error;
pub mod index;
pub mod message;
pub mod provider;
pub mod store;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, IndexError, ProviderError, Result, StoreError, ToolError};
pub use index::{DocumentChunk, DocumentIndex, ScoredChunk};
pub use message::{Message, MessageToolCall, Role, ThreadId};
pub use provider::{ChatRequest, ChatResponse, Provider, ToolDefinition, Usage};
pub use store::HistoryStore;
pub use tool::{Tool, ToolCall, ToolKind, ToolRegistry};
