//! Built-in tool implementations for Archivist.
//!
//! Two capabilities cover the agent's contract: semantic search
//! against the document index (retrieval, graded) and the current
//! time (utility, exempt from grading).

pub mod current_time;
pub mod search_archive;

pub use current_time::CurrentTimeTool;
pub use search_archive::SearchArchiveTool;

use archivist_core::index::DocumentIndex;
use archivist_core::tool::ToolRegistry;
use std::sync::Arc;

/// Create the default tool registry.
pub fn default_registry(index: Arc<dyn DocumentIndex>, search_k: usize) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(SearchArchiveTool::new(index, search_k)));
    registry.register(Box::new(CurrentTimeTool));
    registry
}
