//! Archive search tool — semantic retrieval over the document index.
//!
//! Wraps `DocumentIndex::search` and flattens hits into one
//! newline-joined string for the model. Empty results and a missing
//! index map to fixed strings the system prompt tells the model to
//! take at face value instead of fabricating an answer.

use archivist_core::error::{IndexError, ToolError};
use archivist_core::index::DocumentIndex;
use archivist_core::tool::{Tool, ToolKind};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Returned when the index holds documents but none matched.
pub const NOT_FOUND: &str = "No matching information was found in the archive.";

/// Returned when the index has never been built.
pub const INDEX_UNAVAILABLE: &str =
    "The archive index has not been built yet. Run the ingest command first.";

pub struct SearchArchiveTool {
    index: Arc<dyn DocumentIndex>,
    k: usize,
}

impl SearchArchiveTool {
    pub fn new(index: Arc<dyn DocumentIndex>, k: usize) -> Self {
        Self { index, k }
    }
}

#[async_trait]
impl Tool for SearchArchiveTool {
    fn name(&self) -> &str {
        "search_archive"
    }

    fn description(&self) -> &str {
        "Search the news archive for information. Use this for questions about events, facts, \
         and topics that need verification against the archive."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Retrieval
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        match self.index.search(query, self.k).await {
            Ok(hits) if hits.is_empty() => {
                debug!(query, "Search returned no hits");
                Ok(NOT_FOUND.into())
            }
            Ok(hits) => {
                debug!(query, hits = hits.len(), "Search returned hits");
                Ok(hits
                    .iter()
                    .map(|h| h.content.as_str())
                    .collect::<Vec<_>>()
                    .join("\n\n"))
            }
            Err(IndexError::NotBuilt) => {
                warn!("Search requested against an unbuilt index");
                Ok(INDEX_UNAVAILABLE.into())
            }
            Err(e) => Err(ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archivist_core::index::{DocumentChunk, ScoredChunk};

    struct StubIndex {
        hits: Vec<ScoredChunk>,
        built: bool,
    }

    #[async_trait]
    impl DocumentIndex for StubIndex {
        fn name(&self) -> &str {
            "stub"
        }
        async fn search(&self, _: &str, k: usize) -> Result<Vec<ScoredChunk>, IndexError> {
            if !self.built {
                return Err(IndexError::NotBuilt);
            }
            Ok(self.hits.iter().take(k).cloned().collect())
        }
        async fn upsert(&self, _: &[DocumentChunk]) -> Result<(), IndexError> {
            Ok(())
        }
        async fn count(&self) -> Result<usize, IndexError> {
            Ok(self.hits.len())
        }
    }

    fn hit(content: &str) -> ScoredChunk {
        ScoredChunk {
            content: content.into(),
            source: "https://example.com".into(),
            title: "T".into(),
            date: "2020-01-01".into(),
            similarity: 0.9,
        }
    }

    #[tokio::test]
    async fn joins_hits_with_blank_lines() {
        let tool = SearchArchiveTool::new(
            Arc::new(StubIndex {
                hits: vec![hit("first snippet"), hit("second snippet")],
                built: true,
            }),
            5,
        );
        let output = tool
            .execute(serde_json::json!({"query": "anything"}))
            .await
            .unwrap();
        assert_eq!(output, "first snippet\n\nsecond snippet");
    }

    #[tokio::test]
    async fn empty_results_return_fixed_not_found() {
        let tool = SearchArchiveTool::new(
            Arc::new(StubIndex { hits: vec![], built: true }),
            5,
        );
        let output = tool
            .execute(serde_json::json!({"query": "nothing matches"}))
            .await
            .unwrap();
        assert_eq!(output, NOT_FOUND);
    }

    #[tokio::test]
    async fn unbuilt_index_returns_fixed_unavailable() {
        let tool = SearchArchiveTool::new(
            Arc::new(StubIndex { hits: vec![], built: false }),
            5,
        );
        let output = tool
            .execute(serde_json::json!({"query": "anything"}))
            .await
            .unwrap();
        assert_eq!(output, INDEX_UNAVAILABLE);
    }

    #[tokio::test]
    async fn missing_query_is_invalid_arguments() {
        let tool = SearchArchiveTool::new(
            Arc::new(StubIndex { hits: vec![], built: true }),
            5,
        );
        let err = tool.execute(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn search_is_a_retrieval_tool() {
        let tool = SearchArchiveTool::new(
            Arc::new(StubIndex { hits: vec![], built: true }),
            5,
        );
        assert_eq!(tool.kind(), ToolKind::Retrieval);
    }
}
