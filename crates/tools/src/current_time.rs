//! Current time tool.
//!
//! Deterministic utility output — exempt from relevance grading.

use archivist_core::error::ToolError;
use archivist_core::tool::{Tool, ToolKind};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

pub struct CurrentTimeTool;

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "current_time"
    }

    fn description(&self) -> &str {
        "Returns the current date and time in ISO format. Use when the user asks what time \
         it is, what today's date is, or similar questions about the current time or date."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Utility
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<String, ToolError> {
        Ok(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}
