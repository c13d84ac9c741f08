//! Turn-level events streamed to front-end adapters.
//!
//! Each event is a snapshot delta: the message just committed to the
//! thread, or a terminal marker. The CLI renders tool-call
//! announcements and result previews from `Committed` events; the
//! gateway forwards them over SSE.

use archivist_core::message::Message;
use serde::{Deserialize, Serialize};

/// Events emitted by the controller while a turn runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    /// A message was committed to the thread (assistant tool-call
    /// request, graded tool result, or assistant text).
    Committed { message: Message },

    /// The turn ended with a final assistant answer.
    Done { answer: String },

    /// The turn failed; prior committed messages remain valid history.
    Failed { error: String },
}

impl TurnEvent {
    /// SSE event name for this event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Committed { .. } => "committed",
            Self::Done { .. } => "done",
            Self::Failed { .. } => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serialization_done() {
        let event = TurnEvent::Done {
            answer: "It is noon.".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"done""#));
        assert!(json.contains("noon"));
    }

    #[test]
    fn event_serialization_committed() {
        let event = TurnEvent::Committed {
            message: Message::assistant("hello"),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"committed""#));
        assert!(json.contains(r#""role":"assistant""#));
    }

    #[test]
    fn event_type_names() {
        assert_eq!(
            TurnEvent::Failed { error: "x".into() }.event_type(),
            "failed"
        );
        assert_eq!(
            TurnEvent::Done { answer: "x".into() }.event_type(),
            "done"
        );
    }
}
