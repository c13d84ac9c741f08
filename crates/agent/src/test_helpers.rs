//! Shared test helpers for controller and grader tests.

use archivist_core::error::ProviderError;
use archivist_core::message::{Message, MessageToolCall};
use archivist_core::provider::{ChatRequest, ChatResponse, Provider, Usage};
use std::sync::Mutex;

/// A mock provider that returns a sequence of scripted responses.
///
/// Each call to `complete` pops the next response; each call to
/// `classify` pops the next label. Panics when a queue runs dry —
/// a test that over-calls the model is a broken test.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<ChatResponse>>,
    labels: Mutex<Vec<Result<String, ProviderError>>>,
    error: Option<ProviderError>,
    call_count: Mutex<usize>,
    classify_count: Mutex<usize>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            labels: Mutex::new(Vec::new()),
            error: None,
            call_count: Mutex::new(0),
            classify_count: Mutex::new(0),
        }
    }

    /// A provider whose every `complete` call fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        let mut provider = Self::new(vec![]);
        provider.error = Some(error);
        provider
    }

    /// Script the grader labels returned by `classify`.
    pub fn with_labels(mut self, labels: Vec<Result<String, ProviderError>>) -> Self {
        self.labels = Mutex::new(labels);
        self
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn classify_count(&self) -> usize {
        *self.classify_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, _request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            panic!("SequentialMockProvider: no more responses (call #{})", *count);
        }
        Ok(responses.remove(0))
    }

    async fn classify(
        &self,
        _model: &str,
        _system: &str,
        _prompt: &str,
        _choices: &[&str],
    ) -> Result<String, ProviderError> {
        let mut count = self.classify_count.lock().unwrap();
        *count += 1;

        let mut labels = self.labels.lock().unwrap();
        if labels.is_empty() {
            panic!("SequentialMockProvider: no more labels (classify #{})", *count);
        }
        labels.remove(0)
    }
}

/// Create a simple text response (no tool calls).
pub fn make_text_response(text: &str) -> ChatResponse {
    ChatResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// Create a response carrying tool calls and optional text content.
pub fn make_tool_call_response(tool_calls: Vec<MessageToolCall>, content: &str) -> ChatResponse {
    ChatResponse {
        message: Message::assistant_with_calls(content, tool_calls),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// Helper to create a tool call with a predictable id.
pub fn make_tool_call(name: &str, args: serde_json::Value) -> MessageToolCall {
    MessageToolCall {
        id: format!("call_{name}"),
        name: name.to_string(),
        arguments: serde_json::to_string(&args).unwrap(),
    }
}
