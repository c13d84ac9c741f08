//! The agent controller state machine.
//!
//! A turn walks an explicit state set — `AwaitModel`,
//! `DispatchTools`, `GradeOutput`, `Done` — with a round counter
//! bounding the tool-call feedback cycle. No recursion, no
//! framework-managed graph: the loop below *is* the control flow.

use crate::grader::{RelevanceGrader, Verdict};
use crate::turn_event::TurnEvent;
use archivist_core::error::{Error, Result, ToolError};
use archivist_core::message::{last_user_question, Message, MessageToolCall, ThreadId};
use archivist_core::provider::{ChatRequest, Provider};
use archivist_core::store::HistoryStore;
use archivist_core::tool::{ToolCall, ToolKind, ToolRegistry};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Fixed instruction appended once, on the first turn of a thread.
pub const SYSTEM_PROMPT: &str = "You are Archivist, an assistant that answers questions \
about a news archive.\n\
When context from tools (archive search results, the current time) is present, build \
your answer EXCLUSIVELY on that context.\n\
If the context says the information was not found or should be disregarded, say so to \
the user — never invent facts.";

/// Replaces retrieval output the grader rejected.
pub const IRRELEVANT_DISCLAIMER: &str = "Information was found in the archive, but it \
does not match the request. Disregard this context.";

/// Synthesized answer when the round ceiling is hit.
pub const UNABLE_TO_COMPLETE: &str = "I was unable to complete this request within the \
allowed number of tool rounds. Please try rephrasing your question.";

/// Controller tunables.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Reasoning model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Max tokens per model response
    pub max_tokens: u32,

    /// Maximum tool rounds per turn; the model is invoked at most
    /// `max_rounds + 1` times
    pub max_rounds: u32,

    /// Per-tool-call timeout
    pub tool_timeout: Duration,
}

/// The enumerated state set of one turn.
enum TurnState {
    AwaitModel,
    DispatchTools,
    GradeOutput,
    Done,
}

/// A tool result paired with what produced it, pre-commit.
struct DispatchedCall {
    message: Message,
    tool_name: String,
    ok: bool,
}

/// Orchestrates the model → tools → grader → model cycle for a thread.
pub struct AgentController {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    grader: RelevanceGrader,
    store: Arc<dyn HistoryStore>,
    config: ControllerConfig,
}

impl AgentController {
    pub fn new(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        grader: RelevanceGrader,
        store: Arc<dyn HistoryStore>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            grader,
            store,
            config,
        }
    }

    /// Read-only access to the thread history (front-end adapters).
    pub async fn history(&self, thread: &ThreadId) -> Result<Vec<Message>> {
        Ok(self.store.load(thread).await?)
    }

    /// Run one turn, streaming events as messages are committed.
    ///
    /// The receiver yields `Committed` events for each appended
    /// message and terminates after `Done` or `Failed`. Dropping the
    /// receiver aborts in-flight network calls; messages committed
    /// before that remain valid history.
    pub fn run_turn(
        self: &Arc<Self>,
        thread: ThreadId,
        user_text: String,
    ) -> mpsc::Receiver<TurnEvent> {
        let (tx, rx) = mpsc::channel(32);
        let controller = Arc::clone(self);

        tokio::spawn(async move {
            if let Err(e) = controller.execute_turn(&thread, &user_text, &tx).await {
                warn!(thread = %thread, "Turn failed: {e}");
                let _ = tx.send(TurnEvent::Failed { error: e.to_string() }).await;
            }
        });

        rx
    }

    /// Run one turn to completion and return the final answer.
    pub async fn ask(self: &Arc<Self>, thread: ThreadId, user_text: String) -> Result<String> {
        let mut rx = self.run_turn(thread, user_text);
        while let Some(event) = rx.recv().await {
            match event {
                TurnEvent::Done { answer } => return Ok(answer),
                TurnEvent::Failed { error } => return Err(Error::Internal(error)),
                TurnEvent::Committed { .. } => {}
            }
        }
        Err(Error::Internal("turn ended without a terminal event".into()))
    }

    async fn execute_turn(
        &self,
        thread: &ThreadId,
        user_text: &str,
        tx: &mpsc::Sender<TurnEvent>,
    ) -> Result<()> {
        let mut history = self.store.load(thread).await?;
        info!(thread = %thread, messages = history.len(), "Starting turn");

        let mut opening = Vec::new();
        if history.is_empty() {
            opening.push(Message::system(SYSTEM_PROMPT));
        }
        opening.push(Message::user(user_text));
        self.store.append(thread, &opening).await?;
        history.extend(opening);

        let definitions = self.tools.definitions();
        let mut state = TurnState::AwaitModel;
        let mut rounds_completed: u32 = 0;
        let mut pending_calls: Vec<MessageToolCall> = Vec::new();
        let mut dispatched: Vec<DispatchedCall> = Vec::new();

        loop {
            match state {
                TurnState::AwaitModel => {
                    debug!(thread = %thread, round = rounds_completed, "Invoking model");
                    let request = ChatRequest {
                        model: self.config.model.clone(),
                        messages: history.clone(),
                        temperature: self.config.temperature,
                        max_tokens: Some(self.config.max_tokens),
                        tools: definitions.clone(),
                    };
                    let response = self.provider.complete(request).await?;
                    let message = response.message;

                    if !message.requests_tools() {
                        let answer = message.content.clone();
                        self.commit(thread, &mut history, vec![message], tx).await?;
                        let _ = tx.send(TurnEvent::Done { answer }).await;
                        state = TurnState::Done;
                    } else if rounds_completed >= self.config.max_rounds {
                        // The refused tool-call response is not committed:
                        // dangling call ids would orphan the next round.
                        warn!(
                            thread = %thread,
                            rounds = rounds_completed,
                            "Round ceiling reached, forcing terminal answer"
                        );
                        let fallback = Message::assistant(UNABLE_TO_COMPLETE);
                        self.commit(thread, &mut history, vec![fallback], tx).await?;
                        let _ = tx
                            .send(TurnEvent::Done {
                                answer: UNABLE_TO_COMPLETE.into(),
                            })
                            .await;
                        state = TurnState::Done;
                    } else {
                        pending_calls = message.tool_calls.clone();
                        self.commit(thread, &mut history, vec![message], tx).await?;
                        state = TurnState::DispatchTools;
                    }
                }

                TurnState::DispatchTools => {
                    dispatched = self.dispatch_round(&pending_calls).await;
                    pending_calls.clear();
                    state = TurnState::GradeOutput;
                }

                TurnState::GradeOutput => {
                    let question = last_user_question(&history).unwrap_or_default().to_string();
                    let mut graded = Vec::with_capacity(dispatched.len());
                    for call in dispatched.drain(..) {
                        graded.push(self.grade_output(&question, call).await);
                    }
                    rounds_completed += 1;
                    self.commit(thread, &mut history, graded, tx).await?;
                    state = TurnState::AwaitModel;
                }

                TurnState::Done => break,
            }
        }

        info!(thread = %thread, rounds = rounds_completed, "Turn complete");
        Ok(())
    }

    /// Persist messages, then report them on the event stream.
    ///
    /// A closed receiver means the client aborted the turn; the
    /// messages just persisted remain valid history and the turn
    /// stops here instead of burning further model calls.
    async fn commit(
        &self,
        thread: &ThreadId,
        history: &mut Vec<Message>,
        messages: Vec<Message>,
        tx: &mpsc::Sender<TurnEvent>,
    ) -> Result<()> {
        self.store.append(thread, &messages).await?;
        for message in messages {
            tx.send(TurnEvent::Committed {
                message: message.clone(),
            })
            .await
            .map_err(|_| Error::Internal("turn aborted by client".into()))?;
            history.push(message);
        }
        Ok(())
    }

    /// Execute one round of tool calls concurrently.
    ///
    /// Calls share no mutable state, so they run under `join_all`;
    /// the barrier before grading is the await itself. Failures and
    /// timeouts become error-text tool messages — recoverable, the
    /// model reacts to them on the next cycle.
    async fn dispatch_round(&self, calls: &[MessageToolCall]) -> Vec<DispatchedCall> {
        let futures = calls.iter().map(|tc| async move {
            let call = ToolCall {
                id: tc.id.clone(),
                name: tc.name.clone(),
                arguments: serde_json::from_str(&tc.arguments)
                    .unwrap_or_else(|_| serde_json::json!({})),
            };

            let result =
                tokio::time::timeout(self.config.tool_timeout, self.tools.execute(&call)).await;

            let (output, ok) = match result {
                Ok(Ok(output)) => {
                    debug!(tool = %tc.name, "Tool executed");
                    (output, true)
                }
                Ok(Err(e)) => {
                    warn!(tool = %tc.name, error = %e, "Tool execution failed");
                    (format!("Error: {e}"), false)
                }
                Err(_) => {
                    let e = ToolError::Timeout {
                        tool_name: tc.name.clone(),
                        timeout_secs: self.config.tool_timeout.as_secs(),
                    };
                    warn!(tool = %tc.name, "Tool timed out");
                    (format!("Error: {e}"), false)
                }
            };

            DispatchedCall {
                message: Message::tool_result(&tc.id, output),
                tool_name: tc.name.clone(),
                ok,
            }
        });

        futures::future::join_all(futures).await
    }

    /// Filter one tool output through the grader where it applies.
    ///
    /// Only successful output of retrieval tools is graded; utility
    /// output and error text pass through untouched.
    async fn grade_output(&self, question: &str, call: DispatchedCall) -> Message {
        let DispatchedCall {
            mut message,
            tool_name,
            ok,
        } = call;

        if !ok || self.tools.kind_of(&tool_name) != Some(ToolKind::Retrieval) {
            return message;
        }

        match self.grader.grade(question, &message.content).await {
            Verdict::Relevant => {
                debug!(tool = %tool_name, "Grader kept retrieval output");
            }
            Verdict::Irrelevant => {
                info!(tool = %tool_name, "Grader rejected retrieval output");
                message.content = IRRELEVANT_DISCLAIMER.into();
            }
        }
        message
    }
}
