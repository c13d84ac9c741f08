//! HTTP chat gateway for Archivist.
//!
//! A thin front-end adapter over the agent controller: send a user
//! message, get the final answer back, or subscribe to the turn's
//! event stream over SSE. One thread identifier per chat session;
//! clients hold onto the `thread_id` the first response hands them.
//!
//! Built on Axum.

use archivist_agent::{AgentController, TurnEvent};
use archivist_config::GatewayConfig;
use archivist_core::message::{Message, ThreadId};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event as SseEvent, Sse},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::info;

/// Shared gateway state.
pub struct GatewayState {
    pub controller: Arc<AgentController>,
}

type SharedState = Arc<GatewayState>;

/// Build the gateway router.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/threads/{id}", get(thread_handler))
        .route("/v1/chat", post(chat_handler))
        .route("/v1/chat/stream", post(chat_stream_handler))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(
    config: &GatewayConfig,
    controller: Arc<AgentController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(GatewayState { controller });
    let router = build_router(state);

    info!("Gateway listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

// ── Handlers ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Serialize)]
struct ThreadResponse {
    thread_id: String,
    messages: Vec<Message>,
}

async fn thread_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ThreadResponse>, (StatusCode, String)> {
    let thread = ThreadId::from(&id);
    let messages = state
        .controller
        .history(&thread)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(ThreadResponse {
        thread_id: id,
        messages,
    }))
}

#[derive(Deserialize)]
struct ChatRequestBody {
    /// Omit to start a new thread
    #[serde(default)]
    thread_id: Option<String>,
    message: String,
}

#[derive(Serialize)]
struct ChatResponseBody {
    thread_id: String,
    answer: String,
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(body): Json<ChatRequestBody>,
) -> Result<Json<ChatResponseBody>, (StatusCode, String)> {
    let thread = body
        .thread_id
        .map(|s| ThreadId::from(&s))
        .unwrap_or_default();

    let answer = state
        .controller
        .ask(thread.clone(), body.message)
        .await
        .map_err(|e| (StatusCode::BAD_GATEWAY, format!("turn failed: {e}")))?;

    Ok(Json(ChatResponseBody {
        thread_id: thread.0,
        answer,
    }))
}

async fn chat_stream_handler(
    State(state): State<SharedState>,
    Json(body): Json<ChatRequestBody>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let thread = body
        .thread_id
        .map(|s| ThreadId::from(&s))
        .unwrap_or_default();

    let rx = state.controller.run_turn(thread, body.message);
    let stream = ReceiverStream::new(rx).map(|event: TurnEvent| {
        let data = serde_json::to_string(&event).unwrap_or_default();
        Ok(SseEvent::default().event(event.event_type()).data(data))
    });

    Sse::new(stream)
}
