//! Model backend implementations for Archivist.
//!
//! One implementation covers the vast majority of deployments: any
//! endpoint speaking the OpenAI `/v1/chat/completions` and
//! `/v1/embeddings` protocol (OpenAI, OpenRouter, vLLM, Ollama,
//! GPUStack, ...).

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use archivist_config::AppConfig;
use archivist_core::Provider;
use std::sync::Arc;

/// Build the configured provider.
///
/// Call after `AppConfig::validate()` — an absent API key is treated
/// as empty here rather than re-checked.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn Provider> {
    Arc::new(OpenAiCompatProvider::new(
        "openai_compat",
        &config.base_url,
        config.api_key.clone().unwrap_or_default(),
    ))
}
