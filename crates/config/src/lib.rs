//! Configuration loading and validation for Archivist.
//!
//! Loads configuration from `~/.archivist/config.toml` with environment
//! variable overrides. Validates required settings at startup — a
//! missing API key is the one process-fatal configuration error.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// The root configuration structure.
///
/// Maps directly to `~/.archivist/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Reasoning model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Sampling temperature for the reasoning model
    #[serde(default)]
    pub temperature: f32,

    /// Max tokens per model response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Agent loop settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Conversation store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Document index / ingestion settings
    #[serde(default)]
    pub index: IndexConfig,

    /// Gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}
fn default_max_tokens() -> u32 {
    2048
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum tool-call rounds per turn before the controller
    /// forces a terminal answer
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Per-tool-call timeout in seconds
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,

    /// How many chunks the search tool retrieves
    #[serde(default = "default_search_k")]
    pub search_k: usize,
}

fn default_max_rounds() -> u32 {
    6
}
fn default_tool_timeout_secs() -> u64 {
    30
}
fn default_search_k() -> usize {
    5
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            tool_timeout_secs: default_tool_timeout_secs(),
            search_k: default_search_k(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite file for conversation history
    #[serde(default = "default_history_path")]
    pub path: String,
}

fn default_history_path() -> String {
    "history.sqlite".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// SQLite file for the document index
    #[serde(default = "default_index_path")]
    pub path: String,

    /// Chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Chunk overlap in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Maximum CSV records to ingest
    #[serde(default = "default_ingest_limit")]
    pub ingest_limit: usize,

    /// How many chunks to embed per provider request
    #[serde(default = "default_embed_batch")]
    pub embed_batch_size: usize,
}

fn default_index_path() -> String {
    "archive.sqlite".into()
}
fn default_chunk_size() -> usize {
    500
}
fn default_chunk_overlap() -> usize {
    200
}
fn default_ingest_limit() -> usize {
    100
}
fn default_embed_batch() -> usize {
    16
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            ingest_limit: default_ingest_limit(),
            embed_batch_size: default_embed_batch(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8080
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            embedding_model: default_embedding_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            agent: AgentConfig::default(),
            store: StoreConfig::default(),
            index: IndexConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "api_key",
                &match self.api_key {
                    Some(_) => "[REDACTED]",
                    None => "None",
                },
            )
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("embedding_model", &self.embedding_model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("agent", &self.agent)
            .field("store", &self.store)
            .field("index", &self.index)
            .field("gateway", &self.gateway)
            .finish()
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "failed to parse config file: {e}"),
            Self::Invalid(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    /// Directory holding the config file and default database files.
    pub fn config_dir() -> PathBuf {
        std::env::var("ARCHIVIST_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs_home()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".archivist")
            })
    }

    /// Load config from `~/.archivist/config.toml`, then apply
    /// environment overrides. Missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_dir().join("config.toml");
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(ConfigError::Io)?;
            toml::from_str(&raw).map_err(ConfigError::Parse)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse config from a TOML string (tests and embedding callers).
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(ConfigError::Parse)
    }

    /// Environment variables override the file:
    /// `ARCHIVIST_API_KEY` / `OPENAI_API_KEY`, `ARCHIVIST_BASE_URL`,
    /// `ARCHIVIST_MODEL`, `ARCHIVIST_EMBEDDING_MODEL`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("ARCHIVIST_API_KEY") {
            self.api_key = Some(key);
        } else if self.api_key.is_none() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                self.api_key = Some(key);
            }
        }
        if let Ok(url) = std::env::var("ARCHIVIST_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(model) = std::env::var("ARCHIVIST_MODEL") {
            self.model = model;
        }
        if let Ok(model) = std::env::var("ARCHIVIST_EMBEDDING_MODEL") {
            self.embedding_model = model;
        }
    }

    /// Validate settings that would otherwise fail deep inside a turn.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::Invalid(
                "no API key configured — set ARCHIVIST_API_KEY or add api_key to config.toml"
                    .into(),
            ));
        }
        if self.agent.max_rounds == 0 {
            return Err(ConfigError::Invalid("agent.max_rounds must be at least 1".into()));
        }
        if self.index.chunk_overlap >= self.index.chunk_size {
            return Err(ConfigError::Invalid(
                "index.chunk_overlap must be smaller than index.chunk_size".into(),
            ));
        }
        Ok(())
    }
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.agent.max_rounds, 6);
        assert_eq!(config.index.chunk_size, 500);
        assert_eq!(config.index.chunk_overlap, 200);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn parses_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
            api_key = "sk-test"
            model = "qwen2.5-32b-instruct"

            [agent]
            max_rounds = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.model, "qwen2.5-32b-instruct");
        assert_eq!(config.agent.max_rounds, 3);
        // Unset sections fall back to defaults
        assert_eq!(config.index.ingest_limit, 100);
    }

    #[test]
    fn validate_rejects_missing_api_key() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_overlap_ge_chunk_size() {
        let mut config = AppConfig::default();
        config.api_key = Some("sk-test".into());
        config.index.chunk_overlap = config.index.chunk_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let mut config = AppConfig::default();
        config.api_key = Some("sk-secret-value".into());
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-secret-value"));
        assert!(printed.contains("REDACTED"));
    }
}
