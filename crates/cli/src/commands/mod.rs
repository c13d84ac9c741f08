//! CLI command implementations.

pub mod chat;
pub mod ingest;
pub mod serve;
pub mod status;

use archivist_agent::{AgentController, ControllerConfig, RelevanceGrader};
use archivist_config::AppConfig;
use archivist_core::index::DocumentIndex;
use archivist_core::store::HistoryStore;
use archivist_index::SqliteIndex;
use archivist_store::SqliteStore;
use std::sync::Arc;
use std::time::Duration;

/// Load and validate config, with a clear setup hint on failure.
pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    if let Err(e) = config.validate() {
        eprintln!();
        eprintln!("  ERROR: {e}");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    ARCHIVIST_API_KEY=sk-...");
        eprintln!("    OPENAI_API_KEY=sk-...");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err(e.into());
    }
    Ok(config)
}

/// Wire up the full agent stack from config.
pub async fn build_controller(
    config: &AppConfig,
) -> Result<Arc<AgentController>, Box<dyn std::error::Error>> {
    let provider = archivist_providers::build_from_config(config);

    let store: Arc<dyn HistoryStore> = Arc::new(SqliteStore::new(&config.store.path).await?);
    let index: Arc<dyn DocumentIndex> = Arc::new(
        SqliteIndex::new(
            &config.index.path,
            provider.clone(),
            config.embedding_model.clone(),
        )
        .await?,
    );

    let tools = Arc::new(archivist_tools::default_registry(index, config.agent.search_k));
    let grader = RelevanceGrader::new(provider.clone(), config.model.clone());

    Ok(Arc::new(AgentController::new(
        provider,
        tools,
        grader,
        store,
        ControllerConfig {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_rounds: config.agent.max_rounds,
            tool_timeout: Duration::from_secs(config.agent.tool_timeout_secs),
        },
    )))
}
