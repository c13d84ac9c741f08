//! `archivist status` — show configuration and data file status.

use archivist_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    println!("Archivist Status");
    println!("================");
    println!("  Config dir:      {}", AppConfig::config_dir().display());
    println!("  Base URL:        {}", config.base_url);
    println!("  Model:           {}", config.model);
    println!("  Embedding model: {}", config.embedding_model);
    println!("  Max rounds:      {}", config.agent.max_rounds);
    println!("  History store:   {}", config.store.path);
    println!("  Document index:  {}", config.index.path);
    println!("  Gateway:         {}:{}", config.gateway.host, config.gateway.port);

    let config_path = AppConfig::config_dir().join("config.toml");
    println!();
    if config_path.exists() {
        println!("  Config file found at {}", config_path.display());
    } else {
        println!("  No config file — defaults plus environment variables are in effect");
    }

    if std::path::Path::new(&config.index.path).exists() {
        println!("  Document index present");
    } else {
        println!("  Document index missing — run `archivist ingest <csv>` first");
    }

    if config.api_key.is_none() {
        println!("  WARNING: no API key configured");
    }

    Ok(())
}
