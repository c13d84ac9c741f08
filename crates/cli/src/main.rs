//! Archivist CLI — the main entry point.
//!
//! Commands:
//! - `chat`   — Interactive chat or single-message mode
//! - `ingest` — Load a news CSV into the document index
//! - `serve`  — Start the HTTP chat gateway
//! - `status` — Show configuration and data file status

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "archivist",
    about = "Archivist — retrieval-augmented news archive assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Resume an existing conversation thread
        #[arg(short, long)]
        thread: Option<String>,
    },

    /// Ingest a news CSV into the document index
    Ingest {
        /// Path to the CSV file (columns: url,title,text,topic,tags,date)
        file: std::path::PathBuf,
    },

    /// Start the HTTP chat gateway
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show configuration and data file status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat { message, thread } => commands::chat::run(message, thread).await?,
        Commands::Ingest { file } => commands::ingest::run(&file).await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Status => commands::status::run().await?,
    }

    Ok(())
}
