//! `archivist ingest` — load a news CSV into the document index.

use archivist_index::{ingest_csv, IngestOptions, SqliteIndex};
use std::path::Path;

pub async fn run(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;

    if !file.exists() {
        return Err(format!("data file not found: {}", file.display()).into());
    }

    let provider = archivist_providers::build_from_config(&config);
    let index = SqliteIndex::new(
        &config.index.path,
        provider.clone(),
        config.embedding_model.clone(),
    )
    .await?;

    let options = IngestOptions {
        limit: config.index.ingest_limit,
        chunk_size: config.index.chunk_size,
        chunk_overlap: config.index.chunk_overlap,
        embedding_model: config.embedding_model.clone(),
        embed_batch_size: config.index.embed_batch_size,
    };

    println!("Ingesting {} into {}", file.display(), config.index.path);

    let report = ingest_csv(file, &index, provider.as_ref(), &options).await?;

    println!();
    println!("  Records read:    {}", report.records_read);
    println!("  Records indexed: {}", report.records_indexed);
    println!("  Records skipped: {}", report.records_skipped);
    println!("  Chunks indexed:  {}", report.chunks_indexed);

    Ok(())
}
