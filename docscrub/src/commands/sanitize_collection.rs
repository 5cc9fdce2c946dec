// docscrub/src/commands/sanitize_collection.rs
//! Collection mode: fetch a collection from a store, sanitize it and write
//! `<import-root>/<collection>/<collection>.json` as extended JSON.

use anyhow::{Context, Result};
use log::{error, info};
use std::path::{Path, PathBuf};

use docscrub_core::{headless_sanitize_records, DocumentStore, OutputFormat, Progress, RunStats, SanitizerDefinition};

/// Result of a collection-mode run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRunOutcome {
    pub output_path: PathBuf,
    pub stats: RunStats,
}

pub fn collection_output_path(import_root: &Path, collection: &str) -> PathBuf {
    import_root.join(collection).join(format!("{}.json", collection))
}

/// Fetches, sanitizes and writes one collection. Fetch failures are fatal.
pub async fn run_sanitize_collection(
    definition: &SanitizerDefinition,
    store: &dyn DocumentStore,
    import_root: &Path,
    progress: &mut dyn Progress,
) -> Result<CollectionRunOutcome> {
    let records = store
        .find(&definition.collection, &definition.filter)
        .await
        .with_context(|| format!("Failed to fetch collection '{}'", definition.collection))?;
    info!("Sanitizing {} {} records", records.len(), definition.collection);

    let (output, stats) =
        headless_sanitize_records(definition, records, OutputFormat::Extended, progress)?;

    let output_path = collection_output_path(import_root, &definition.collection);
    if let Err(e) = write_output(&output_path, output).await {
        error!("Failed to write {}: {}", output_path.display(), e);
        return Err(e).with_context(|| format!("Failed to write output file {}", output_path.display()));
    }

    info!("Wrote {} record(s) to {}.", stats.kept, output_path.display());
    Ok(CollectionRunOutcome { output_path, stats })
}

async fn write_output(path: &Path, output: String) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(path, output).await
}
