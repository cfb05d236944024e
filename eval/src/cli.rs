//! CLI command implementations.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::batch::{BatchFile, discover_batches};
use crate::run::run_batch;

/// List all available batches.
pub fn list_batches(repo_root: &Path) -> Result<()> {
    let batches_dir = repo_root.join("eval").join("batches");
    let batches = discover_batches(&batches_dir)?;
    for batch in batches {
        if batch.batch.description.is_empty() {
            println!("{}", batch.batch.id);
        } else {
            println!("{}\t{}", batch.batch.id, batch.batch.description);
        }
    }
    Ok(())
}

/// Run a batch by id, printing one JSON line per run.
pub fn run_batch_by_id(repo_root: &Path, batch_id: &str, workers: usize) -> Result<()> {
    let batches_dir = repo_root.join("eval").join("batches");
    let batch_path = batches_dir.join(format!("{batch_id}.toml"));
    if !batch_path.exists() {
        bail!("batch {} not found at {}", batch_id, batch_path.display());
    }
    let batch = BatchFile::load(&batch_path).context("load batch")?;
    debug!(batch_id, workers, "batch loaded");

    info!(batch_id, workers, "starting batch");
    let outcome = run_batch(&batch_path, &batch, workers).context("run batch")?;

    println!(
        "{}",
        serde_json::to_string(&outcome.meta).context("serialize batch meta")?
    );
    for record in &outcome.records {
        println!(
            "{}",
            serde_json::to_string(record).context("serialize run record")?
        );
    }
    eprintln!(
        "run: batch={} batch_run_id={} runs={} duration_secs={:.2}",
        batch_id,
        outcome.meta.batch_run_id,
        outcome.records.len(),
        outcome.meta.duration_secs
    );
    Ok(())
}
