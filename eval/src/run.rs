//! Batch execution orchestration.
//!
//! Expands a batch into seed × depth jobs and runs them on a worker pool.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use foresight::io::config::SimConfig;
use foresight::run::{RunSummary, run_seeded};
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::batch::BatchFile;
use crate::config::{apply_batch_config, config_for_depth};
use crate::outcome::Outcome;
use crate::results::{BatchMeta, RunRecord, file_sha256};

/// Result of running a whole batch.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Header, including the unique batch run id.
    pub meta: BatchMeta,
    /// One record per job, in job order.
    pub records: Vec<RunRecord>,
}

/// Run every job of `batch`.
///
/// A failing or panicking job becomes an `error` record; it never aborts its
/// siblings.
#[instrument(skip_all, fields(batch_id = %batch.batch.id, workers = workers))]
pub fn run_batch(batch_path: &Path, batch: &BatchFile, workers: usize) -> Result<BatchOutcome> {
    info!("batch run started");
    let base = apply_batch_config(SimConfig::default(), &batch.config, &batch.sweep)
        .context("apply batch config")?;
    let batch_hash = file_sha256(batch_path).context("hash batch file")?;

    let started_at = Utc::now();
    let batch_run_id = format!("eval-{}", started_at.format("%Y%m%d_%H%M%S"));
    let jobs = batch.jobs();
    debug!(jobs = jobs.len(), "jobs expanded");

    let records = run_jobs(&base, &jobs, workers)?;
    let finished_at = Utc::now();

    let failed = records
        .iter()
        .filter(|record| record.outcome == Outcome::Error)
        .count();
    if failed > 0 {
        warn!(failed, "some runs failed");
    }

    let meta = BatchMeta::new(
        &batch.batch.id,
        &batch_run_id,
        batch_hash,
        jobs.len(),
        workers.max(1),
        started_at,
        finished_at,
    );
    info!(
        runs = records.len(),
        failed,
        duration_secs = meta.duration_secs,
        "batch run complete"
    );
    Ok(BatchOutcome {
        meta,
        records,
    })
}

/// Run `(seed, depth)` jobs, in parallel when more than one worker is asked for.
///
/// Records come back in job order either way.
pub fn run_jobs(base: &SimConfig, jobs: &[(u64, u32)], workers: usize) -> Result<Vec<RunRecord>> {
    if workers <= 1 || jobs.len() <= 1 {
        return Ok(jobs
            .iter()
            .map(|&(seed, depth)| run_job(base, seed, depth))
            .collect());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("build worker pool")?;
    Ok(pool.install(|| {
        jobs.par_iter()
            .map(|&(seed, depth)| run_job(base, seed, depth))
            .collect()
    }))
}

fn run_job(base: &SimConfig, seed: u64, depth: u32) -> RunRecord {
    let cfg = config_for_depth(base, depth);
    isolated_run(seed, depth, || run_seeded(&cfg, seed))
}

/// Run one job, turning both errors and panics into an `error` record.
fn isolated_run<F>(seed: u64, depth: u32, run: F) -> RunRecord
where
    F: FnOnce() -> Result<RunSummary>,
{
    let result = panic::catch_unwind(AssertUnwindSafe(run)).unwrap_or_else(|payload| {
        Err(anyhow!("run panicked: {}", panic_message(&*payload)))
    });
    if let Err(err) = &result {
        warn!(seed, depth, error = %format!("{err:#}"), "run failed");
    }
    RunRecord::from_result(seed, depth, &result)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
