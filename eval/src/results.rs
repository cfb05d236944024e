//! Batch output records.
//!
//! A batch run prints one `BatchMeta` header line followed by one
//! `RunRecord` line per job, all as JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use foresight::run::RunSummary;

use crate::outcome::{Outcome, classify_outcome};

/// Header line of a batch run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BatchMeta {
    pub batch_id: String,
    pub batch_run_id: String,
    /// SHA-256 hash of the batch file for reproducibility tracking.
    pub batch_hash: String,
    pub jobs: usize,
    pub workers: usize,
    pub start_time: String,
    pub end_time: String,
    pub duration_secs: f64,
}

impl BatchMeta {
    pub fn new(
        batch_id: &str,
        batch_run_id: &str,
        batch_hash: String,
        jobs: usize,
        workers: usize,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let duration = finished_at - started_at;
        Self {
            batch_id: batch_id.to_string(),
            batch_run_id: batch_run_id.to_string(),
            batch_hash,
            jobs,
            workers,
            start_time: started_at.to_rfc3339(),
            end_time: finished_at.to_rfc3339(),
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
        }
    }
}

/// Measurements of a finished run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RunMetrics {
    pub score: i64,
    pub steps: u64,
    pub final_battery: i64,
    pub recharges: u32,
    pub delivered: usize,
    pub total_deliveries: usize,
    pub skipped: u32,
    pub cycles: u32,
    pub duration_secs: f64,
}

/// Output line for one `(seed, depth)` job.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RunRecord {
    pub seed: u64,
    pub depth: u32,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<RunMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunRecord {
    pub fn from_result(seed: u64, depth: u32, result: &Result<RunSummary>) -> Self {
        let outcome = classify_outcome(result);
        match result {
            Ok(summary) => Self {
                seed,
                depth,
                outcome,
                metrics: Some(RunMetrics {
                    score: summary.score,
                    steps: summary.steps,
                    final_battery: summary.final_battery,
                    recharges: summary.recharges,
                    delivered: summary.delivered,
                    total_deliveries: summary.total_deliveries,
                    skipped: summary.skipped,
                    cycles: summary.cycles,
                    duration_secs: summary.duration_secs,
                }),
                error: None,
            },
            Err(err) => Self {
                seed,
                depth,
                outcome,
                metrics: None,
                error: Some(format!("{err:#}")),
            },
        }
    }
}

pub fn file_sha256(path: &Path) -> Result<String> {
    let contents = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let digest = hasher.finalize();
    Ok(hex::encode(digest))
}
