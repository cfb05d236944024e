//! Batch file parsing and validation.
//!
//! Batches are TOML files naming a seed range, the depths to sweep and
//! config overrides. See `eval/batches/` for examples.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use foresight::select::StrategyKind;
use serde::Deserialize;

/// A parsed batch file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BatchFile {
    pub batch: BatchMeta,
    pub seeds: SeedRange,
    #[serde(default)]
    pub sweep: Sweep,
    #[serde(default)]
    pub config: BatchConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BatchMeta {
    /// Unique identifier (slug format: `[a-z0-9_-]+`).
    pub id: String,
    #[serde(default)]
    pub description: String,
}

/// Seeds `start..start + count`.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct SeedRange {
    pub start: u64,
    pub count: u32,
}

impl SeedRange {
    pub fn iter(&self) -> impl Iterator<Item = u64> {
        let start = self.start;
        (0..u64::from(self.count)).map(move |offset| start + offset)
    }
}

/// Planner settings every seed is run with.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Sweep {
    /// Depths to run each seed at.
    pub depths: Vec<u32>,
    pub replan_per_target: bool,
    pub strategy: StrategyKind,
}

impl Default for Sweep {
    fn default() -> Self {
        Self {
            depths: vec![1, 2, 3],
            replan_per_target: true,
            strategy: StrategyKind::Foresight,
        }
    }
}

/// Overrides applied to the default simulation config.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct BatchConfig {
    pub size: Option<usize>,
    pub deliveries: Option<usize>,
    pub extra_pickups: Option<usize>,
    pub capacity: Option<u32>,
    pub initial_battery: Option<i64>,
    pub max_cycles: Option<u32>,
    pub time_budget_ms: Option<u64>,
}

impl BatchFile {
    /// Load and validate a batch file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read batch {}", path.display()))?;
        Self::parse_str(&contents).with_context(|| format!("load batch {}", path.display()))
    }

    pub fn parse_str(contents: &str) -> Result<Self> {
        let batch: BatchFile = toml::from_str(contents).context("parse batch")?;
        batch.validate()?;
        Ok(batch)
    }

    /// Seed × depth pairs in run order.
    pub fn jobs(&self) -> Vec<(u64, u32)> {
        self.seeds
            .iter()
            .flat_map(|seed| self.sweep.depths.iter().map(move |&depth| (seed, depth)))
            .collect()
    }

    fn validate(&self) -> Result<()> {
        validate_batch_id(&self.batch.id)?;
        if self.seeds.count == 0 {
            bail!("seeds.count must be > 0");
        }
        if self.seeds.start.checked_add(u64::from(self.seeds.count)).is_none() {
            bail!("seeds range overflows u64");
        }
        if self.sweep.depths.is_empty() {
            bail!("sweep.depths must be a non-empty array");
        }
        if let Some(max_cycles) = self.config.max_cycles
            && max_cycles == 0
        {
            bail!("config.max_cycles must be > 0");
        }
        Ok(())
    }
}

/// Discover and load all batch files from a directory.
///
/// Returns batches sorted by id. Errors if duplicate ids are found.
pub fn discover_batches(dir: &Path) -> Result<Vec<BatchFile>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut batches = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("read batches dir {}", dir.display()))?
    {
        let entry = entry.context("read batch entry")?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            continue;
        }
        batches.push(BatchFile::load(&path)?);
    }
    batches.sort_by(|left, right| left.batch.id.cmp(&right.batch.id));
    for pair in batches.windows(2) {
        if pair[0].batch.id == pair[1].batch.id {
            return Err(anyhow!("duplicate batch.id {}", pair[0].batch.id));
        }
    }
    Ok(batches)
}

fn validate_batch_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        bail!("batch.id must be non-empty");
    }
    if !id
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_')
    {
        bail!("batch.id must use [a-z0-9_-] only");
    }
    Ok(())
}
