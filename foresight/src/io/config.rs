//! Simulation configuration stored in `foresight.toml`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::generate::WorldParams;
use crate::core::planner::ReplanMode;
use crate::core::types::Rules;
use crate::select::StrategyKind;

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "foresight.toml";

/// Simulation configuration (TOML).
///
/// Intended to be edited by humans. Missing fields default to the values the
/// delivery experiments were tuned with.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub agent: AgentConfig,
    pub scoring: ScoringConfig,
    pub planner: PlannerConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WorldConfig {
    /// Grid side length.
    pub size: usize,
    /// Delivery cells (and items to deliver) per world.
    pub deliveries: usize,
    /// Pickups generated beyond one per delivery.
    pub extra_pickups: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: 30,
            deliveries: 4,
            extra_pickups: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AgentConfig {
    pub capacity: u32,
    pub initial_battery: i64,
    /// Battery level after entering the recharge cell.
    pub recharge_level: i64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            capacity: 4,
            initial_battery: 70,
            recharge_level: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScoringConfig {
    /// Score lost per move with non-negative battery.
    pub move_cost: i64,
    /// Score lost per move with negative battery.
    pub deficit_cost: i64,
    pub delivery_reward: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            move_cost: 1,
            deficit_cost: 5,
            delivery_reward: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlannerConfig {
    pub strategy: StrategyKind,
    /// Foresight depth (targets per planning pass).
    pub depth: u32,
    /// Replan after every reached target instead of executing whole sequences.
    pub replan_per_target: bool,
    /// Abort a planning pass that runs longer than this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_budget_ms: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Foresight,
            depth: 3,
            replan_per_target: true,
            time_budget_ms: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunConfig {
    /// World seed; unset draws one from OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Stop after this many strategy invocations.
    pub max_cycles: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_cycles: 1000,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        self.world_params().validate()?;
        if self.agent.capacity == 0 {
            return Err(anyhow!("agent.capacity must be > 0"));
        }
        if self.scoring.move_cost < 0 || self.scoring.deficit_cost < 0 {
            return Err(anyhow!("scoring costs must be >= 0"));
        }
        if self.run.max_cycles == 0 {
            return Err(anyhow!("run.max_cycles must be > 0"));
        }
        if self.planner.time_budget_ms == Some(0) {
            return Err(anyhow!("planner.time_budget_ms must be > 0 when set"));
        }
        Ok(())
    }

    pub fn rules(&self) -> Rules {
        Rules {
            capacity: self.agent.capacity,
            recharge_level: self.agent.recharge_level,
            move_cost: self.scoring.move_cost,
            deficit_cost: self.scoring.deficit_cost,
            delivery_reward: self.scoring.delivery_reward,
        }
    }

    pub fn world_params(&self) -> WorldParams {
        WorldParams {
            size: self.world.size,
            deliveries: self.world.deliveries,
            extra_pickups: self.world.extra_pickups,
            initial_battery: self.agent.initial_battery,
        }
    }

    pub fn replan_mode(&self) -> ReplanMode {
        if self.planner.replan_per_target {
            ReplanMode::PerTarget
        } else {
            ReplanMode::FullSequence
        }
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.planner.time_budget_ms.map(Duration::from_millis)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `SimConfig::default()`.
pub fn load_config(path: &Path) -> Result<SimConfig> {
    if !path.exists() {
        let cfg = SimConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg = parse_config(&contents).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

/// Parse and validate config text.
pub fn parse_config(contents: &str) -> Result<SimConfig> {
    let cfg: SimConfig = toml::from_str(contents)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &SimConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
