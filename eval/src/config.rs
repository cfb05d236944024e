//! Simulation config merging.
//!
//! Applies batch-specific overrides to the default simulation config.

use anyhow::Result;
use foresight::io::config::SimConfig;

use crate::batch::{BatchConfig, Sweep};

/// Apply batch overrides and sweep settings to the base config.
pub fn apply_batch_config(
    mut base: SimConfig,
    overrides: &BatchConfig,
    sweep: &Sweep,
) -> Result<SimConfig> {
    if let Some(size) = overrides.size {
        base.world.size = size;
    }
    if let Some(deliveries) = overrides.deliveries {
        base.world.deliveries = deliveries;
    }
    if let Some(extra_pickups) = overrides.extra_pickups {
        base.world.extra_pickups = extra_pickups;
    }
    if let Some(capacity) = overrides.capacity {
        base.agent.capacity = capacity;
    }
    if let Some(initial_battery) = overrides.initial_battery {
        base.agent.initial_battery = initial_battery;
    }
    if let Some(max_cycles) = overrides.max_cycles {
        base.run.max_cycles = max_cycles;
    }
    if overrides.time_budget_ms.is_some() {
        base.planner.time_budget_ms = overrides.time_budget_ms;
    }
    base.planner.strategy = sweep.strategy;
    base.planner.replan_per_target = sweep.replan_per_target;
    base.validate()?;
    Ok(base)
}

/// Config for one job: the batch config at `depth`.
pub fn config_for_depth(base: &SimConfig, depth: u32) -> SimConfig {
    let mut cfg = base.clone();
    cfg.planner.depth = depth;
    cfg
}
