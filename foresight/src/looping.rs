//! Execution loop that drives the live agent.
//!
//! Each cycle asks the strategy for targets and walks the live agent to each
//! of them with the same move/arrival rules the planner simulates. The loop
//! runs until every delivery is made, the strategy has nothing left to do, or
//! the cycle limit is hit.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::core::annotate::refresh_annotations;
use crate::core::scoring::{Arrival, apply_move, commit_arrival, walkable_path};
use crate::core::strategy::Strategy;
use crate::core::types::{Cell, Rules};
use crate::core::world::GridWorld;

/// Reason why `run_loop` stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum LoopStop {
    /// Every delivery target has been served.
    AllDelivered,
    /// The strategy returned no targets.
    Exhausted,
    /// The run used up `max_cycles` strategy invocations.
    CycleLimit { max_cycles: u32 },
}

/// Cumulative counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    pub score: i64,
    pub steps: u64,
    pub recharges: u32,
    pub delivered: usize,
    /// Targets skipped because no walkable path existed.
    pub skipped: u32,
    /// Strategy invocations.
    pub cycles: u32,
    /// Targets actually walked to, in order.
    pub visited: Vec<Cell>,
}

/// Loop limits and rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    pub rules: Rules,
    pub max_cycles: u32,
}

/// One real move, handed to the step observer (e.g. a renderer).
#[derive(Debug)]
pub struct StepEvent<'a> {
    /// Live world after the move.
    pub world: &'a GridWorld,
    /// Path currently being walked.
    pub path: &'a [Cell],
    /// Index of the move within `path`.
    pub index: usize,
    pub state: &'a RunState,
}

/// Summary of a loop invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopOutcome {
    pub state: RunState,
    pub stop: LoopStop,
    /// Deliveries the world started with.
    pub total_deliveries: usize,
}

/// Run the strategy against `world` until the run stops.
///
/// Unreachable targets are logged and skipped; strategy errors (planning
/// time-outs) abort the run.
pub fn run_loop<S, F>(
    world: &mut GridWorld,
    strategy: &S,
    config: &LoopConfig,
    mut on_step: F,
) -> Result<LoopOutcome>
where
    S: Strategy + ?Sized,
    F: FnMut(&StepEvent<'_>),
{
    let total_deliveries = world.deliveries().len();
    let mut state = RunState::default();

    let stop = loop {
        if state.delivered >= total_deliveries {
            break LoopStop::AllDelivered;
        }
        if state.cycles >= config.max_cycles {
            break LoopStop::CycleLimit {
                max_cycles: config.max_cycles,
            };
        }
        state.cycles += 1;

        refresh_annotations(world, &config.rules);
        let targets = strategy
            .choose_targets(world)
            .with_context(|| format!("{} strategy, cycle {}", strategy.name(), state.cycles))?;
        let Some(targets) = targets.filter(|t| !t.is_empty()) else {
            break LoopStop::Exhausted;
        };
        debug!(
            cycle = state.cycles,
            targets = ?targets,
            position = %world.agent().position,
            battery = world.agent().battery,
            "targets chosen"
        );

        for target in targets {
            if state.delivered >= total_deliveries {
                break;
            }
            let Some(path) = walkable_path(world, target) else {
                warn!(%target, from = %world.agent().position, "target unreachable, skipping");
                state.skipped += 1;
                continue;
            };

            for (index, cell) in path.iter().enumerate() {
                let effect = apply_move(world, *cell, &config.rules);
                state.score += effect.score_delta;
                state.steps += 1;
                if effect.recharged {
                    state.recharges += 1;
                }
                trace!(%cell, battery = world.agent().battery, score = state.score, "move");
                on_step(&StepEvent {
                    world,
                    path: &path,
                    index,
                    state: &state,
                });
            }

            let arrival = commit_arrival(world, target, &config.rules);
            state.score += arrival.score_delta(&config.rules);
            if arrival == Arrival::Delivered {
                state.delivered += 1;
            }
            state.visited.push(target);
        }

        debug!(
            steps = state.steps,
            score = state.score,
            battery = world.agent().battery,
            "cycle finished"
        );
    };

    Ok(LoopOutcome {
        state,
        stop,
        total_deliveries,
    })
}
