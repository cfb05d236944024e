//! Depth-bounded exhaustive foresight planner.
//!
//! The planner enumerates every target sequence of length ≤ depth reachable
//! under the branching rules, scores each one on a fresh clone of the live
//! world, and keeps the first sequence with the strictly greatest score.
//! Cost is O(B^M) in the branching factor B and depth M; there is no pruning.
//!
//! Each search branch owns its own `GridWorld` clone. Nothing is shared
//! between branches and the live world is only ever read.

use std::time::{Duration, Instant};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::budget::{PlanningTimedOut, remaining_budget};
use crate::core::scoring::score_sequence;
use crate::core::strategy::Strategy;
use crate::core::types::{ActionSequence, Cell, Rules};
use crate::core::world::GridWorld;

/// How much of the winning sequence is handed to the execution loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplanMode {
    /// Return the whole winning sequence and execute it without replanning.
    FullSequence,
    /// Return only its first target; the loop replans once it is reached.
    PerTarget,
}

/// Winning sequence and its score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredSequence {
    pub targets: ActionSequence,
    pub score: i64,
}

#[derive(Debug, Clone)]
pub struct ForesightPlanner {
    depth: u32,
    mode: ReplanMode,
    rules: Rules,
    time_budget: Option<Duration>,
}

impl ForesightPlanner {
    pub fn new(depth: u32, mode: ReplanMode, rules: Rules) -> Self {
        Self {
            depth,
            mode,
            rules,
            time_budget: None,
        }
    }

    /// Abort planning with `PlanningTimedOut` once `budget` has elapsed.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Every candidate sequence, in depth-first candidate order.
    ///
    /// A node is terminal when its depth is used up or its snapshot has no
    /// deliveries left; running out of pickups does not stop the search.
    /// Terminal nodes emit their prefix. A non-terminal node without
    /// candidates emits nothing, so its prefix is dropped.
    pub fn generate_sequences(&self, world: &GridWorld) -> Vec<ActionSequence> {
        let mut out = Vec::new();
        self.expand(world, self.depth, &[], &mut out);
        out
    }

    fn expand(
        &self,
        snapshot: &GridWorld,
        remaining: u32,
        prefix: &[Cell],
        out: &mut Vec<ActionSequence>,
    ) {
        if remaining == 0 || snapshot.deliveries().is_empty() {
            out.push(prefix.to_vec());
            return;
        }

        for candidate in self.candidates(snapshot, prefix) {
            let mut child = snapshot.clone();
            if child.take_pickup(candidate) {
                child.agent_mut().cargo += 1;
            } else if child.take_delivery(candidate) {
                child.agent_mut().cargo -= 1;
            }

            let mut extended = prefix.to_vec();
            extended.push(candidate);
            self.expand(&child, remaining - 1, &extended, out);
        }
    }

    /// Pickups (room in cargo), then deliveries (carrying), then recharge.
    ///
    /// Pickups and deliveries already in `prefix` are skipped; the recharge
    /// cell may repeat.
    fn candidates(&self, snapshot: &GridWorld, prefix: &[Cell]) -> Vec<Cell> {
        let cargo = snapshot.agent().cargo;
        let mut candidates = Vec::new();
        if cargo < self.rules.capacity {
            candidates.extend(snapshot.pickups().iter().filter(|&c| !prefix.contains(c)));
        }
        if cargo > 0 {
            candidates.extend(snapshot.deliveries().iter().filter(|&c| !prefix.contains(c)));
        }
        if let Some(recharge) = snapshot.recharge() {
            candidates.push(recharge);
        }
        candidates
    }

    /// Score every generated sequence against `world` and keep the best.
    ///
    /// Only a strictly greater score replaces the incumbent, so the first of
    /// several equal sequences wins. Disqualified sequences never win.
    pub fn best_sequence(&self, world: &GridWorld) -> Result<Option<ScoredSequence>> {
        let deadline = self.time_budget.map(|budget| (budget, Instant::now() + budget));
        let sequences = self.generate_sequences(world);

        let mut best: Option<ScoredSequence> = None;
        for (evaluated, sequence) in sequences.iter().enumerate() {
            if let Some((budget, deadline)) = deadline
                && remaining_budget(deadline).is_none()
            {
                return Err(PlanningTimedOut {
                    budget,
                    evaluated,
                    generated: sequences.len(),
                }
                .into());
            }
            let Some(score) = score_sequence(world, sequence, &self.rules) else {
                continue;
            };
            if best.as_ref().is_none_or(|incumbent| score > incumbent.score) {
                best = Some(ScoredSequence {
                    targets: sequence.clone(),
                    score,
                });
            }
        }

        debug!(
            generated = sequences.len(),
            best_score = ?best.as_ref().map(|b| b.score),
            "planning finished"
        );
        Ok(best)
    }
}

impl Strategy for ForesightPlanner {
    fn name(&self) -> &'static str {
        "foresight"
    }

    fn choose_targets(&self, world: &GridWorld) -> Result<Option<ActionSequence>> {
        let Some(best) = self.best_sequence(world)? else {
            return Ok(None);
        };
        if best.targets.is_empty() {
            return Ok(None);
        }
        let mut targets = best.targets;
        match self.mode {
            ReplanMode::PerTarget => targets.truncate(1),
            ReplanMode::FullSequence => targets.truncate(self.depth as usize),
        }
        Ok(Some(targets))
    }
}
