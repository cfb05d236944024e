//! Move and arrival rules, and sequence scoring.
//!
//! The same `apply_move` / `commit_arrival` pair drives both the planner's
//! hypothetical runs and the execution loop, so a sequence replayed through
//! `score_sequence` reproduces the score the live run accrued for it.

use tracing::trace;

use crate::core::pathfinding::shortest_path;
use crate::core::types::{Cell, Rules, TargetKind};
use crate::core::world::GridWorld;

/// Outcome of a single grid move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveEffect {
    pub score_delta: i64,
    /// True if the move entered the recharge cell.
    pub recharged: bool,
}

/// Effect committed on reaching a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// A pickup was collected.
    Collected,
    /// A carried item was delivered.
    Delivered,
    /// Nothing changed (recharge cell, or a delivery without cargo).
    Nothing,
}

impl Arrival {
    pub fn score_delta(self, rules: &Rules) -> i64 {
        match self {
            Arrival::Delivered => rules.delivery_reward,
            Arrival::Collected | Arrival::Nothing => 0,
        }
    }
}

/// Move the agent onto `cell` and apply the energy rules.
///
/// Battery drops by one. The move costs the nominal rate if the battery is
/// still non-negative afterwards and the deficit rate otherwise. Entering the
/// recharge cell then resets the battery, whatever its previous level.
pub fn apply_move(world: &mut GridWorld, cell: Cell, rules: &Rules) -> MoveEffect {
    let recharge = world.recharge();
    let agent = world.agent_mut();
    agent.position = cell;
    agent.battery -= 1;
    let score_delta = if agent.battery >= 0 {
        -rules.move_cost
    } else {
        -rules.deficit_cost
    };
    let recharged = recharge == Some(cell);
    if recharged {
        agent.battery = rules.recharge_level;
    }
    MoveEffect {
        score_delta,
        recharged,
    }
}

/// Apply the pickup/delivery effect of standing on `target`.
///
/// Pickups are only collected while cargo is below capacity, and deliveries
/// only happen while carrying something.
pub fn commit_arrival(world: &mut GridWorld, target: Cell, rules: &Rules) -> Arrival {
    match world.target_kind(target) {
        Some(TargetKind::Pickup) => {
            if world.agent().cargo < rules.capacity && world.take_pickup(target) {
                world.agent_mut().cargo += 1;
                return Arrival::Collected;
            }
            Arrival::Nothing
        }
        Some(TargetKind::Delivery) => {
            if world.agent().cargo > 0 && world.take_delivery(target) {
                world.agent_mut().cargo -= 1;
                return Arrival::Delivered;
            }
            Arrival::Nothing
        }
        Some(TargetKind::Recharge) | None => Arrival::Nothing,
    }
}

/// Path from the agent to `target`, if it needs at least one move.
///
/// A target the agent already stands on is treated like an unreachable one:
/// walking there accomplishes nothing.
pub fn walkable_path(world: &GridWorld, target: Cell) -> Option<Vec<Cell>> {
    shortest_path(world.grid(), world.agent().position, target).filter(|path| !path.is_empty())
}

/// Score a target sequence on a fresh clone of `world`.
///
/// Returns `None` (negative infinity) as soon as one target has no walkable
/// path. `world` itself is never modified.
pub fn score_sequence(world: &GridWorld, sequence: &[Cell], rules: &Rules) -> Option<i64> {
    let mut sim = world.clone();
    let mut score = 0i64;
    for target in sequence {
        let Some(path) = walkable_path(&sim, *target) else {
            trace!(%target, "sequence disqualified: no path");
            return None;
        };
        for cell in path {
            score += apply_move(&mut sim, cell, rules).score_delta;
        }
        score += commit_arrival(&mut sim, *target, rules).score_delta(rules);
    }
    Some(score)
}
