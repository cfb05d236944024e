//! Advisory per-target distance and energy-cost estimates.
//!
//! The execution loop refreshes these on the agent at the start of every
//! cycle. They are bookkeeping only: no strategy reads them when choosing
//! targets.

use crate::core::pathfinding::all_distances;
use crate::core::types::{Cell, Rules};
use crate::core::world::GridWorld;

/// True path distance and projected score cost to one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetEstimate {
    pub cell: Cell,
    /// Steps along the shortest path.
    pub distance: u32,
    /// Projected score change of walking there (non-positive).
    pub projected_cost: i64,
}

/// Estimates for every reachable target, each list sorted by
/// `(distance, projected_cost)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TargetAnnotations {
    pub pickups: Vec<TargetEstimate>,
    pub deliveries: Vec<TargetEstimate>,
    pub recharge: Option<TargetEstimate>,
}

impl TargetAnnotations {
    /// Nearest reachable delivery, if any.
    pub fn nearest_delivery(&self) -> Option<&TargetEstimate> {
        self.deliveries.first()
    }
}

/// Compute estimates from the agent's current position and battery.
///
/// Unreachable targets are left out.
pub fn annotate_targets(world: &GridWorld, rules: &Rules) -> TargetAnnotations {
    let agent = world.agent();
    let distances = all_distances(world.grid(), agent.position);
    let estimate = |cell: Cell| {
        distances.get(cell).map(|distance| TargetEstimate {
            cell,
            distance,
            projected_cost: projected_cost(distance, agent.battery, rules),
        })
    };
    let collect = |cells: &[Cell]| {
        let mut estimates: Vec<TargetEstimate> = cells.iter().filter_map(|c| estimate(*c)).collect();
        estimates.sort_by_key(|e| (e.distance, e.projected_cost));
        estimates
    };

    TargetAnnotations {
        pickups: collect(world.pickups()),
        deliveries: collect(world.deliveries()),
        recharge: world.recharge().and_then(&estimate),
    }
}

/// Refresh the annotations stored on the agent.
pub fn refresh_annotations(world: &mut GridWorld, rules: &Rules) {
    let annotations = annotate_targets(world, rules);
    world.agent_mut().set_annotations(annotations);
}

/// Score cost of `distance` moves starting from `battery`.
///
/// Moves are charged at the nominal rate while the remaining charge is still
/// non-negative (the current level counts inclusively), then at the deficit
/// rate.
pub fn projected_cost(distance: u32, battery: i64, rules: &Rules) -> i64 {
    let mut remaining = battery;
    let mut cost = 0;
    for _ in 0..distance {
        if remaining >= 0 {
            cost -= rules.move_cost;
            remaining -= 1;
        } else {
            cost -= rules.deficit_cost;
        }
    }
    cost
}
