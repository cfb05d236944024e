//! Decision strategies consumed by the execution loop.

use anyhow::Result;

use crate::core::types::{ActionSequence, Cell};
use crate::core::world::GridWorld;

/// Anything that can pick the next targets for the agent.
///
/// Implementations must not modify `world`; they only read it (or clones of
/// it). `Ok(None)` means there is nothing useful left to do. Errors are
/// reserved for aborted planning (see `PlanningTimedOut`).
pub trait Strategy {
    /// Short name used in logs and run summaries.
    fn name(&self) -> &'static str;

    fn choose_targets(&self, world: &GridWorld) -> Result<Option<ActionSequence>>;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn choose_targets(&self, world: &GridWorld) -> Result<Option<ActionSequence>> {
        (**self).choose_targets(world)
    }
}

/// Baseline: nearest pickup when empty-handed, otherwise nearest delivery.
///
/// Distances are Manhattan, not path lengths. Ties go to the first candidate
/// in the world's list order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl Strategy for Greedy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn choose_targets(&self, world: &GridWorld) -> Result<Option<ActionSequence>> {
        let agent = world.agent();
        let candidates = if agent.cargo == 0 && !world.pickups().is_empty() {
            world.pickups()
        } else {
            world.deliveries()
        };
        Ok(nearest(agent.position, candidates).map(|cell| vec![cell]))
    }
}

/// First cell with the smallest Manhattan distance from `from`.
fn nearest(from: Cell, candidates: &[Cell]) -> Option<Cell> {
    let mut best: Option<(u32, Cell)> = None;
    for cell in candidates {
        let dist = from.manhattan(*cell);
        if best.is_none_or(|(best_dist, _)| dist < best_dist) {
            best = Some((dist, *cell));
        }
    }
    best.map(|(_, cell)| cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::Grid;
    use crate::core::world::AgentState;

    fn world(pickups: Vec<Cell>, deliveries: Vec<Cell>, cargo: u32) -> GridWorld {
        let mut agent = AgentState::new(Cell::new(2, 2), 70);
        agent.cargo = cargo;
        GridWorld::new(Grid::open(6).expect("grid"), pickups, deliveries, None, agent)
            .expect("world")
    }

    #[test]
    fn empty_handed_goes_to_nearest_pickup() {
        let world = world(
            vec![Cell::new(5, 5), Cell::new(2, 4)],
            vec![Cell::new(2, 3)],
            0,
        );
        let targets = Greedy.choose_targets(&world).expect("choose");
        assert_eq!(targets, Some(vec![Cell::new(2, 4)]));
    }

    #[test]
    fn carrying_goes_to_nearest_delivery() {
        let world = world(vec![Cell::new(2, 3)], vec![Cell::new(0, 0), Cell::new(4, 2)], 1);
        let targets = Greedy.choose_targets(&world).expect("choose");
        assert_eq!(targets, Some(vec![Cell::new(4, 2)]));
    }

    #[test]
    fn ties_keep_the_first_candidate() {
        let world = world(vec![Cell::new(2, 4), Cell::new(4, 2), Cell::new(0, 2)], vec![Cell::new(5, 5)], 0);
        let targets = Greedy.choose_targets(&world).expect("choose");
        assert_eq!(targets, Some(vec![Cell::new(2, 4)]));
    }

    #[test]
    fn no_deliveries_left_means_none() {
        let world = world(Vec::new(), Vec::new(), 0);
        assert_eq!(Greedy.choose_targets(&world).expect("choose"), None);
    }

    #[test]
    fn no_pickups_left_falls_back_to_deliveries() {
        let world = world(Vec::new(), vec![Cell::new(0, 0)], 0);
        let targets = Greedy.choose_targets(&world).expect("choose");
        assert_eq!(targets, Some(vec![Cell::new(0, 0)]));
    }
}
