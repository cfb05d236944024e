//! Layout invariants for a `GridWorld`.

use std::collections::HashSet;

use crate::core::types::Cell;
use crate::core::world::GridWorld;

/// Check the layout invariants of a world:
/// - Targets and the agent are in bounds and on free cells
/// - No cell is used twice across pickups, deliveries and recharge
///
/// Returns one message per violation; empty means valid.
pub fn validate_world_invariants(world: &GridWorld) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    let targets = world
        .pickups()
        .iter()
        .map(|cell| ("pickup", *cell))
        .chain(world.deliveries().iter().map(|cell| ("delivery", *cell)))
        .chain(world.recharge().map(|cell| ("recharge", cell)));

    for (label, cell) in targets {
        check_free(world, label, cell, &mut errors);
        if !seen.insert(cell) {
            errors.push(format!("{label} {cell} coincides with another target"));
        }
    }

    check_free(world, "agent", world.agent().position, &mut errors);
    errors
}

fn check_free(world: &GridWorld, label: &str, cell: Cell, errors: &mut Vec<String>) {
    if !world.grid().in_bounds(cell) {
        errors.push(format!("{label} {cell} is out of bounds"));
    } else if !world.grid().is_free(cell) {
        errors.push(format!("{label} {cell} is on an obstacle"));
    }
}

#[cfg(test)]
mod tests {
    use crate::core::grid::Grid;
    use crate::core::types::Cell;
    use crate::core::world::{AgentState, GridWorld};

    #[test]
    fn reports_each_violation() {
        let grid = Grid::from_rows(&["..#", "...", "..."]).expect("grid");
        let err = GridWorld::new(
            grid,
            vec![Cell::new(2, 0), Cell::new(1, 1)],
            vec![Cell::new(1, 1), Cell::new(5, 5)],
            None,
            AgentState::new(Cell::new(0, 0), 10),
        )
        .unwrap_err()
        .to_string();
        assert!(err.contains("pickup (2,0) is on an obstacle"));
        assert!(err.contains("delivery (1,1) coincides with another target"));
        assert!(err.contains("delivery (5,5) is out of bounds"));
    }

    #[test]
    fn agent_must_stand_on_a_free_cell() {
        let grid = Grid::from_rows(&["#..", "...", "..."]).expect("grid");
        let err = GridWorld::new(
            grid,
            vec![Cell::new(1, 1)],
            vec![Cell::new(2, 2)],
            None,
            AgentState::new(Cell::new(0, 0), 10),
        )
        .unwrap_err()
        .to_string();
        assert!(err.contains("agent (0,0) is on an obstacle"));
    }
}
