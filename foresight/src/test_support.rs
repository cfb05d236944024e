//! Test-only builders for small, hand-made worlds and configs.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::core::grid::Grid;
use crate::core::types::Cell;
use crate::core::world::{AgentState, GridWorld};
use crate::io::config::SimConfig;

/// 5×5 open grid: agent at (0,0), pickup at (0,2), delivery at (0,4).
pub fn corridor_world(recharge: Option<Cell>, battery: i64) -> GridWorld {
    GridWorld::new(
        Grid::open(5).expect("grid"),
        vec![Cell::new(0, 2)],
        vec![Cell::new(0, 4)],
        recharge,
        AgentState::new(Cell::new(0, 0), battery),
    )
    .expect("corridor world")
}

/// 5×5 grid cut in half by a wall on row 2; every target is out of reach.
pub fn walled_world() -> GridWorld {
    let grid = Grid::from_rows(&[".....", ".....", "#####", ".....", "....."]).expect("grid");
    GridWorld::new(
        grid,
        vec![Cell::new(0, 4)],
        vec![Cell::new(4, 4)],
        None,
        AgentState::new(Cell::new(0, 0), 10),
    )
    .expect("walled world")
}

/// Small generated worlds that plan quickly.
pub fn small_config() -> SimConfig {
    let mut cfg = SimConfig::default();
    cfg.world.size = 12;
    cfg.world.deliveries = 2;
    cfg.world.extra_pickups = 1;
    cfg.planner.depth = 2;
    cfg.run.max_cycles = 200;
    cfg
}

/// Hash of every field of `world`, annotations included.
pub fn world_fingerprint(world: &GridWorld) -> u64 {
    let mut hasher = DefaultHasher::new();
    world.hash(&mut hasher);
    hasher.finish()
}
