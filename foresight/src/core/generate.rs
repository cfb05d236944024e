//! Seeded world generation.
//!
//! Obstacles follow an assembly-line pattern: short horizontal and vertical
//! wall segments with random gaps, plus one large square block. Targets, the
//! agent and the recharge cell are then placed on distinct free cells. The
//! same seed and parameters always produce the same world.

use anyhow::{Result, bail};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::core::grid::{Grid, MAX_GRID_SIZE};
use crate::core::types::Cell;
use crate::core::world::{AgentState, GridWorld};

/// Smallest grid the segment layout fits in.
pub const MIN_GENERATED_SIZE: usize = 11;

const WALL_SEGMENTS: usize = 7;
const WALL_DENSITY: f64 = 0.7;
const RECHARGE_CENTER_ATTEMPTS: usize = 100;

/// Inputs for `generate_world`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldParams {
    pub size: usize,
    /// Number of delivery cells; also the number of items to deliver.
    pub deliveries: usize,
    /// Pickups placed on top of one per delivery.
    pub extra_pickups: usize,
    pub initial_battery: i64,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            size: 30,
            deliveries: 4,
            extra_pickups: 1,
            initial_battery: 70,
        }
    }
}

impl WorldParams {
    pub fn validate(&self) -> Result<()> {
        if self.size < MIN_GENERATED_SIZE {
            bail!(
                "world size {} is too small (minimum {})",
                self.size,
                MIN_GENERATED_SIZE
            );
        }
        if self.size > MAX_GRID_SIZE {
            bail!(
                "world size {} is too large (maximum {})",
                self.size,
                MAX_GRID_SIZE
            );
        }
        if self.deliveries == 0 {
            bail!("deliveries must be > 0");
        }
        Ok(())
    }

    fn pickups(&self) -> usize {
        self.deliveries + self.extra_pickups
    }
}

/// Generate a world. `None` seeds from OS entropy.
pub fn generate_world(params: &WorldParams, seed: Option<u64>) -> Result<GridWorld> {
    params.validate()?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let grid = generate_obstacles(params.size, &mut rng)?;
    // Pickups, deliveries, agent and recharge each need their own free cell.
    let required = params.pickups() + params.deliveries + 2;
    if grid.free_count() < required {
        bail!(
            "only {} free cells, need {} to place every target",
            grid.free_count(),
            required
        );
    }

    let mut pickups = Vec::with_capacity(params.pickups());
    while pickups.len() < params.pickups() {
        let cell = random_cell(params.size, &mut rng);
        if grid.is_free(cell) && !pickups.contains(&cell) {
            pickups.push(cell);
        }
    }

    let mut deliveries = Vec::with_capacity(params.deliveries);
    while deliveries.len() < params.deliveries {
        let cell = random_cell(params.size, &mut rng);
        if grid.is_free(cell) && !deliveries.contains(&cell) && !pickups.contains(&cell) {
            deliveries.push(cell);
        }
    }

    let is_open = |cell: Cell| {
        grid.is_free(cell) && !pickups.contains(&cell) && !deliveries.contains(&cell)
    };

    let agent = loop {
        let cell = random_cell(params.size, &mut rng);
        if is_open(cell) {
            break cell;
        }
    };

    let center = (params.size / 2) as i32;
    let mut recharge = None;
    for _ in 0..RECHARGE_CENTER_ATTEMPTS {
        let cell = Cell::new(
            rng.gen_range(center - 1..=center + 1),
            rng.gen_range(center - 1..=center + 1),
        );
        if is_open(cell) && cell != agent {
            recharge = Some(cell);
            break;
        }
    }
    let recharge = match recharge {
        Some(cell) => cell,
        None => loop {
            let cell = random_cell(params.size, &mut rng);
            if is_open(cell) && cell != agent {
                break cell;
            }
        },
    };

    debug!(?seed, %agent, %recharge, "world generated");
    GridWorld::new(
        grid,
        pickups,
        deliveries,
        Some(recharge),
        AgentState::new(agent, params.initial_battery),
    )
}

fn generate_obstacles(size: usize, rng: &mut StdRng) -> Result<Grid> {
    let mut grid = Grid::open(size)?;
    let n = size as i32;

    for _ in 0..WALL_SEGMENTS {
        let row = rng.gen_range(5..=n - 6);
        let start = rng.gen_range(0..=n - 10);
        let length = rng.gen_range(5..=10);
        for col in start..start + length {
            if rng.gen_bool(WALL_DENSITY) {
                grid.block(Cell::new(col, row));
            }
        }
    }

    for _ in 0..WALL_SEGMENTS {
        let col = rng.gen_range(5..=n - 6);
        let start = rng.gen_range(0..=n - 10);
        let length = rng.gen_range(5..=10);
        for row in start..start + length {
            if rng.gen_bool(WALL_DENSITY) {
                grid.block(Cell::new(col, row));
            }
        }
    }

    let side = if rng.gen_bool(0.5) { 4 } else { 6 };
    let top = rng.gen_range(0..=n - side);
    let left = rng.gen_range(0..=n - side);
    for row in top..top + side {
        for col in left..left + side {
            grid.block(Cell::new(col, row));
        }
    }

    Ok(grid)
}

fn random_cell(size: usize, rng: &mut StdRng) -> Cell {
    let n = size as i32;
    Cell::new(rng.gen_range(0..n), rng.gen_range(0..n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_world() {
        let params = WorldParams::default();
        let a = generate_world(&params, Some(42)).expect("world");
        let b = generate_world(&params, Some(42)).expect("world");
        assert_eq!(a, b);
    }

    #[test]
    fn places_every_target_on_distinct_free_cells() {
        let params = WorldParams::default();
        for seed in 1..=40 {
            let world = generate_world(&params, Some(seed)).expect("world");
            assert_eq!(world.pickups().len(), 5, "seed {seed}");
            assert_eq!(world.deliveries().len(), 4, "seed {seed}");
            let recharge = world.recharge().expect("recharge");
            assert_ne!(recharge, world.agent().position, "seed {seed}");
            assert_eq!(world.target_kind(world.agent().position), None, "seed {seed}");
        }
    }

    #[test]
    fn agent_starts_with_configured_battery_and_no_cargo() {
        let params = WorldParams {
            initial_battery: 33,
            ..WorldParams::default()
        };
        let world = generate_world(&params, Some(7)).expect("world");
        assert_eq!(world.agent().battery, 33);
        assert_eq!(world.agent().cargo, 0);
    }

    #[test]
    fn rejects_grids_too_small_for_the_layout() {
        let params = WorldParams {
            size: 10,
            ..WorldParams::default()
        };
        let err = generate_world(&params, Some(1)).unwrap_err();
        assert!(err.to_string().contains("too small"));
    }

    #[test]
    fn rejects_grids_too_large_before_allocating() {
        let params = WorldParams {
            size: 100_000,
            ..WorldParams::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn rejects_more_targets_than_free_cells() {
        let params = WorldParams {
            size: 11,
            deliveries: 80,
            ..WorldParams::default()
        };
        let err = generate_world(&params, Some(1)).unwrap_err();
        assert!(err.to_string().contains("free cells"));
    }

    #[test]
    fn rejects_zero_deliveries() {
        let params = WorldParams {
            deliveries: 0,
            ..WorldParams::default()
        };
        assert!(generate_world(&params, Some(1)).is_err());
    }
}
