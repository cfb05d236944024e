//! World model: grid, targets and the agent.
//!
//! `GridWorld` is a plain value. Cloning it yields a fully independent
//! snapshot (grid, target lists and agent state are all owned), which is what
//! the planner relies on to keep search branches isolated from each other and
//! from the live world.

use anyhow::{Result, bail};

use crate::core::annotate::TargetAnnotations;
use crate::core::grid::Grid;
use crate::core::invariants::validate_world_invariants;
use crate::core::types::{Cell, TargetKind};

/// Mutable state of the delivery agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AgentState {
    pub position: Cell,
    /// Items carried, bounded by `Rules::capacity`.
    pub cargo: u32,
    /// Energy level. May go negative; a deficit only costs score.
    pub battery: i64,
    annotations: TargetAnnotations,
}

impl AgentState {
    pub fn new(position: Cell, battery: i64) -> Self {
        Self {
            position,
            cargo: 0,
            battery,
            annotations: TargetAnnotations::default(),
        }
    }

    /// Advisory distance/cost estimates from the last refresh.
    pub fn annotations(&self) -> &TargetAnnotations {
        &self.annotations
    }

    pub(crate) fn set_annotations(&mut self, annotations: TargetAnnotations) {
        self.annotations = annotations;
    }
}

/// Grid, remaining targets and the agent.
///
/// Pickups and deliveries keep their original order; strategies enumerate
/// them in that order, which makes tie-breaking reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridWorld {
    grid: Grid,
    pickups: Vec<Cell>,
    deliveries: Vec<Cell>,
    recharge: Option<Cell>,
    agent: AgentState,
}

impl GridWorld {
    /// Build a world, rejecting any layout that breaks the world invariants.
    pub fn new(
        grid: Grid,
        pickups: Vec<Cell>,
        deliveries: Vec<Cell>,
        recharge: Option<Cell>,
        agent: AgentState,
    ) -> Result<Self> {
        let world = Self {
            grid,
            pickups,
            deliveries,
            recharge,
            agent,
        };
        let errors = validate_world_invariants(&world);
        if !errors.is_empty() {
            bail!("invalid world:\n- {}", errors.join("\n- "));
        }
        Ok(world)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn pickups(&self) -> &[Cell] {
        &self.pickups
    }

    pub fn deliveries(&self) -> &[Cell] {
        &self.deliveries
    }

    pub fn recharge(&self) -> Option<Cell> {
        self.recharge
    }

    pub fn agent(&self) -> &AgentState {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut AgentState {
        &mut self.agent
    }

    /// Classify `cell` as one of the remaining targets.
    pub fn target_kind(&self, cell: Cell) -> Option<TargetKind> {
        if self.pickups.contains(&cell) {
            Some(TargetKind::Pickup)
        } else if self.deliveries.contains(&cell) {
            Some(TargetKind::Delivery)
        } else if self.recharge == Some(cell) {
            Some(TargetKind::Recharge)
        } else {
            None
        }
    }

    /// Remove a pickup. Returns false if `cell` is not a remaining pickup.
    pub fn take_pickup(&mut self, cell: Cell) -> bool {
        take(&mut self.pickups, cell)
    }

    /// Remove a delivery. Returns false if `cell` is not a remaining delivery.
    pub fn take_delivery(&mut self, cell: Cell) -> bool {
        take(&mut self.deliveries, cell)
    }
}

fn take(cells: &mut Vec<Cell>, cell: Cell) -> bool {
    match cells.iter().position(|c| *c == cell) {
        Some(idx) => {
            cells.remove(idx);
            true
        }
        None => false,
    }
}
