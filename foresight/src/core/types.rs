//! Shared deterministic types for the delivery core.
//!
//! These types define stable contracts between the world model, pathfinding,
//! scoring and the strategies. They must not depend on external state or I/O.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A grid coordinate `(x, y)`.
///
/// Ordering is lexicographic on `(x, y)`; A* relies on it to break ties
/// between equal f-scores deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to `other`.
    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// 4-connected neighbours in fixed order: +x, -x, +y, -y.
    pub fn neighbors_4(self) -> [Cell; 4] {
        [
            Cell::new(self.x + 1, self.y),
            Cell::new(self.x - 1, self.y),
            Cell::new(self.x, self.y + 1),
            Cell::new(self.x, self.y - 1),
        ]
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Ordered list of target cells chosen by a strategy.
pub type ActionSequence = Vec<Cell>;

/// What occupies a target cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Pickup,
    Delivery,
    Recharge,
}

/// Energy and reward rules shared by simulation and real execution.
///
/// Costs are stored as positive magnitudes and subtracted from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    /// Maximum items carried at once.
    pub capacity: u32,
    /// Battery level set when the agent enters the recharge cell.
    pub recharge_level: i64,
    /// Score lost per move while battery stays non-negative.
    pub move_cost: i64,
    /// Score lost per move once battery has gone negative.
    pub deficit_cost: i64,
    /// Score gained per completed delivery.
    pub delivery_reward: i64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            capacity: 4,
            recharge_level: 60,
            move_cost: 1,
            deficit_cost: 5,
            delivery_reward: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_order_by_x_then_y() {
        let mut cells = vec![Cell::new(1, 0), Cell::new(0, 2), Cell::new(0, 1)];
        cells.sort();
        assert_eq!(cells, vec![Cell::new(0, 1), Cell::new(0, 2), Cell::new(1, 0)]);
    }

    #[test]
    fn manhattan_is_symmetric() {
        let a = Cell::new(2, 7);
        let b = Cell::new(5, 3);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(b.manhattan(a), 7);
    }
}
