//! Deterministic shortest paths over the 4-connected grid.
//!
//! Every move costs 1. Both searches read the grid only; they never touch
//! targets or the agent, so they are safe to run against the live world and
//! against planner snapshots alike.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::trace;

use crate::core::grid::Grid;
use crate::core::types::Cell;

/// A* from `start` to `goal`.
///
/// Returns the cells after `start` up to and including `goal`, or `None` when
/// either endpoint is blocked/out of bounds or `goal` cannot be reached. When
/// `start == goal` the path is empty.
///
/// The open set is keyed on `(f, cell)`, so equal f-scores resolve to the
/// smaller coordinate rather than to insertion order.
pub fn shortest_path(grid: &Grid, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
    let start_idx = grid.index(start).filter(|_| grid.is_free(start))?;
    let goal_idx = grid.index(goal).filter(|_| grid.is_free(goal))?;
    if start_idx == goal_idx {
        return Some(Vec::new());
    }

    let cells = grid.size() * grid.size();
    let mut g_score = vec![u32::MAX; cells];
    let mut came_from: Vec<Option<Cell>> = vec![None; cells];
    let mut closed = vec![false; cells];
    let mut open = BinaryHeap::new();

    g_score[start_idx] = 0;
    open.push(Reverse((start.manhattan(goal), start)));

    while let Some(Reverse((_, current))) = open.pop() {
        if current == goal {
            return Some(reconstruct(grid, &came_from, start, goal));
        }
        let Some(current_idx) = grid.index(current) else {
            continue;
        };
        if closed[current_idx] {
            continue;
        }
        closed[current_idx] = true;

        let tentative = g_score[current_idx] + 1;
        for neighbor in grid.free_neighbors(current) {
            let Some(idx) = grid.index(neighbor) else {
                continue;
            };
            if closed[idx] || tentative >= g_score[idx] {
                continue;
            }
            g_score[idx] = tentative;
            came_from[idx] = Some(current);
            open.push(Reverse((tentative + neighbor.manhattan(goal), neighbor)));
        }
    }

    trace!(%start, %goal, "no path");
    None
}

fn reconstruct(grid: &Grid, came_from: &[Option<Cell>], start: Cell, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(prev) = grid.index(current).and_then(|idx| came_from[idx]) {
        if prev == start {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Minimal step counts from one origin to every cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    size: usize,
    steps: Vec<Option<u32>>,
}

impl DistanceMap {
    /// Steps from the origin, or `None` if `cell` is unreachable (infinite).
    pub fn get(&self, cell: Cell) -> Option<u32> {
        let n = self.size as i32;
        if !(0..n).contains(&cell.x) || !(0..n).contains(&cell.y) {
            return None;
        }
        self.steps[cell.y as usize * self.size + cell.x as usize]
    }
}

/// Uniform-cost search from `start` over free cells.
///
/// With unit weights this is Dijkstra; unreachable cells stay at infinity.
/// A blocked or out-of-bounds `start` reaches nothing.
pub fn all_distances(grid: &Grid, start: Cell) -> DistanceMap {
    let cells = grid.size() * grid.size();
    let mut steps: Vec<Option<u32>> = vec![None; cells];
    let Some(start_idx) = grid.index(start).filter(|_| grid.is_free(start)) else {
        return DistanceMap {
            size: grid.size(),
            steps,
        };
    };

    let mut settled = vec![false; cells];
    let mut frontier = BinaryHeap::new();
    steps[start_idx] = Some(0);
    frontier.push(Reverse((0u32, start)));

    while let Some(Reverse((dist, current))) = frontier.pop() {
        let Some(current_idx) = grid.index(current) else {
            continue;
        };
        if settled[current_idx] {
            continue;
        }
        settled[current_idx] = true;

        for neighbor in grid.free_neighbors(current) {
            let Some(idx) = grid.index(neighbor) else {
                continue;
            };
            let next = dist + 1;
            if steps[idx].is_none_or(|known| next < known) {
                steps[idx] = Some(next);
                frontier.push(Reverse((next, neighbor)));
            }
        }
    }

    DistanceMap {
        size: grid.size(),
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maze() -> Grid {
        Grid::from_rows(&[
            ".....#....",
            ".###.#.##.",
            ".#...#..#.",
            ".#.###.##.",
            ".#........",
            ".####.###.",
            "......#...",
            "##.##.#.#.",
            "...#..#.#.",
            ".#...##...",
        ])
        .expect("maze")
    }

    fn is_connected_walk(grid: &Grid, start: Cell, path: &[Cell]) -> bool {
        let mut prev = start;
        for cell in path {
            if prev.manhattan(*cell) != 1 || !grid.is_free(*cell) {
                return false;
            }
            prev = *cell;
        }
        true
    }

    #[test]
    fn path_length_matches_uniform_cost_distance_for_every_pair() {
        let grid = maze();
        let n = grid.size() as i32;
        let free: Vec<Cell> = (0..n)
            .flat_map(|y| (0..n).map(move |x| Cell::new(x, y)))
            .filter(|cell| grid.is_free(*cell))
            .collect();

        for start in &free {
            let distances = all_distances(&grid, *start);
            for goal in &free {
                let path = shortest_path(&grid, *start, *goal);
                match distances.get(*goal) {
                    Some(expected) => {
                        let path = path.expect("reachable goal must have a path");
                        assert_eq!(path.len() as u32, expected, "{start} -> {goal}");
                        assert!(is_connected_walk(&grid, *start, &path));
                        if let Some(last) = path.last() {
                            assert_eq!(last, goal);
                        }
                    }
                    None => assert!(path.is_none(), "{start} -> {goal} should be unreachable"),
                }
            }
        }
    }

    #[test]
    fn path_excludes_start_and_includes_goal() {
        let grid = Grid::open(5).expect("grid");
        let path = shortest_path(&grid, Cell::new(0, 0), Cell::new(0, 2)).expect("path");
        assert_eq!(path, vec![Cell::new(0, 1), Cell::new(0, 2)]);
    }

    #[test]
    fn start_equal_to_goal_is_an_empty_path() {
        let grid = Grid::open(3).expect("grid");
        assert_eq!(
            shortest_path(&grid, Cell::new(1, 1), Cell::new(1, 1)),
            Some(Vec::new())
        );
    }

    #[test]
    fn blocked_or_out_of_bounds_goal_fails() {
        let grid = Grid::from_rows(&["...", ".#.", "..."]).expect("grid");
        assert!(shortest_path(&grid, Cell::new(0, 0), Cell::new(1, 1)).is_none());
        assert!(shortest_path(&grid, Cell::new(0, 0), Cell::new(3, 0)).is_none());
    }

    #[test]
    fn walled_off_goal_fails() {
        let grid = Grid::from_rows(&["..#..", "..#..", "..#..", "..#..", "..#.."]).expect("grid");
        assert!(shortest_path(&grid, Cell::new(0, 0), Cell::new(4, 4)).is_none());
        let distances = all_distances(&grid, Cell::new(0, 0));
        assert_eq!(distances.get(Cell::new(4, 4)), None);
        assert_eq!(distances.get(Cell::new(1, 4)), Some(5));
        assert_eq!(distances.get(Cell::new(3, 0)), None);
    }

    #[test]
    fn equal_cost_paths_resolve_identically() {
        let grid = Grid::open(6).expect("grid");
        let first = shortest_path(&grid, Cell::new(0, 0), Cell::new(4, 3)).expect("path");
        for _ in 0..5 {
            let again = shortest_path(&grid, Cell::new(0, 0), Cell::new(4, 3)).expect("path");
            assert_eq!(first, again);
        }
        assert_eq!(first.len(), 7);
    }

    #[test]
    fn ties_prefer_the_smaller_coordinate() {
        // From (1,1) to (2,2) both (2,1) and (1,2) have f = 2; (1,2) < (2,1).
        let grid = Grid::open(4).expect("grid");
        let path = shortest_path(&grid, Cell::new(1, 1), Cell::new(2, 2)).expect("path");
        assert_eq!(path, vec![Cell::new(1, 2), Cell::new(2, 2)]);
    }

    #[test]
    fn distances_from_blocked_start_are_all_infinite() {
        let grid = Grid::from_rows(&["#..", "...", "..."]).expect("grid");
        let distances = all_distances(&grid, Cell::new(0, 0));
        assert_eq!(distances.get(Cell::new(0, 0)), None);
        assert_eq!(distances.get(Cell::new(1, 0)), None);
        assert_eq!(distances.get(Cell::new(2, 2)), None);
    }
}
