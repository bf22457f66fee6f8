//! A* pathfinding over the walkability grid
//!
//! Deterministic: equal-cost ties pop in insertion order and neighbors are
//! expanded left before right.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy::prelude::*;

use crate::ai::grid::WalkabilityGrid;

/// Node in the A* search priority queue
#[derive(Clone, Copy)]
struct SearchNode {
    /// Dense grid index
    node_index: usize,
    /// Cost from start to this node (g-score)
    g_cost: f32,
    /// Estimated total cost (f-score = g + h)
    f_cost: f32,
    /// Push order, for stable tie-breaking
    sequence: u32,
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (lower f_cost = higher priority),
        // then earlier pushes first
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Cells from start to goal inclusive; empty when unreachable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathResult {
    pub nodes: Vec<IVec2>,
}

impl PathResult {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The cell to steer toward (the one after the start)
    pub fn next_step(&self) -> Option<IVec2> {
        self.nodes.get(1).copied()
    }
}

/// Find a path between two cells using A*
pub fn find_path(grid: &WalkabilityGrid, start: IVec2, goal: IVec2) -> PathResult {
    let (Some(start_index), Some(goal_index)) =
        (grid.index(start.x, start.y), grid.index(goal.x, goal.y))
    else {
        return PathResult::default();
    };

    if start_index == goal_index {
        return PathResult { nodes: vec![start] };
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: Vec<Option<usize>> = vec![None; grid.node_count()];
    let mut g_scores = vec![f32::INFINITY; grid.node_count()];
    let mut closed = vec![false; grid.node_count()];
    let mut sequence = 0;

    g_scores[start_index] = 0.0;
    open_set.push(SearchNode {
        node_index: start_index,
        g_cost: 0.0,
        f_cost: heuristic(start, goal),
        sequence,
    });

    while let Some(current) = open_set.pop() {
        if current.node_index == goal_index {
            return PathResult {
                nodes: reconstruct_path(grid, &came_from, goal_index),
            };
        }

        if closed[current.node_index] {
            continue;
        }
        closed[current.node_index] = true;

        let Some(node) = grid.node_at_index(current.node_index) else {
            continue;
        };
        for &neighbor in &node.connections {
            let Some(neighbor_index) = grid.index(neighbor.x, neighbor.y) else {
                continue;
            };
            if closed[neighbor_index] {
                continue;
            }
            let tentative_g = current.g_cost + heuristic(node.cell, neighbor);
            if tentative_g < g_scores[neighbor_index] {
                g_scores[neighbor_index] = tentative_g;
                came_from[neighbor_index] = Some(current.node_index);
                sequence += 1;
                open_set.push(SearchNode {
                    node_index: neighbor_index,
                    g_cost: tentative_g,
                    f_cost: tentative_g + heuristic(neighbor, goal),
                    sequence,
                });
            }
        }
    }

    PathResult::default()
}

/// Euclidean distance between cell coordinates
fn heuristic(from: IVec2, to: IVec2) -> f32 {
    from.as_vec2().distance(to.as_vec2())
}

fn reconstruct_path(grid: &WalkabilityGrid, came_from: &[Option<usize>], goal: usize) -> Vec<IVec2> {
    let mut indices = vec![goal];
    let mut current = goal;
    while let Some(parent) = came_from[current] {
        indices.push(parent);
        current = parent;
    }
    indices
        .into_iter()
        .rev()
        .filter_map(|i| grid.node_at_index(i).map(|n| n.cell))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Floor run at y=1 across x 0..=7 plus a floating run at y=2, x 5..=7
    fn arena_grid() -> WalkabilityGrid {
        let mut anchors: Vec<Vec2> = (0..=7).map(|x| Vec2::new(x as f32, 1.0)).collect();
        anchors.extend((5..=7).map(|x| Vec2::new(x as f32, 2.0)));
        WalkabilityGrid::build(8, 5, &anchors)
    }

    #[test]
    fn test_same_cell_is_single_node() {
        let grid = arena_grid();
        let path = find_path(&grid, IVec2::new(3, 1), IVec2::new(3, 1));
        assert_eq!(path.nodes, vec![IVec2::new(3, 1)]);
        assert!(path.next_step().is_none());
    }

    #[test]
    fn test_same_run_path_is_monotonic() {
        let grid = arena_grid();
        let path = find_path(&grid, IVec2::new(1, 1), IVec2::new(6, 1));
        assert_eq!(path.len(), 6);
        assert_eq!(path.nodes.first(), Some(&IVec2::new(1, 1)));
        assert_eq!(path.nodes.last(), Some(&IVec2::new(6, 1)));
        for pair in path.nodes.windows(2) {
            assert_eq!(pair[1].x, pair[0].x + 1);
            assert_eq!(pair[1].y, 1);
        }

        let back = find_path(&grid, IVec2::new(6, 1), IVec2::new(2, 1));
        assert_eq!(back.next_step(), Some(IVec2::new(5, 1)));
        for pair in back.nodes.windows(2) {
            assert!(pair[1].x < pair[0].x);
        }
    }

    #[test]
    fn test_disjoint_runs_are_unreachable() {
        let grid = arena_grid();
        assert!(find_path(&grid, IVec2::new(1, 1), IVec2::new(6, 2)).is_empty());
        assert!(find_path(&grid, IVec2::new(6, 2), IVec2::new(6, 1)).is_empty());
    }

    #[test]
    fn test_out_of_bounds_endpoints_give_empty_path() {
        let grid = arena_grid();
        assert!(find_path(&grid, IVec2::new(-1, 1), IVec2::new(3, 1)).is_empty());
        assert!(find_path(&grid, IVec2::new(3, 1), IVec2::new(3, 9)).is_empty());
    }

    #[test]
    fn test_unwalkable_goal_is_unreachable() {
        let grid = arena_grid();
        assert!(find_path(&grid, IVec2::new(1, 1), IVec2::new(2, 3)).is_empty());
    }

    #[test]
    fn test_path_is_deterministic() {
        let grid = arena_grid();
        let first = find_path(&grid, IVec2::new(0, 1), IVec2::new(7, 1));
        for _ in 0..5 {
            assert_eq!(find_path(&grid, IVec2::new(0, 1), IVec2::new(7, 1)), first);
        }
    }
}
