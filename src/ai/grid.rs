//! Walkability grid built from platform anchor positions
//!
//! Cells are whole world units. Only horizontal neighbors are connected,
//! so an unbroken platform top becomes one walkable run.

use bevy::prelude::*;

use crate::helpers::round_half_up;

#[derive(Debug, Clone, PartialEq)]
pub struct GridNode {
    pub cell: IVec2,
    pub walkable: bool,
    /// Walkable neighbors, left before right
    pub connections: Vec<IVec2>,
}

/// Dense `width x height` grid; node index is `x * height + y`
#[derive(Debug, Clone, Default)]
pub struct WalkabilityGrid {
    width: usize,
    height: usize,
    nodes: Vec<GridNode>,
}

impl WalkabilityGrid {
    /// Mark the cell nearest each anchor walkable, then link horizontal runs.
    /// Anchors outside the grid are ignored.
    pub fn build(width: usize, height: usize, anchors: &[Vec2]) -> Self {
        let mut nodes = Vec::with_capacity(width * height);
        for x in 0..width {
            for y in 0..height {
                nodes.push(GridNode {
                    cell: IVec2::new(x as i32, y as i32),
                    walkable: false,
                    connections: Vec::new(),
                });
            }
        }
        let mut grid = Self {
            width,
            height,
            nodes,
        };

        for anchor in anchors {
            let cell = IVec2::new(round_half_up(anchor.x), round_half_up(anchor.y));
            if let Some(index) = grid.index(cell.x, cell.y) {
                grid.nodes[index].walkable = true;
            }
        }

        for index in 0..grid.nodes.len() {
            if !grid.nodes[index].walkable {
                continue;
            }
            let cell = grid.nodes[index].cell;
            let connections: Vec<IVec2> = [cell - IVec2::X, cell + IVec2::X]
                .into_iter()
                .filter(|n| grid.node(n.x, n.y).is_some_and(|node| node.walkable))
                .collect();
            grid.nodes[index].connections = connections;
        }

        grid
    }

    /// Dense index of a cell, `None` out of bounds
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(x as usize * self.height + y as usize)
    }

    pub fn node(&self, x: i32, y: i32) -> Option<&GridNode> {
        self.index(x, y).map(|i| &self.nodes[i])
    }

    pub fn node_at_index(&self, index: usize) -> Option<&GridNode> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GridNode> {
        self.nodes.iter()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn walkable_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.walkable).count()
    }
}
