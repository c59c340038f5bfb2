// Reachable-region partitioning and dead-end marking
//
// Traversable cells are split into 4-connected components. A component with
// fewer cells than our body length cannot hold the snake, so every cell in it
// is rewritten as `Cell::DeadEnd` and drops out of the path search.

use std::collections::VecDeque;

use crate::grid::{Cell, Grid};
use crate::types::Direction;

/// Connected components of traversable cells, in row-major discovery order
#[derive(Debug, Clone, Default)]
pub struct Regions {
    pub components: Vec<Vec<usize>>,
}

impl Regions {
    /// Flood-fills every traversable cell of the grid
    pub fn partition(grid: &Grid) -> Self {
        let mut visited = vec![false; grid.len()];
        let mut components = Vec::new();

        for start in 0..grid.len() {
            if visited[start] || !grid.cell(start).is_traversable() {
                continue;
            }

            let mut component = Vec::new();
            let mut queue = VecDeque::new();
            visited[start] = true;
            queue.push_back(start);

            while let Some(index) = queue.pop_front() {
                component.push(index);
                for &dir in Direction::all().iter() {
                    if let Some(n) = grid.neighbor(index, dir) {
                        if !visited[n] && grid.cell(n).is_traversable() {
                            visited[n] = true;
                            queue.push_back(n);
                        }
                    }
                }
            }

            components.push(component);
        }

        Regions { components }
    }

    /// Components too small for a body of `length`
    pub fn dead_ends(&self, length: usize) -> impl Iterator<Item = &Vec<usize>> + '_ {
        self.components.iter().filter(move |c| c.len() < length)
    }
}

/// Rewrites every component smaller than `length` as dead end
///
/// Returns the partition that was computed so callers can log it.
pub fn mark_dead_ends(grid: &mut Grid, length: usize) -> Regions {
    let regions = Regions::partition(grid);
    for component in regions.dead_ends(length) {
        let size = component.len();
        for &index in component {
            grid.set(index, Cell::DeadEnd { size });
        }
    }
    regions
}
