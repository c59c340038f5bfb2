// Threat distance field: how soon the nearest enemy head can reach each cell

use crate::grid::Grid;
use crate::types::{Battlesnake, Coord};

/// Per-cell minimum Manhattan distance to any enemy head
///
/// Laid out like [`Grid`] (row-major). With no enemy heads every cell holds
/// the sentinel `width + height`. No real distance on the board gets that far,
/// so a sentinel cell is never lost, however long the path to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    width: usize,
    sentinel: usize,
    values: Vec<usize>,
}

impl DistanceField {
    pub fn new(width: usize, height: usize, enemy_heads: &[Coord]) -> Self {
        let sentinel = width + height;
        let mut values = vec![sentinel; width * height];

        if !enemy_heads.is_empty() {
            for (i, value) in values.iter_mut().enumerate() {
                let cell = Coord {
                    x: (i % width) as i32,
                    y: (i / width) as i32,
                };
                *value = enemy_heads
                    .iter()
                    .map(|head| cell.manhattan(head) as usize)
                    .min()
                    .unwrap_or(sentinel);
            }
        }

        DistanceField {
            width,
            sentinel,
            values,
        }
    }

    /// Wraps precomputed row-major distances
    pub fn from_values(width: usize, values: Vec<usize>) -> Self {
        let height = if width == 0 { 0 } else { values.len() / width };
        DistanceField {
            width,
            sentinel: width + height,
            values,
        }
    }

    /// Builds the field for a grid from every non-empty snake except `you`
    pub fn for_enemies(grid: &Grid, snakes: &[Battlesnake], you: &Battlesnake) -> Self {
        let heads: Vec<Coord> = snakes
            .iter()
            .filter(|s| s.id != you.id)
            .filter_map(|s| s.head())
            .collect();
        DistanceField::new(grid.width(), grid.height(), &heads)
    }

    pub fn sentinel(&self) -> usize {
        self.sentinel
    }

    /// True when a snake arriving after `steps` moves gets to the cell strictly
    /// before any enemy head could
    pub fn outruns(&self, index: usize, steps: usize) -> bool {
        let distance = self.values[index];
        distance >= self.sentinel || distance > steps
    }

    pub fn get(&self, coord: &Coord) -> Option<usize> {
        if coord.x < 0 || coord.y < 0 || coord.x as usize >= self.width {
            return None;
        }
        self.values
            .get(coord.y as usize * self.width + coord.x as usize)
            .copied()
    }

    pub fn values(&self) -> &[usize] {
        &self.values
    }
}
