// Breadth-first path enumeration from our head
//
// One BFS over traversable cells, sharing a single visited set, so every
// reachable cell is discovered exactly once at its shortest distance. Each
// discovery becomes a path in the bucket matching the cell it lands on.

use std::collections::VecDeque;
use std::time::Instant;

use crate::grid::{Cell, Grid};
use crate::types::{Coord, Direction};

/// How many cells are expanded between deadline checks
const DEADLINE_CHECK_INTERVAL: usize = 64;

/// A single move along a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub direction: Direction,
    pub coord: Coord,
    pub index: usize,
}

/// Shortest route from the head to one target cell
///
/// Only the endpoints are stored; the steps in between live in the search tree
/// of the [`PathBuckets`] that found the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Path {
    /// Direction of the first move out of the head
    pub first: Direction,
    pub target: Coord,
    /// Flat index of `target`
    pub index: usize,
    pub length: usize,
}

impl Path {
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Kind of cell a path ends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Food,
    Tail,
    Empty,
}

impl Target {
    fn classify(cell: Cell) -> Option<Target> {
        match cell {
            Cell::Food => Some(Target::Food),
            Cell::SafeTail => Some(Target::Tail),
            Cell::Empty => Some(Target::Empty),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Food => "food",
            Target::Tail => "tail",
            Target::Empty => "empty",
        }
    }
}

/// Paths found by one enumeration, in discovery order within each bucket
#[derive(Debug, Clone, Default)]
pub struct PathBuckets {
    pub food: Vec<Path>,
    pub tail: Vec<Path>,
    pub empty: Vec<Path>,
    /// Cells discovered by the search
    pub visited: usize,
    /// False when the deadline cut the search short
    pub complete: bool,
    width: usize,
    head: Option<usize>,
    parent: Vec<Option<(usize, Direction)>>,
    depth: Vec<usize>,
    order: Vec<usize>,
}

impl PathBuckets {
    pub fn bucket(&self, target: Target) -> &[Path] {
        match target {
            Target::Food => &self.food,
            Target::Tail => &self.tail,
            Target::Empty => &self.empty,
        }
    }

    fn push(&mut self, target: Target, path: Path) {
        match target {
            Target::Food => self.food.push(path),
            Target::Tail => self.tail.push(path),
            Target::Empty => self.empty.push(path),
        }
    }

    /// Flat index of the search origin, if it was on the board
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    /// Discovered cells in BFS order; every cell comes after its parent
    pub fn discovery_order(&self) -> &[usize] {
        &self.order
    }

    /// Cell the search entered `index` from
    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.parent.get(index).copied().flatten().map(|(from, _)| from)
    }

    /// Moves from the head to `index`, zero for the head and undiscovered cells
    pub fn depth_of(&self, index: usize) -> usize {
        self.depth.get(index).copied().unwrap_or(0)
    }

    /// Number of cells on the searched board
    pub fn cell_count(&self) -> usize {
        self.depth.len()
    }

    /// Rebuilds the full step sequence of `path` from the search tree
    pub fn steps(&self, path: &Path) -> Vec<Step> {
        let mut steps = Vec::with_capacity(path.length);
        let mut at = path.index;
        while let Some((from, direction)) = self.parent.get(at).copied().flatten() {
            steps.push(Step {
                direction,
                coord: Coord {
                    x: (at % self.width) as i32,
                    y: (at / self.width) as i32,
                },
                index: at,
            });
            at = from;
        }
        steps.reverse();
        steps
    }
}

/// Enumerates shortest paths from `head` to every reachable traversable cell
pub fn enumerate(grid: &Grid, head: &Coord) -> PathBuckets {
    enumerate_until(grid, head, None)
}

/// Like [`enumerate`], but stops expanding once `deadline` has passed
///
/// Runs in O(width * height): each cell is queued once and a discovery only
/// records its parent, depth and first move.
pub fn enumerate_until(grid: &Grid, head: &Coord, deadline: Option<Instant>) -> PathBuckets {
    let mut buckets = PathBuckets {
        complete: true,
        width: grid.width(),
        ..PathBuckets::default()
    };

    let head = match grid.index_of(head) {
        Some(i) => i,
        None => return buckets,
    };
    buckets.head = Some(head);
    buckets.parent = vec![None; grid.len()];
    buckets.depth = vec![0; grid.len()];

    let mut first_move: Vec<Option<Direction>> = vec![None; grid.len()];
    let mut visited = vec![false; grid.len()];
    let mut queue = VecDeque::new();
    visited[head] = true;
    queue.push_back(head);

    let mut expanded = 0;
    while let Some(index) = queue.pop_front() {
        expanded += 1;
        if expanded % DEADLINE_CHECK_INTERVAL == 0 {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    buckets.complete = false;
                    break;
                }
            }
        }

        for &dir in Direction::all().iter() {
            let next = match grid.neighbor(index, dir) {
                Some(n) => n,
                None => continue,
            };
            if visited[next] || !grid.cell(next).is_traversable() {
                continue;
            }
            visited[next] = true;
            queue.push_back(next);

            let first = first_move[index].unwrap_or(dir);
            let length = buckets.depth[index] + 1;
            first_move[next] = Some(first);
            buckets.parent[next] = Some((index, dir));
            buckets.depth[next] = length;
            buckets.order.push(next);
            buckets.visited += 1;

            if let Some(target) = Target::classify(grid.cell(next)) {
                let path = Path {
                    first,
                    target: grid.coord_of(next),
                    index: next,
                    length,
                };
                buckets.push(target, path);
            }
        }
    }

    buckets
}
