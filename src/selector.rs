// Path evaluation and move selection
//
// A path is good when we reach every one of its cells strictly before the
// nearest enemy head could. Buckets are tried in priority order: food, then
// our tail, then any empty cell. With no good path we fall back to the
// most open free neighbor of the head.

use crate::grid::Grid;
use crate::paths::{Path, PathBuckets, Step, Target};
use crate::threat::DistanceField;
use crate::types::{Coord, Direction};

/// Bucket priority for move selection
pub const TARGET_PRIORITY: [Target; 3] = [Target::Food, Target::Tail, Target::Empty];

/// Returns true if every step i (1-indexed) lands on a cell we reach before
/// any enemy head
pub fn is_good_route(steps: &[Step], field: &DistanceField) -> bool {
    steps
        .iter()
        .enumerate()
        .all(|(i, step)| field.outruns(step.index, i + 1))
}

/// Marks every discovered cell whose shortest path from the head is good
///
/// Walks the search tree once in discovery order, so a cell is good when its
/// parent is and the cell itself is reached first.
pub fn safe_cells(buckets: &PathBuckets, field: &DistanceField) -> Vec<bool> {
    let mut safe = vec![false; buckets.cell_count()];
    let head = match buckets.head() {
        Some(head) => head,
        None => return safe,
    };
    safe[head] = true;

    for &index in buckets.discovery_order() {
        let parent_safe = buckets.parent_of(index).map_or(false, |p| safe[p]);
        safe[index] = parent_safe && field.outruns(index, buckets.depth_of(index));
    }
    safe
}

/// Whether `path` is good, checked step by step
pub fn is_good_path(buckets: &PathBuckets, path: &Path, field: &DistanceField) -> bool {
    is_good_route(&buckets.steps(path), field)
}

/// Shortest good path of a bucket; ties go to the earliest discovered
pub fn shortest_good_path<'a>(paths: &'a [Path], safe: &[bool]) -> Option<&'a Path> {
    paths
        .iter()
        .filter(|p| !p.is_empty() && safe.get(p.index).copied().unwrap_or(false))
        .min_by_key(|p| p.len())
}

/// Picks the first bucket in priority order holding a good path
pub fn select_path<'a>(
    buckets: &'a PathBuckets,
    field: &DistanceField,
) -> Option<(Target, &'a Path)> {
    let safe = safe_cells(buckets, field);
    TARGET_PRIORITY.iter().find_map(|&target| {
        shortest_good_path(buckets.bucket(target), &safe).map(|path| (target, path))
    })
}

/// Last-resort move from the head's immediate neighbors
///
/// Prefers the free neighbor with the highest [`crate::grid::Cell::openness`],
/// keeping the earliest in up, down, left, right order on ties. When every
/// neighbor is occupied, any in-bounds neighbor is returned; `Up` when none is.
pub fn fallback_move(grid: &Grid, head: &Coord) -> Direction {
    let head = match grid.index_of(head) {
        Some(i) => i,
        None => return Direction::Up,
    };

    let mut best: Option<(usize, Direction)> = None;
    let mut in_bounds: Option<Direction> = None;

    for &dir in Direction::all().iter() {
        let next = match grid.neighbor(head, dir) {
            Some(n) => n,
            None => continue,
        };
        in_bounds.get_or_insert(dir);

        if let Some(rank) = grid.cell(next).openness() {
            match best {
                Some((best_rank, _)) if best_rank >= rank => {}
                _ => best = Some((rank, dir)),
            }
        }
    }

    best.map(|(_, dir)| dir)
        .or(in_bounds)
        .unwrap_or(Direction::Up)
}
