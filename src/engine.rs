// Per-turn decision pipeline
//
// grid -> {threat field, dead-end marking} -> BFS paths -> evaluation -> move.
// Everything is rebuilt from the snapshot on every call; nothing is cached
// between turns, so concurrent games can call in from any thread.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::time::Instant;

use crate::grid::Grid;
use crate::paths::{self, Target};
use crate::regions;
use crate::selector;
use crate::threat::DistanceField;
use crate::types::{Battlesnake, Board, Coord, Direction};

/// Largest board, in cells, the pipeline will allocate for. Anything bigger is
/// answered from the head's neighbors alone.
pub const MAX_BOARD_CELLS: usize = 1 << 16;

/// Which stage of the pipeline produced the move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveSource {
    Food,
    Tail,
    Empty,
    Fallback,
}

impl From<Target> for MoveSource {
    fn from(target: Target) -> Self {
        match target {
            Target::Food => MoveSource::Food,
            Target::Tail => MoveSource::Tail,
            Target::Empty => MoveSource::Empty,
        }
    }
}

impl MoveSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveSource::Food => "food",
            MoveSource::Tail => "tail",
            MoveSource::Empty => "empty",
            MoveSource::Fallback => "fallback",
        }
    }
}

/// Outcome of one turn's analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub direction: Direction,
    pub source: MoveSource,
    /// Length of the chosen path, zero for fallback moves
    pub path_length: usize,
    pub food_paths: usize,
    pub tail_paths: usize,
    pub empty_paths: usize,
    pub dead_end_cells: usize,
    /// True when the deadline expired before the pipeline finished
    pub timed_out: bool,
}

impl Decision {
    /// Decision that did not come from a path
    pub fn fallback(direction: Direction, timed_out: bool) -> Self {
        Decision {
            direction,
            source: MoveSource::Fallback,
            path_length: 0,
            food_paths: 0,
            tail_paths: 0,
            empty_paths: 0,
            dead_end_cells: 0,
            timed_out,
        }
    }
}

/// Chooses a move for `you` on `board`
pub fn decide_move(board: &Board, you: &Battlesnake) -> Direction {
    decide(board, you, None).direction
}

/// Whether the board is small enough to build a grid for
pub fn board_fits(board: &Board) -> bool {
    let width = usize::try_from(board.width).ok();
    let height = usize::try_from(board.height).ok();
    match (width, height) {
        (Some(w), Some(h)) => w.checked_mul(h).map_or(false, |cells| cells <= MAX_BOARD_CELLS),
        _ => false,
    }
}

/// First neighbor of the head that is on the board and free of snake bodies,
/// or the first on-board neighbor when none is free
///
/// Needs no grid, so it works on boards of any size.
pub fn safe_neighbor(board: &Board, you: &Battlesnake) -> Direction {
    let head = match you.head() {
        Some(head) => head,
        None => return Direction::Up,
    };

    let on_board: Vec<Direction> = Direction::all()
        .iter()
        .copied()
        .filter(|dir| board.contains(&dir.apply(&head)))
        .collect();

    on_board
        .iter()
        .copied()
        .find(|dir| !is_collision(&dir.apply(&head), board))
        .or_else(|| on_board.first().copied())
        .unwrap_or(Direction::Up)
}

fn is_collision(coord: &Coord, board: &Board) -> bool {
    board.snakes.iter().any(|snake| snake.body.contains(coord))
}

/// Runs the full pipeline, skipping to the neighbor fallback once `deadline` passes
pub fn decide(board: &Board, you: &Battlesnake, deadline: Option<Instant>) -> Decision {
    let head = match you.head() {
        Some(head) => head,
        None => {
            warn!("Snake '{}' has no body, defaulting to up", you.id);
            return Decision::fallback(Direction::Up, false);
        }
    };

    if !board_fits(board) {
        warn!(
            "Board {}x{} exceeds {} cells, answering from neighbors only",
            board.width, board.height, MAX_BOARD_CELLS
        );
        return Decision::fallback(safe_neighbor(board, you), false);
    }

    let expired = || deadline.map_or(false, |d| Instant::now() >= d);

    let mut grid = Grid::build(board, you);
    let field = DistanceField::for_enemies(&grid, &board.snakes, you);

    if expired() {
        warn!("Deadline passed after building grid, using fallback");
        return Decision::fallback(selector::fallback_move(&grid, &head), true);
    }

    let regions = regions::mark_dead_ends(&mut grid, you.body.len());
    let dead_end_cells: usize = regions
        .dead_ends(you.body.len())
        .map(|component| component.len())
        .sum();

    debug!("Board after dead-end marking:\n{}", grid);

    if expired() {
        warn!("Deadline passed after dead-end marking, using fallback");
        let mut decision = Decision::fallback(selector::fallback_move(&grid, &head), true);
        decision.dead_end_cells = dead_end_cells;
        return decision;
    }

    let buckets = paths::enumerate_until(&grid, &head, deadline);
    debug!(
        "Paths: food={}, tail={}, empty={}, visited={}, dead-end cells={}",
        buckets.food.len(),
        buckets.tail.len(),
        buckets.empty.len(),
        buckets.visited,
        dead_end_cells
    );
    if !buckets.complete {
        warn!("Deadline passed during path search after {} cells", buckets.visited);
    }

    let (direction, source, path_length) = match selector::select_path(&buckets, &field) {
        Some((target, path)) => (path.first, MoveSource::from(target), path.len()),
        None => (selector::fallback_move(&grid, &head), MoveSource::Fallback, 0),
    };

    Decision {
        direction,
        source,
        path_length,
        food_paths: buckets.food.len(),
        tail_paths: buckets.tail.len(),
        empty_paths: buckets.empty.len(),
        dead_end_cells,
        timed_out: !buckets.complete,
    }
}
