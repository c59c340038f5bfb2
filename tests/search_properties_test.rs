//! Randomized property checks for the board analyses
//!
//! Small boards are generated from a fixed seed so failures reproduce. Each
//! analysis is compared against a straightforward reference computed here.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet, VecDeque};

use pathrace_snake::engine::{decide, MoveSource};
use pathrace_snake::grid::{Cell, Grid};
use pathrace_snake::paths;
use pathrace_snake::regions::{self, Regions};
use pathrace_snake::selector;
use pathrace_snake::threat::DistanceField;
use pathrace_snake::types::{Battlesnake, Board, Coord, Direction};

const ROUNDS: u64 = 300;

/// Random walk of up to `length` cells that avoids `taken`
fn random_snake(
    rng: &mut StdRng,
    id: &str,
    width: i32,
    height: i32,
    length: usize,
    taken: &mut HashSet<Coord>,
) -> Option<Battlesnake> {
    let free: Vec<Coord> = (0..width)
        .flat_map(|x| (0..height).map(move |y| Coord::new(x, y)))
        .filter(|c| !taken.contains(c))
        .collect();
    if free.is_empty() {
        return None;
    }

    let mut body = vec![free[rng.random_range(0..free.len())]];
    taken.insert(body[0]);
    while body.len() < length {
        let last = body[body.len() - 1];
        let options: Vec<Coord> = Direction::all()
            .iter()
            .map(|d| d.apply(&last))
            .filter(|c| c.x >= 0 && c.x < width && c.y >= 0 && c.y < height)
            .filter(|c| !taken.contains(c))
            .collect();
        if options.is_empty() {
            break;
        }
        let next = options[rng.random_range(0..options.len())];
        taken.insert(next);
        body.push(next);
    }

    Some(Battlesnake::new(id, body))
}

fn random_board(seed: u64) -> (Board, Battlesnake) {
    let mut rng = StdRng::seed_from_u64(seed);
    let width = rng.random_range(3..=7);
    let height = rng.random_range(3..=7);
    let mut taken = HashSet::new();

    let you_length = rng.random_range(1..=6);
    let you = random_snake(&mut rng, "me", width, height, you_length, &mut taken)
        .expect("empty board has room for our snake");

    let mut snakes = vec![you.clone()];
    for i in 0..rng.random_range(0..=2) {
        let length = rng.random_range(1..=5);
        if let Some(enemy) = random_snake(&mut rng, &format!("enemy-{}", i), width, height, length, &mut taken) {
            snakes.push(enemy);
        }
    }

    let mut food = Vec::new();
    for x in 0..width {
        for y in 0..height {
            let cell = Coord::new(x, y);
            if !taken.contains(&cell) && rng.random_bool(0.15) {
                food.push(cell);
            }
        }
    }

    let board = Board {
        width,
        height,
        food,
        snakes,
        hazards: vec![],
    };
    (board, you)
}

/// Plain BFS distances from `head` over traversable cells
fn reference_distances(grid: &Grid, head: Coord) -> HashMap<Coord, usize> {
    let mut dist = HashMap::new();
    let mut queue = VecDeque::new();
    queue.push_back((head, 0));
    let mut seen = HashSet::new();
    seen.insert(head);

    while let Some((at, d)) = queue.pop_front() {
        for dir in Direction::all().iter() {
            let next = dir.apply(&at);
            if seen.contains(&next) {
                continue;
            }
            match grid.get(&next) {
                Some(cell) if cell.is_traversable() => {
                    seen.insert(next);
                    dist.insert(next, d + 1);
                    queue.push_back((next, d + 1));
                }
                _ => {}
            }
        }
    }
    dist
}

#[test]
fn test_grid_assigns_occupied_state_to_every_segment() {
    for seed in 0..ROUNDS {
        let (board, you) = random_board(seed);
        let grid = Grid::build(&board, &you);

        assert_eq!(grid.len(), (board.width * board.height) as usize);
        for snake in &board.snakes {
            for segment in &snake.body {
                let cell = grid.get(segment).unwrap();
                assert!(cell.is_occupied(), "seed {}: {:?} at {:?}", seed, cell, segment);
            }
        }
        for food in &board.food {
            assert_eq!(grid.get(food), Some(Cell::Food), "seed {}", seed);
        }
    }
}

#[test]
fn test_partition_matches_traversable_set() {
    for seed in 0..ROUNDS {
        let (board, you) = random_board(seed);
        let mut grid = Grid::build(&board, &you);

        let traversable: HashSet<usize> = (0..grid.len())
            .filter(|&i| grid.cell(i).is_traversable())
            .collect();
        let partition = Regions::partition(&grid);

        let mut union = HashSet::new();
        for component in &partition.components {
            for &i in component {
                assert!(union.insert(i), "seed {}: components overlap", seed);
            }
        }
        assert_eq!(union, traversable, "seed {}", seed);

        let length = you.body.len();
        regions::mark_dead_ends(&mut grid, length);
        for component in &partition.components {
            for &i in component {
                match grid.cell(i) {
                    Cell::DeadEnd { size } => {
                        assert_eq!(size, component.len());
                        assert!(size < length, "seed {}", seed);
                    }
                    cell => {
                        assert!(cell.is_traversable());
                        assert!(component.len() >= length, "seed {}", seed);
                    }
                }
            }
        }
    }
}

#[test]
fn test_paths_are_shortest_and_cover_reachable_cells() {
    for seed in 0..ROUNDS {
        let (board, you) = random_board(seed);
        let mut grid = Grid::build(&board, &you);
        regions::mark_dead_ends(&mut grid, you.body.len());
        let head = you.head().unwrap();

        let buckets = paths::enumerate(&grid, &head);
        let expected = reference_distances(&grid, head);

        let mut found = HashSet::new();
        for (cells, kind) in [
            (&buckets.food, Cell::Food),
            (&buckets.tail, Cell::SafeTail),
            (&buckets.empty, Cell::Empty),
        ]
        .iter()
        {
            for path in cells.iter() {
                let target = path.target;
                assert!(found.insert(target), "seed {}: {:?} found twice", seed, target);
                assert_eq!(grid.get(&target), Some(*kind), "seed {}", seed);
                assert_eq!(Some(&path.len()), expected.get(&target), "seed {}", seed);

                let steps = buckets.steps(path);
                assert_eq!(steps.len(), path.len());
                assert_eq!(steps.first().map(|s| s.direction), Some(path.first));
                let mut at = head;
                for step in &steps {
                    at = step.direction.apply(&at);
                    assert_eq!(at, step.coord);
                    assert!(grid.cell(step.index).is_traversable());
                }
            }
        }

        let reachable: HashSet<Coord> = expected.keys().copied().collect();
        assert_eq!(found, reachable, "seed {}", seed);
        assert_eq!(buckets.visited, reachable.len());
    }
}

#[test]
fn test_good_path_definition_holds_for_random_fields() {
    let mut rng = StdRng::seed_from_u64(99);
    for seed in 0..ROUNDS {
        let (board, you) = random_board(seed);
        let mut grid = Grid::build(&board, &you);
        regions::mark_dead_ends(&mut grid, you.body.len());
        let buckets = paths::enumerate(&grid, &you.head().unwrap());

        let sentinel = grid.width() + grid.height();
        let values: Vec<usize> = (0..grid.len()).map(|_| rng.random_range(0..sentinel + 2)).collect();
        let field = DistanceField::from_values(grid.width(), values.clone());
        let safe = selector::safe_cells(&buckets, &field);

        for path in buckets.food.iter().chain(buckets.tail.iter()).chain(buckets.empty.iter()) {
            let expected = buckets
                .steps(path)
                .iter()
                .enumerate()
                .all(|(i, step)| values[step.index] >= sentinel || values[step.index] > i + 1);
            assert_eq!(selector::is_good_path(&buckets, path, &field), expected, "seed {}", seed);
            assert_eq!(safe[path.index], expected, "seed {}", seed);
        }
    }
}

#[test]
fn test_every_path_is_good_without_enemies() {
    for seed in 0..ROUNDS {
        let (board, you) = random_board(seed);
        let lone = Board {
            snakes: vec![you.clone()],
            ..board
        };
        let mut grid = Grid::build(&lone, &you);
        regions::mark_dead_ends(&mut grid, you.body.len());
        let buckets = paths::enumerate(&grid, &you.head().unwrap());
        let field = DistanceField::for_enemies(&grid, &lone.snakes, &you);

        let safe = selector::safe_cells(&buckets, &field);
        assert!(buckets.discovery_order().iter().all(|&i| safe[i]), "seed {}", seed);
    }
}

#[test]
fn test_chosen_move_never_enters_an_occupied_cell_when_a_path_exists() {
    for seed in 0..ROUNDS {
        let (board, you) = random_board(seed);
        let decision = decide(&board, &you, None);

        let mut grid = Grid::build(&board, &you);
        regions::mark_dead_ends(&mut grid, you.body.len());
        let next = decision.direction.apply(&you.head().unwrap());

        if decision.source != MoveSource::Fallback {
            let cell = grid.get(&next).expect("path moves stay on the board");
            assert!(cell.is_traversable(), "seed {}: stepped onto {:?}", seed, cell);
        } else if let Some(cell) = grid.get(&next) {
            let any_free = Direction::all()
                .iter()
                .filter_map(|d| grid.get(&d.apply(&you.head().unwrap())))
                .any(|c| !c.is_occupied());
            if any_free {
                assert!(!cell.is_occupied(), "seed {}: fallback hit {:?}", seed, cell);
            }
        }
    }
}
