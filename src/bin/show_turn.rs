// Prints the full analysis of one logged turn: the board after dead-end
// marking, the threat distances around our head, and the best path of
// each bucket.
//
// Usage:
//   cargo run --bin show_turn -- <log_file> <turn_number>

use std::process;

use pathrace_snake::engine;
use pathrace_snake::grid::Grid;
use pathrace_snake::paths::{self, Target};
use pathrace_snake::regions;
use pathrace_snake::replay;
use pathrace_snake::selector::{self, TARGET_PRIORITY};
use pathrace_snake::threat::DistanceField;
use pathrace_snake::types::Direction;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: show_turn <log_file.jsonl> <turn_number>");
        process::exit(1);
    }

    let target_turn: i32 = match args[2].parse() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Invalid turn number '{}': {}", args[2], e);
            process::exit(1);
        }
    };

    let entries = match replay::read_log(&args[1]) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    let entry = match entries.iter().find(|e| e.turn == target_turn) {
        Some(entry) => entry,
        None => {
            eprintln!("Turn {} not found in log file", target_turn);
            process::exit(1);
        }
    };

    let you = match entry.snake() {
        Ok(you) => you,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    let head = match you.head() {
        Some(head) => head,
        None => {
            eprintln!("Our snake has no body on turn {}", target_turn);
            process::exit(1);
        }
    };

    println!("═══════════════════════════════════════════════════════════");
    println!("              TURN {} DETAILS", entry.turn);
    println!("═══════════════════════════════════════════════════════════\n");
    println!("Our snake: {} (length {}) head at {:?}", you.id, you.body.len(), head);
    match entry.source {
        Some(source) => println!("Logged move: {} (source: {})", entry.chosen_move, source.as_str()),
        None => println!("Logged move: {}", entry.chosen_move),
    }

    if !engine::board_fits(&entry.board) {
        eprintln!(
            "Board {}x{} is too large to analyse",
            entry.board.width, entry.board.height
        );
        process::exit(1);
    }

    let mut grid = Grid::build(&entry.board, you);
    let field = DistanceField::for_enemies(&grid, &entry.board.snakes, you);
    let regions = regions::mark_dead_ends(&mut grid, you.body.len());

    println!("\nRegions: {}", regions.components.len());
    for component in regions.dead_ends(you.body.len()) {
        println!("  dead end of {} cells at {:?}", component.len(), grid.coord_of(component[0]));
    }
    println!("\n{}", grid);

    println!("Threat distance around head:");
    for &dir in Direction::all().iter() {
        let next = dir.apply(&head);
        match field.get(&next) {
            Some(d) => println!("  {:<5} {:?} -> {}", dir.as_str(), next, d),
            None => println!("  {:<5} off board", dir.as_str()),
        }
    }

    let buckets = paths::enumerate(&grid, &head);
    let safe = selector::safe_cells(&buckets, &field);
    println!("\nPaths (visited {} cells):", buckets.visited);
    for &target in TARGET_PRIORITY.iter() {
        let bucket = buckets.bucket(target);
        let good = bucket.iter().filter(|p| safe[p.index]).count();
        print!("  {:<5} {} found, {} good", target.as_str(), bucket.len(), good);
        match selector::shortest_good_path(bucket, &safe) {
            Some(path) => {
                let route: Vec<&str> = buckets.steps(path).iter().map(|s| s.direction.as_str()).collect();
                println!(
                    ", best: {:?} in {} steps [{}]",
                    path.target,
                    path.len(),
                    route.join(" ")
                );
            }
            None => println!(),
        }
    }
    if buckets.bucket(Target::Food).is_empty() {
        println!("  no food reachable");
    }

    let decision = engine::decide(&entry.board, you, None);
    println!(
        "\nReplayed decision: {} (source: {})",
        decision.direction.as_str(),
        decision.source.as_str()
    );
}
