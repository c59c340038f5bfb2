// Welcome to
// __________         __    __  .__                               __
// \______   \_____ _/  |__/  |_|  |   ____   ______ ____ _____  |  | __ ____
//  |    |  _/\__  \\   __\   __\  | _/ __ \ /  ___//    \\__  \ |  |/ // __ \
//  |    |   \ / __ \|  |  |  | |  |_\  ___/ \___ \|   |  \/ __ \|    <\  ___/
//  |________/(______/__|  |__| |____/\_____>______>___|__(______/__|__\\_____>
//
// Endpoint logic for the path-racing snake. The move decision itself lives in
// `engine`; this file manages the time budget around it.

use log::info;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::engine::{self, Decision};
use crate::types::{Battlesnake, Board, Direction, Game};

/// Lock-free shared state between the async poller and the blocking decision task
#[derive(Debug)]
pub(crate) struct SharedDecision {
    /// Move to answer with, encoded as direction index. Seeded with a safe
    /// neighbor so a timeout still returns something sensible.
    best_move: AtomicU8,
    /// Flag indicating the pipeline finished
    complete: AtomicBool,
    /// Full decision once available, for logging
    decision: Mutex<Option<Decision>>,
}

impl SharedDecision {
    fn new(seed: Direction) -> Self {
        SharedDecision {
            best_move: AtomicU8::new(direction_to_index(seed)),
            complete: AtomicBool::new(false),
            decision: Mutex::new(None),
        }
    }

    fn publish(&self, decision: Decision) {
        self.best_move
            .store(direction_to_index(decision.direction), Ordering::Release);
        *self.decision.lock() = Some(decision);
        self.complete.store(true, Ordering::Release);
    }

    fn best_move(&self) -> Direction {
        index_to_direction(self.best_move.load(Ordering::Acquire))
    }

    fn is_complete(&self) -> bool {
        self.complete.load(Ordering::Acquire)
    }
}

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration and no decision log
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot {
            config,
            logger: DebugLogger::disabled(),
        }
    }

    /// Creates a Bot that records every decision through `logger`
    pub fn with_logger(config: Config, logger: DebugLogger) -> Self {
        Bot { config, logger }
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        let appearance = &self.config.appearance;
        json!({
            "apiversion": "1",
            "author": appearance.author,
            "color": appearance.color,
            "head": appearance.head,
            "tail": appearance.tail,
        })
    }

    /// Called when a game starts; answers with our color
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &i32, board: &Board, _you: &Battlesnake) -> Value {
        info!(
            "GAME START {} ({}x{}, {} snakes)",
            game.id,
            board.width,
            board.height,
            board.snakes.len()
        );

        json!({ "color": self.config.appearance.color })
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME OVER {} after {} turns", game.id, turn);
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// The decision pipeline runs on Tokio's blocking pool while this task polls
    /// for it. If the effective budget runs out first, the pre-computed safe
    /// neighbor is returned instead.
    ///
    /// # Arguments
    /// * `_game` - Current game metadata
    /// * `turn` - Current turn number
    /// * `board` - Current board state
    /// * `you` - Your snake's current state
    ///
    /// # Returns
    /// * `Value` - JSON response containing the chosen move direction
    pub async fn get_move(
        &self,
        _game: &Game,
        turn: &i32,
        board: &Board,
        you: &Battlesnake,
    ) -> Value {
        let start_time = Instant::now();
        let effective_budget = Duration::from_millis(self.config.timing.effective_budget_ms());
        let deadline = start_time + effective_budget;

        info!("Turn {}: Computing move", turn);

        let shared = Arc::new(SharedDecision::new(engine::safe_neighbor(board, you)));
        let shared_clone = shared.clone();

        let board_clone = board.clone();
        let you_clone = you.clone();

        tokio::task::spawn_blocking(move || {
            let decision = engine::decide(&board_clone, &you_clone, Some(deadline));
            shared_clone.publish(decision);
        });

        let polling_interval = Duration::from_millis(self.config.timing.polling_interval_ms);
        loop {
            if shared.is_complete() || start_time.elapsed() >= effective_budget {
                break;
            }
            tokio::time::sleep(polling_interval).await;
        }

        let chosen_move = shared.best_move();
        let elapsed = start_time.elapsed().as_millis();

        let finished = shared.decision.lock().clone();
        let decision = match finished {
            Some(decision) => {
                info!(
                    "Turn {}: Chose {} (source: {}, path length: {}, dead-end cells: {}, time: {}ms)",
                    turn,
                    chosen_move.as_str(),
                    decision.source.as_str(),
                    decision.path_length,
                    decision.dead_end_cells,
                    elapsed
                );
                decision
            }
            None => {
                log::warn!(
                    "Turn {}: Budget exhausted after {}ms, answering {}",
                    turn,
                    elapsed,
                    chosen_move.as_str()
                );
                Decision::fallback(chosen_move, true)
            }
        };
        self.logger.log_move(*turn, &you.id, board.clone(), &decision);

        json!({ "move": chosen_move.as_str() })
    }
}

/// Converts a direction to its position in the fixed direction order
fn direction_to_index(dir: Direction) -> u8 {
    Direction::all()
        .iter()
        .position(|&d| d == dir)
        .unwrap_or(0) as u8
}

/// Converts an encoded index back to a direction
fn index_to_direction(idx: u8) -> Direction {
    Direction::all()
        .get(idx as usize)
        .copied()
        .unwrap_or(Direction::Up)
}
