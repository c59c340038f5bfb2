// Re-running logged turns through the decision engine
//
// A decision log holds one JSON object per line, as written by `debug_logger`.
// Each line is a full board snapshot, so turns replay independently of each
// other and in any order.

use log::{debug, warn};
use rayon::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::engine::{self, Decision, MoveSource};
use crate::types::{Battlesnake, Board, Direction};

/// One line of a decision log
#[derive(Debug, Clone, Deserialize)]
pub struct LogEntry {
    pub turn: i32,
    /// Snake that made the move. Logs written without it refer to the first snake.
    #[serde(default)]
    pub you_id: Option<String>,
    pub chosen_move: String,
    #[serde(default)]
    pub source: Option<MoveSource>,
    #[serde(default)]
    pub path_length: Option<usize>,
    /// The server answered before the engine finished
    #[serde(default)]
    pub timed_out: bool,
    pub board: Board,
    #[serde(default)]
    pub timestamp: String,
}

impl LogEntry {
    /// The snake whose move was logged
    pub fn snake(&self) -> Result<&Battlesnake, String> {
        match &self.you_id {
            Some(id) => self
                .board
                .snakes
                .iter()
                .find(|s| &s.id == id)
                .ok_or_else(|| format!("turn {}: snake '{}' is not on the board", self.turn, id)),
            None => self
                .board
                .snakes
                .first()
                .ok_or_else(|| format!("turn {}: board has no snakes", self.turn)),
        }
    }

    pub fn logged_move(&self) -> Result<Direction, String> {
        Direction::parse(&self.chosen_move).map_err(|e| format!("turn {}: {}", self.turn, e))
    }
}

/// Reads every non-blank line of a decision log
pub fn read_log<P: AsRef<Path>>(path: P) -> Result<Vec<LogEntry>, String> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).map_err(|e| format!("line {}: {}", n + 1, e))
        })
        .collect()
}

/// Checks logged moves against `turn -> acceptable moves` expectations
pub fn check_expected(entries: &[LogEntry], expected: &[(i32, Vec<Direction>)]) -> Result<(), String> {
    for (turn, acceptable) in expected {
        let entry = entries
            .iter()
            .find(|e| e.turn == *turn)
            .ok_or_else(|| format!("turn {} is not in the log", turn))?;
        let logged = entry.logged_move()?;

        if !acceptable.contains(&logged) {
            let wanted: Vec<&str> = acceptable.iter().map(|d| d.as_str()).collect();
            return Err(format!(
                "turn {}: logged {}, expected {}",
                turn,
                logged.as_str(),
                wanted.join("|")
            ));
        }
    }
    Ok(())
}

/// A logged turn next to what the engine decides for it today
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub logged: Direction,
    pub logged_source: Option<MoveSource>,
    pub decision: Decision,
    pub elapsed: Duration,
}

impl ReplayResult {
    pub fn matches(&self) -> bool {
        self.logged == self.decision.direction
    }

    /// Same move, but reached through a different bucket than logged
    pub fn source_changed(&self) -> bool {
        self.logged_source
            .map_or(false, |source| source != self.decision.source)
    }
}

/// Totals over a set of replayed turns
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReplayStats {
    pub turns: usize,
    pub matches: usize,
    pub food: usize,
    pub tail: usize,
    pub empty: usize,
    pub fallback: usize,
    pub timed_out: usize,
    pub mean_elapsed_ms: f64,
}

impl ReplayStats {
    pub fn from_results(results: &[ReplayResult]) -> Self {
        let mut stats = ReplayStats {
            turns: results.len(),
            ..ReplayStats::default()
        };
        for result in results {
            if result.matches() {
                stats.matches += 1;
            }
            if result.decision.timed_out {
                stats.timed_out += 1;
            }
            match result.decision.source {
                MoveSource::Food => stats.food += 1,
                MoveSource::Tail => stats.tail += 1,
                MoveSource::Empty => stats.empty += 1,
                MoveSource::Fallback => stats.fallback += 1,
            }
        }
        if !results.is_empty() {
            let total: f64 = results.iter().map(|r| r.elapsed.as_secs_f64() * 1000.0).sum();
            stats.mean_elapsed_ms = total / results.len() as f64;
        }
        stats
    }

    pub fn mismatches(&self) -> usize {
        self.turns - self.matches
    }

    /// Percentage of turns whose replayed move equals the logged one
    pub fn match_rate(&self) -> f64 {
        if self.turns == 0 {
            return 0.0;
        }
        self.matches as f64 * 100.0 / self.turns as f64
    }
}

/// Replays logged boards under the configured time budget
pub struct ReplayEngine {
    budget: Duration,
    verbose: bool,
}

impl ReplayEngine {
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine {
            budget: Duration::from_millis(config.timing.effective_budget_ms()),
            verbose,
        }
    }

    /// Decides the logged board again and pairs it with the logged move
    pub fn replay(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        let you = entry.snake()?;
        let logged = entry.logged_move()?;

        let started = Instant::now();
        let decision = engine::decide(&entry.board, you, Some(started + self.budget));
        let result = ReplayResult {
            turn: entry.turn,
            logged,
            logged_source: entry.source,
            decision,
            elapsed: started.elapsed(),
        };

        if self.verbose {
            let verdict = if result.matches() { "same" } else { "DIFFERENT" };
            warn_or_debug(
                result.matches(),
                format!(
                    "turn {}: {} logged {}, replayed {} via {} ({} steps)",
                    entry.turn,
                    verdict,
                    logged.as_str(),
                    result.decision.direction.as_str(),
                    result.decision.source.as_str(),
                    result.decision.path_length
                ),
            );
        }
        Ok(result)
    }

    /// Replays every entry on the rayon pool; unreadable entries are skipped
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        entries
            .par_iter()
            .filter_map(|entry| {
                self.replay(entry)
                    .map_err(|e| warn!("Skipping turn {}: {}", entry.turn, e))
                    .ok()
            })
            .collect()
    }

    /// Replays the listed turns in the order given
    pub fn replay_selected(&self, entries: &[LogEntry], turns: &[i32]) -> Result<Vec<ReplayResult>, String> {
        turns
            .iter()
            .map(|turn| {
                let entry = entries
                    .iter()
                    .find(|e| e.turn == *turn)
                    .ok_or_else(|| format!("turn {} is not in the log", turn))?;
                self.replay(entry)
            })
            .collect()
    }

    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = ReplayStats::from_results(results);
        let rule = "─".repeat(56);

        println!("{}", rule);
        println!("Replayed turns  {}", stats.turns);
        println!("Same move       {} ({:.1}%)", stats.matches, stats.match_rate());
        println!("Different move  {}", stats.mismatches());
        println!(
            "Sources         food {} / tail {} / empty {} / fallback {}",
            stats.food, stats.tail, stats.empty, stats.fallback
        );
        println!("Timed out       {}", stats.timed_out);
        println!("Mean decide     {:.2}ms", stats.mean_elapsed_ms);
        println!("{}", rule);

        for result in results.iter().filter(|r| !r.matches() || r.source_changed()) {
            let logged_source = result.logged_source.map_or("?", |s| s.as_str());
            println!(
                "turn {:>4}  {:<5} ({:<8}) -> {:<5} ({}, {} steps)",
                result.turn,
                result.logged.as_str(),
                logged_source,
                result.decision.direction.as_str(),
                result.decision.source.as_str(),
                result.decision.path_length
            );
        }
    }
}

fn warn_or_debug(quiet: bool, message: String) {
    if quiet {
        debug!("{}", message);
    } else {
        warn!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coord;

    fn entry(turn: i32, chosen_move: &str, you_id: Option<&str>) -> LogEntry {
        let you = Battlesnake::new("me", vec![Coord::new(0, 0), Coord::new(0, 1)]);
        LogEntry {
            turn,
            you_id: you_id.map(|s| s.to_string()),
            chosen_move: chosen_move.to_string(),
            source: None,
            path_length: None,
            timed_out: false,
            board: Board {
                width: 4,
                height: 4,
                food: vec![Coord::new(3, 0)],
                snakes: vec![you],
                hazards: vec![],
            },
            timestamp: String::new(),
        }
    }

    fn replayer() -> ReplayEngine {
        ReplayEngine::new(Config::default_hardcoded(), false)
    }

    #[test]
    fn test_replay_matches_logged_food_move() {
        let result = replayer().replay(&entry(3, "right", Some("me"))).unwrap();
        assert!(result.matches());
        assert_eq!(result.decision.source, MoveSource::Food);
        assert_eq!(result.decision.path_length, 3);
        assert!(!result.source_changed());
    }

    #[test]
    fn test_entry_without_id_uses_first_snake() {
        let result = replayer().replay(&entry(3, "UP", None)).unwrap();
        assert!(!result.matches());
        assert_eq!(result.logged, Direction::Up);
        assert_eq!(result.decision.direction, Direction::Right);
    }

    #[test]
    fn test_bad_entries_are_errors() {
        assert!(replayer().replay(&entry(1, "up", Some("ghost"))).is_err());
        assert!(replayer().replay(&entry(1, "sideways", Some("me"))).is_err());
    }

    #[test]
    fn test_changed_source_is_flagged() {
        let mut logged = entry(4, "right", Some("me"));
        logged.source = Some(MoveSource::Tail);
        let result = replayer().replay(&logged).unwrap();
        assert!(result.matches());
        assert!(result.source_changed());
    }

    #[test]
    fn test_replay_all_keeps_log_order_and_skips_failures() {
        let entries = vec![
            entry(1, "right", Some("me")),
            entry(2, "bogus", Some("me")),
            entry(3, "down", Some("me")),
        ];

        let results = replayer().replay_all(&entries);

        let turns: Vec<i32> = results.iter().map(|r| r.turn).collect();
        assert_eq!(turns, vec![1, 3]);
        let stats = ReplayStats::from_results(&results);
        assert_eq!(stats.matches, 1);
        assert_eq!(stats.mismatches(), 1);
        assert_eq!(stats.match_rate(), 50.0);
        assert_eq!(stats.food, 2);
    }

    #[test]
    fn test_replay_selected_reports_missing_turn() {
        let entries = vec![entry(1, "right", Some("me"))];
        assert_eq!(replayer().replay_selected(&entries, &[1]).unwrap().len(), 1);
        assert!(replayer().replay_selected(&entries, &[1, 9]).is_err());
    }

    #[test]
    fn test_check_expected() {
        let entries = vec![entry(5, "right", None)];

        assert!(check_expected(&entries, &[(5, vec![Direction::Up, Direction::Right])]).is_ok());
        assert!(check_expected(&entries, &[(5, vec![Direction::Down])]).is_err());
        assert!(check_expected(&entries, &[(6, vec![Direction::Down])]).is_err());
    }

    #[test]
    fn test_read_log_skips_blank_lines_and_reports_bad_ones() {
        let path = std::env::temp_dir().join(format!("pathrace_read_{}.jsonl", std::process::id()));
        let line = r#"{"turn":1,"chosen_move":"up","source":"tail","board":{"width":4,"height":4,"snakes":[]}}"#;
        fs::write(&path, format!("{}\n\n{}\nnot json\n", line, line)).unwrap();

        let err = read_log(&path).unwrap_err();
        assert!(err.starts_with("line 4"), "{}", err);

        fs::write(&path, format!("{}\n\n{}\n", line, line)).unwrap();
        let entries = read_log(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].source, Some(MoveSource::Tail));
        assert!(entries[0].you_id.is_none());

        let _ = fs::remove_file(&path);
    }
}
