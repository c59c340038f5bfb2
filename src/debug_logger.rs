// Debug logging module for asynchronous decision logging
//
// This module provides fire-and-forget async logging to avoid blocking
// the main request/response cycle. Each turn's board and decision is written
// as one line of a JSONL file that the replay tool can read back.

use log::error;
use serde::Serialize;
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::engine::{Decision, MoveSource};
use crate::types::Board;

/// Represents a single debug log entry
#[derive(Debug, Serialize)]
struct DebugLogEntry {
    turn: i32,
    you_id: String,
    chosen_move: String,
    source: MoveSource,
    path_length: usize,
    timed_out: bool,
    board: Board,
    timestamp: String,
}

/// Shared debug logger state
/// Uses Arc<Mutex<File>> to allow concurrent async writes from multiple tasks
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return DebugLogger::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                DebugLogger::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs a move decision asynchronously (fire-and-forget)
    /// This spawns a tokio task that writes to the file without blocking
    pub fn log_move(&self, turn: i32, you_id: &str, board: Board, decision: &Decision) {
        if !self.enabled {
            return;
        }

        let entry = DebugLogEntry {
            turn,
            you_id: you_id.to_string(),
            chosen_move: decision.direction.as_str().to_string(),
            source: decision.source,
            path_length: decision.path_length,
            timed_out: decision.timed_out,
            board,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        let file_handle = self.file.clone();

        tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    /// Internal async function that performs the actual file write
    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: DebugLogEntry) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write debug log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush debug log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize debug log entry: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::LogEntry;
    use crate::types::{Battlesnake, Coord, Direction};

    #[tokio::test]
    async fn test_logged_entry_reads_back_as_replay_entry() {
        let path = std::env::temp_dir().join(format!("pathrace_log_{}.jsonl", std::process::id()));
        let path_str = path.to_string_lossy().to_string();
        let logger = DebugLogger::new(true, &path_str).await;
        assert!(logger.is_enabled());

        let you = Battlesnake::new("me", vec![Coord::new(0, 0), Coord::new(0, 1)]);
        let board = Board {
            width: 4,
            height: 4,
            food: vec![Coord::new(3, 0)],
            snakes: vec![you.clone()],
            hazards: vec![],
        };
        let decision = crate::engine::decide(&board, &you, None);

        // Write directly so the test does not race the spawned task
        let entry = DebugLogEntry {
            turn: 7,
            you_id: you.id.clone(),
            chosen_move: decision.direction.as_str().to_string(),
            source: decision.source,
            path_length: decision.path_length,
            timed_out: decision.timed_out,
            board,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        DebugLogger::write_entry(logger.file.clone(), entry).await;

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: LogEntry = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
        assert_eq!(parsed.turn, 7);
        assert_eq!(parsed.you_id.as_deref(), Some("me"));
        assert_eq!(Direction::parse(&parsed.chosen_move).unwrap(), Direction::Right);
        assert_eq!(parsed.source, Some(MoveSource::Food));
        assert_eq!(parsed.path_length, Some(3));
        assert!(!parsed.timed_out);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_disabled_logger_is_noop() {
        let logger = DebugLogger::disabled();
        assert!(!logger.is_enabled());
    }
}
