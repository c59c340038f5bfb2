// Configuration module for reading Snake.toml
// Holds the timing budget, the snake's appearance, and debug log settings

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Everything read from Snake.toml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub timing: TimingConfig,
    pub appearance: AppearanceConfig,
    pub debug: DebugConfig,
}

/// Per-turn time budget. The engine gets `response_time_budget_ms - network_overhead_ms`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
    pub polling_interval_ms: u64,
}

impl TimingConfig {
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// Appearance reported on GET / and POST /start
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppearanceConfig {
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
}

/// JSONL decision log, read back by the replay tool
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    pub fn parse(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("invalid config: {}", e))
    }

    /// Reads and parses a Snake.toml file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        Self::parse(&contents)
    }

    /// Snake.toml from the working directory
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Built-in values, kept identical to the shipped Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 500,
                network_overhead_ms: 100,
                polling_interval_ms: 5,
            },
            appearance: AppearanceConfig {
                author: "pathrace".to_string(),
                color: "#3E338F".to_string(),
                head: "default".to_string(),
                tail: "default".to_string(),
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "pathrace_debug.jsonl".to_string(),
            },
        }
    }

    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("{}; falling back to built-in config", e);
            Self::default_hardcoded()
        })
    }
}
