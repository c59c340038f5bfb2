// Library exports for the path-racing Battlesnake
// The server binary and the replay tool both build on these modules

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod engine;
pub mod grid;
pub mod paths;
pub mod regions;
pub mod replay;
pub mod selector;
pub mod threat;
pub mod types;

pub use engine::{decide, decide_move, Decision, MoveSource};
