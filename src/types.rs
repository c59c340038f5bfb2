// Battlesnake API Types
// See https://docs.battlesnake.com/api
//
// Coordinates follow the original Battlesnake convention used by this snake:
// y = 0 is the top row, so "up" decreases y.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Game metadata including ID, ruleset, and timeout
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Game {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub ruleset: HashMap<String, Value>,
    #[serde(default)]
    pub timeout: u32,
}

/// Board state including dimensions, food, and snakes
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Board {
    pub height: i32,
    pub width: i32,
    #[serde(default)]
    pub food: Vec<Coord>,
    #[serde(default)]
    pub snakes: Vec<Battlesnake>,
    #[serde(default)]
    pub hazards: Vec<Coord>,
}

impl Board {
    /// Returns true if the coordinate lies on the board
    pub fn contains(&self, coord: &Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }
}

/// Snake representation. Only `id` and `body` drive decisions; the rest is
/// carried through for logging.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Battlesnake {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub health: i32,
    #[serde(default)]
    pub body: Vec<Coord>,
    #[serde(default)]
    pub head: Option<Coord>,
    #[serde(default)]
    pub length: i32,
    #[serde(default)]
    pub latency: String,
    #[serde(default)]
    pub shout: Option<String>,
}

impl Battlesnake {
    /// Builds a snake from an id and a head-first body
    pub fn new(id: &str, body: Vec<Coord>) -> Self {
        Battlesnake {
            id: id.to_string(),
            name: id.to_string(),
            health: 100,
            head: body.first().copied(),
            length: body.len() as i32,
            body,
            latency: "0".to_string(),
            shout: None,
        }
    }

    pub fn head(&self) -> Option<Coord> {
        self.body.first().copied()
    }

    pub fn tail(&self) -> Option<Coord> {
        self.body.last().copied()
    }
}

/// 2D coordinate on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Calculates Manhattan distance between two coordinates
    pub fn manhattan(&self, other: &Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Represents the four possible movement directions for a Battlesnake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all directions in the fixed expansion order used by every search
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Converts direction to string representation for API response
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parses a direction name, ignoring case
    pub fn parse(s: &str) -> Result<Direction, String> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Up => Coord { x: coord.x, y: coord.y - 1 },
            Direction::Down => Coord { x: coord.x, y: coord.y + 1 },
            Direction::Left => Coord { x: coord.x - 1, y: coord.y },
            Direction::Right => Coord { x: coord.x + 1, y: coord.y },
        }
    }
}

/// Complete game state received from the API
#[derive(Deserialize, Serialize, Debug)]
pub struct GameState {
    #[serde(default)]
    pub game: Game,
    #[serde(default)]
    pub turn: i32,
    pub board: Board,
    pub you: Battlesnake,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_moves_towards_top_row() {
        let c = Coord::new(2, 2);
        assert_eq!(Direction::Up.apply(&c), Coord::new(2, 1));
        assert_eq!(Direction::Down.apply(&c), Coord::new(2, 3));
        assert_eq!(Direction::Left.apply(&c), Coord::new(1, 2));
        assert_eq!(Direction::Right.apply(&c), Coord::new(3, 2));
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(Direction::parse("up").unwrap(), Direction::Up);
        assert_eq!(Direction::parse("Down").unwrap(), Direction::Down);
        assert_eq!(Direction::parse("LEFT").unwrap(), Direction::Left);
        assert_eq!(Direction::parse("right").unwrap(), Direction::Right);
        assert!(Direction::parse("sideways").is_err());
    }

    #[test]
    fn test_game_state_accepts_minimal_payload() {
        let raw = r#"{
            "board": {
                "height": 4,
                "width": 4,
                "food": [{"x": 3, "y": 0}],
                "snakes": [{"id": "me", "body": [{"x": 0, "y": 0}, {"x": 0, "y": 1}]}]
            },
            "you": {"id": "me", "body": [{"x": 0, "y": 0}, {"x": 0, "y": 1}]}
        }"#;

        let state: GameState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.turn, 0);
        assert_eq!(state.board.food, vec![Coord::new(3, 0)]);
        assert_eq!(state.you.head(), Some(Coord::new(0, 0)));
        assert_eq!(state.you.tail(), Some(Coord::new(0, 1)));
    }

    #[test]
    fn test_board_contains() {
        let board = Board {
            height: 4,
            width: 3,
            food: vec![],
            snakes: vec![],
            hazards: vec![],
        };
        assert!(board.contains(&Coord::new(2, 3)));
        assert!(!board.contains(&Coord::new(3, 0)));
        assert!(!board.contains(&Coord::new(0, -1)));
    }
}
