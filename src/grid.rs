// Typed board model rebuilt from scratch every turn
//
// Cells live in a flat row-major arena (index = y * width + x). Every search in
// the crate addresses cells by that index and walks neighbors in the fixed
// order up, down, left, right.

use std::fmt;

use crate::types::{Battlesnake, Board, Coord, Direction};

/// State of a single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Food,
    SelfBody,
    /// Segment of an enemy snake; `index` is the enemy's position in the board
    /// roster with our own snake skipped
    EnemyBody { index: usize },
    /// Last segment of an enemy. Unlike our own tail it is never assumed to move away.
    EnemyTail,
    /// Empty neighbor of our own tail, free once the tail advances
    SafeTail,
    /// Traversable cell inside a region too small to hold our body
    DeadEnd { size: usize },
}

impl Cell {
    /// Cells the path search may step into
    pub fn is_traversable(&self) -> bool {
        matches!(self, Cell::Empty | Cell::Food | Cell::SafeTail)
    }

    /// Cells holding a snake segment
    pub fn is_occupied(&self) -> bool {
        matches!(
            self,
            Cell::SelfBody | Cell::EnemyBody { .. } | Cell::EnemyTail
        )
    }

    /// Rank used by the last-resort move choice. Larger is preferred.
    ///
    /// Occupied cells rank below every free cell. Among free cells, dead-end
    /// pockets rank by size above tail, food and plain empty cells: when no
    /// race-safe path exists, a known pocket is favored over open ground an
    /// enemy can reach first.
    pub fn openness(&self) -> Option<usize> {
        match self {
            Cell::Empty => Some(0),
            Cell::Food => Some(1),
            Cell::SafeTail => Some(2),
            Cell::DeadEnd { size } => Some(3 + size),
            Cell::SelfBody | Cell::EnemyBody { .. } | Cell::EnemyTail => None,
        }
    }

    fn glyph(&self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Food => '*',
            Cell::SelfBody => 'Y',
            Cell::EnemyBody { index } => std::char::from_digit((*index % 10) as u32, 10).unwrap_or('E'),
            Cell::EnemyTail => 't',
            Cell::SafeTail => 's',
            Cell::DeadEnd { .. } => 'x',
        }
    }
}

/// Board of typed cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an all-empty grid. Non-positive dimensions produce an empty grid.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0) as usize;
        let height = height.max(0) as usize;
        Grid {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Builds the grid for one turn from the board and our own snake
    ///
    /// Marks are applied in priority order, later marks overwriting earlier ones:
    /// food, enemy bodies with their tails, our own body, then the empty
    /// neighbors of our tail.
    pub fn build(board: &Board, you: &Battlesnake) -> Self {
        let mut grid = Grid::new(board.width, board.height);

        for food in &board.food {
            grid.mark(food, Cell::Food);
        }

        let enemies = board
            .snakes
            .iter()
            .filter(|s| s.id != you.id)
            .enumerate();
        for (index, enemy) in enemies {
            for segment in &enemy.body {
                grid.mark(segment, Cell::EnemyBody { index });
            }
            if let Some(tail) = enemy.tail() {
                grid.mark(&tail, Cell::EnemyTail);
            }
        }

        for segment in &you.body {
            grid.mark(segment, Cell::SelfBody);
        }

        if let Some(tail) = you.tail().and_then(|t| grid.index_of(&t)) {
            for &dir in Direction::all().iter() {
                if let Some(n) = grid.neighbor(tail, dir) {
                    if grid.cells[n] == Cell::Empty {
                        grid.cells[n] = Cell::SafeTail;
                    }
                }
            }
        }

        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Flat index of an in-bounds coordinate
    pub fn index_of(&self, coord: &Coord) -> Option<usize> {
        if coord.x < 0 || coord.y < 0 {
            return None;
        }
        let (x, y) = (coord.x as usize, coord.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn coord_of(&self, index: usize) -> Coord {
        Coord {
            x: (index % self.width) as i32,
            y: (index / self.width) as i32,
        }
    }

    pub fn get(&self, coord: &Coord) -> Option<Cell> {
        self.index_of(coord).map(|i| self.cells[i])
    }

    pub fn cell(&self, index: usize) -> Cell {
        self.cells[index]
    }

    pub fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    /// Index of the neighbor in `dir`, or None at the board edge
    pub fn neighbor(&self, index: usize, dir: Direction) -> Option<usize> {
        let x = index % self.width;
        let y = index / self.width;
        match dir {
            Direction::Up if y > 0 => Some(index - self.width),
            Direction::Down if y + 1 < self.height => Some(index + self.width),
            Direction::Left if x > 0 => Some(index - 1),
            Direction::Right if x + 1 < self.width => Some(index + 1),
            _ => None,
        }
    }

    fn mark(&mut self, coord: &Coord, cell: Cell) {
        if let Some(i) = self.index_of(coord) {
            self.cells[i] = cell;
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = format!("{}+", "+---".repeat(self.width));
        writeln!(f, "{}", rule)?;
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                write!(f, "| {} ", cell.glyph())?;
            }
            writeln!(f, "|")?;
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}
