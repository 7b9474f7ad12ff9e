//! Square geometry: board coordinates and compass directions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Board size (rows and columns)
pub const BOARD_SIZE: u8 = 8;

/// A square on the 8x8 board.
///
/// Row 0 is rank 8 (the gold goal edge), row 7 is rank 1. Column 0 is file
/// `a`. A `Position` can only be built in bounds, so every grid access through
/// it is valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct Position {
    row: u8,
    column: u8,
}

/// The four trap squares: c6, f6, c3, f3
pub const TRAPS: [Position; 4] = [
    Position::unchecked(2, 2),
    Position::unchecked(2, 5),
    Position::unchecked(5, 2),
    Position::unchecked(5, 5),
];

/// Goal cells for gold rabbits. Column 3 is not part of the set.
pub const GOLD_GOAL_ROW: [Position; 7] = [
    Position::unchecked(0, 0),
    Position::unchecked(0, 1),
    Position::unchecked(0, 2),
    Position::unchecked(0, 4),
    Position::unchecked(0, 5),
    Position::unchecked(0, 6),
    Position::unchecked(0, 7),
];

/// Goal cells for silver rabbits. Column 3 is not part of the set.
pub const SILVER_GOAL_ROW: [Position; 7] = [
    Position::unchecked(7, 0),
    Position::unchecked(7, 1),
    Position::unchecked(7, 2),
    Position::unchecked(7, 4),
    Position::unchecked(7, 5),
    Position::unchecked(7, 6),
    Position::unchecked(7, 7),
];

impl Position {
    const fn unchecked(row: u8, column: u8) -> Self {
        Self { row, column }
    }

    /// Create a position, failing with `OutOfBounds` outside the grid
    pub fn new(row: u8, column: u8) -> Result<Self> {
        Self::from_signed(row as i16, column as i16)
    }

    fn from_signed(row: i16, column: i16) -> Result<Self> {
        let size = BOARD_SIZE as i16;
        if (0..size).contains(&row) && (0..size).contains(&column) {
            Ok(Self::unchecked(row as u8, column as u8))
        } else {
            Err(EngineError::OutOfBounds { row, column })
        }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn column(&self) -> u8 {
        self.column
    }

    /// All 64 squares in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |column| Position::unchecked(row, column)))
    }

    /// Neighbor in `direction`, or `None` when it would leave the board
    pub fn adjacent(&self, direction: Direction) -> Option<Position> {
        let (dr, dc) = direction.delta();
        Self::from_signed(self.row as i16 + dr as i16, self.column as i16 + dc as i16).ok()
    }

    /// In-bounds neighbors for each of `directions`, in the given order
    pub fn adjacent_positions(&self, directions: &[Direction]) -> Vec<Position> {
        directions
            .iter()
            .filter_map(|&direction| self.adjacent(direction))
            .collect()
    }

    /// The orthogonal neighbors that exist on the board
    pub fn neighbors(&self) -> Vec<Position> {
        self.adjacent_positions(&Direction::ALL)
    }

    pub fn is_adjacent_to(&self, other: Position) -> bool {
        Direction::between(*self, other).is_some()
    }

    pub fn is_trap(&self) -> bool {
        TRAPS.contains(self)
    }

    /// Algebraic notation, e.g. row 0 / column 0 is `a8`
    pub fn to_notation(&self) -> String {
        self.to_string()
    }

    pub fn from_notation(notation: &str) -> Result<Self> {
        notation.parse()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.column) as char;
        let rank = (b'0' + BOARD_SIZE - self.row) as char;
        write!(f, "{}{}", file, rank)
    }
}

impl FromStr for Position {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || EngineError::InvalidNotation(format!("bad square '{}'", s));
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let (file, rank) = (bytes[0], bytes[1]);
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }
        Ok(Self::unchecked(BOARD_SIZE - (rank - b'0'), file - b'a'))
    }
}

impl TryFrom<(u8, u8)> for Position {
    type Error = EngineError;

    fn try_from((row, column): (u8, u8)) -> Result<Self> {
        Self::new(row, column)
    }
}

impl From<Position> for (u8, u8) {
    fn from(pos: Position) -> Self {
        (pos.row, pos.column)
    }
}

/// Compass direction of a single step.
///
/// North points toward row 0. `None` is the "no movement" sentinel used by
/// capture entries in move notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    None,
}

impl Direction {
    /// The four real directions
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// (delta row, delta column)
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
            Direction::None => (0, 0),
        }
    }

    /// One-letter notation code
    pub fn code(self) -> char {
        match self {
            Direction::North => 'n',
            Direction::South => 's',
            Direction::East => 'e',
            Direction::West => 'w',
            Direction::None => 'x',
        }
    }

    pub fn from_code(code: char) -> Option<Direction> {
        match code {
            'n' => Some(Direction::North),
            's' => Some(Direction::South),
            'e' => Some(Direction::East),
            'w' => Some(Direction::West),
            'x' => Some(Direction::None),
            _ => None,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::None => Direction::None,
        }
    }

    /// Direction of a one-square step from `from` to `to`, if they are adjacent
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        let dr = to.row as i16 - from.row as i16;
        let dc = to.column as i16 - from.column as i16;
        Direction::ALL
            .into_iter()
            .find(|d| {
                let (r, c) = d.delta();
                r as i16 == dr && c as i16 == dc
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(Position::new(0, 0).is_ok());
        assert!(Position::new(7, 7).is_ok());
        assert_eq!(
            Position::new(8, 0),
            Err(EngineError::OutOfBounds { row: 8, column: 0 })
        );
        assert!(Position::new(3, 9).is_err());
    }

    #[test]
    fn test_notation() {
        let corner = Position::new(0, 0).unwrap();
        assert_eq!(corner.to_notation(), "a8");
        assert_eq!(Position::new(7, 7).unwrap().to_string(), "h1");
        assert_eq!(Position::from_notation("c3").unwrap(), Position::new(5, 2).unwrap());
        assert!(Position::from_notation("i1").is_err());
        assert!(Position::from_notation("a9").is_err());
        assert!(Position::from_notation("a").is_err());
    }

    #[test]
    fn test_notation_round_trip_all_squares() {
        for pos in Position::all() {
            assert_eq!(Position::from_notation(&pos.to_notation()).unwrap(), pos);
        }
        assert_eq!(Position::all().count(), 64);
    }

    #[test]
    fn test_adjacent_is_bounds_checked() {
        let corner = Position::new(0, 0).unwrap();
        assert_eq!(corner.adjacent(Direction::North), None);
        assert_eq!(corner.adjacent(Direction::West), None);
        assert_eq!(corner.adjacent(Direction::South), Some(Position::new(1, 0).unwrap()));
        assert_eq!(corner.adjacent(Direction::East), Some(Position::new(0, 1).unwrap()));
        assert_eq!(corner.neighbors().len(), 2);
        assert_eq!(Position::new(4, 4).unwrap().neighbors().len(), 4);
        assert_eq!(
            corner.adjacent_positions(&[Direction::North, Direction::East]),
            vec![Position::new(0, 1).unwrap()]
        );
    }

    #[test]
    fn test_direction_codes() {
        for d in Direction::ALL {
            assert_eq!(Direction::from_code(d.code()), Some(d));
            assert_eq!(d.opposite().opposite(), d);
        }
        assert_eq!(Direction::None.opposite(), Direction::None);
        assert_eq!(Direction::from_code('q'), None);
    }

    #[test]
    fn test_direction_between() {
        let a = Position::new(3, 3).unwrap();
        let b = Position::new(2, 3).unwrap();
        assert_eq!(Direction::between(a, b), Some(Direction::North));
        assert_eq!(Direction::between(b, a), Some(Direction::South));
        assert_eq!(Direction::between(a, a), None);
        assert!(!a.is_adjacent_to(Position::new(2, 2).unwrap()));
    }

    #[test]
    fn test_traps() {
        assert!(Position::from_notation("c6").unwrap().is_trap());
        assert!(Position::from_notation("f3").unwrap().is_trap());
        assert!(!Position::from_notation("d4").unwrap().is_trap());
    }
}
