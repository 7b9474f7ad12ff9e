//! Piece types, colors and players

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::position::{Direction, GOLD_GOAL_ROW, Position, SILVER_GOAL_ROW};

/// The six piece types, weakest first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Rabbit,
    Cat,
    Dog,
    Horse,
    Camel,
    Elephant,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Rabbit,
        PieceType::Cat,
        PieceType::Dog,
        PieceType::Horse,
        PieceType::Camel,
        PieceType::Elephant,
    ];

    /// Strength rank, independent of declaration order
    pub fn rank(self) -> u8 {
        match self {
            PieceType::Rabbit => 0,
            PieceType::Cat => 1,
            PieceType::Dog => 2,
            PieceType::Horse => 3,
            PieceType::Camel => 4,
            PieceType::Elephant => 5,
        }
    }

    /// Strictly stronger; equal types are never stronger
    pub fn is_stronger_than(self, other: PieceType) -> bool {
        self.rank() > other.rank()
    }

    /// Lowercase notation letter
    pub fn code(self) -> char {
        match self {
            PieceType::Rabbit => 'r',
            PieceType::Cat => 'c',
            PieceType::Dog => 'd',
            PieceType::Horse => 'h',
            PieceType::Camel => 'm',
            PieceType::Elephant => 'e',
        }
    }

    /// Parse a notation letter, ignoring case
    pub fn from_code(code: char) -> Option<PieceType> {
        let lower = code.to_ascii_lowercase();
        PieceType::ALL.into_iter().find(|t| t.code() == lower)
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceType::Rabbit => "rabbit",
            PieceType::Cat => "cat",
            PieceType::Dog => "dog",
            PieceType::Horse => "horse",
            PieceType::Camel => "camel",
            PieceType::Elephant => "elephant",
        }
    }

    /// How many of this type a standard army holds
    pub fn standard_count(self) -> usize {
        match self {
            PieceType::Rabbit => 8,
            PieceType::Cat | PieceType::Dog | PieceType::Horse => 2,
            PieceType::Camel | PieceType::Elephant => 1,
        }
    }
}

/// Side color. Gold is player 1 and moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Gold,
    Silver,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::Gold => Color::Silver,
            Color::Silver => Color::Gold,
        }
    }

    /// Player id this color belongs to (1 or 2)
    pub fn player_id(self) -> u8 {
        match self {
            Color::Gold => 1,
            Color::Silver => 2,
        }
    }

    pub fn from_player_id(id: u8) -> Result<Self> {
        match id {
            1 => Ok(Color::Gold),
            2 => Ok(Color::Silver),
            other => Err(EngineError::InvalidPlayer(other)),
        }
    }

    /// The direction this color's rabbits advance in
    pub fn goal_direction(self) -> Direction {
        match self {
            Color::Gold => Direction::North,
            Color::Silver => Direction::South,
        }
    }

    /// Cells a rabbit of this color must reach
    pub fn goal_row(self) -> &'static [Position] {
        match self {
            Color::Gold => &GOLD_GOAL_ROW,
            Color::Silver => &SILVER_GOAL_ROW,
        }
    }

    /// The two rows this color arranges its army on
    pub fn home_rows(self) -> [u8; 2] {
        match self {
            Color::Gold => [6, 7],
            Color::Silver => [0, 1],
        }
    }

    /// Letter used in turn labels (`g` / `s`)
    pub fn letter(self) -> char {
        match self {
            Color::Gold => 'g',
            Color::Silver => 's',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Gold => write!(f, "Gold"),
            Color::Silver => write!(f, "Silver"),
        }
    }
}

/// A participant in a game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: u8,
    color: Color,
    pub is_computer: bool,
    pub name: String,
}

impl Player {
    /// Color and goal direction follow from `id`: 1 is gold, 2 is silver
    pub fn new(id: u8, is_computer: bool, name: impl Into<String>) -> Result<Self> {
        let color = Color::from_player_id(id)?;
        Ok(Self {
            id,
            color,
            is_computer,
            name: name.into(),
        })
    }

    pub fn gold(name: impl Into<String>) -> Self {
        Self {
            id: 1,
            color: Color::Gold,
            is_computer: false,
            name: name.into(),
        }
    }

    pub fn silver(name: impl Into<String>) -> Self {
        Self {
            id: 2,
            color: Color::Silver,
            is_computer: false,
            name: name.into(),
        }
    }

    pub fn computer(mut self) -> Self {
        self.is_computer = true;
        self
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn goal_direction(&self) -> Direction {
        self.color.goal_direction()
    }
}

/// A piece on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub owner: Color,
}

impl Piece {
    pub const fn new(piece_type: PieceType, owner: Color) -> Self {
        Self { piece_type, owner }
    }

    pub fn is_rabbit(&self) -> bool {
        self.piece_type == PieceType::Rabbit
    }

    pub fn is_stronger_than(&self, other: &Piece) -> bool {
        self.piece_type.is_stronger_than(other.piece_type)
    }

    /// Directions this piece may step in on its own.
    ///
    /// Rabbits never step back toward their own home edge.
    pub fn possible_directions(&self) -> Vec<Direction> {
        let backward = self.owner.goal_direction().opposite();
        Direction::ALL
            .into_iter()
            .filter(|&d| !self.is_rabbit() || d != backward)
            .collect()
    }

    /// Notation letter: uppercase for gold, lowercase for silver
    pub fn code(&self) -> char {
        match self.owner {
            Color::Gold => self.piece_type.code().to_ascii_uppercase(),
            Color::Silver => self.piece_type.code(),
        }
    }

    pub fn from_code(code: char) -> Option<Piece> {
        let piece_type = PieceType::from_code(code)?;
        let owner = if code.is_ascii_uppercase() {
            Color::Gold
        } else {
            Color::Silver
        };
        Some(Piece::new(piece_type, owner))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn dirs(piece: Piece) -> HashSet<Direction> {
        piece.possible_directions().into_iter().collect()
    }

    #[test]
    fn test_strength_is_strict() {
        assert!(PieceType::Elephant.is_stronger_than(PieceType::Camel));
        assert!(PieceType::Cat.is_stronger_than(PieceType::Rabbit));
        assert!(!PieceType::Dog.is_stronger_than(PieceType::Dog));
        assert!(!PieceType::Rabbit.is_stronger_than(PieceType::Cat));
    }

    #[test]
    fn test_non_rabbits_move_everywhere() {
        let all: HashSet<_> = Direction::ALL.into_iter().collect();
        for piece_type in PieceType::ALL.into_iter().skip(1) {
            assert_eq!(dirs(Piece::new(piece_type, Color::Gold)), all);
            assert_eq!(dirs(Piece::new(piece_type, Color::Silver)), all);
        }
    }

    #[test]
    fn test_rabbits_never_retreat() {
        let gold = dirs(Piece::new(PieceType::Rabbit, Color::Gold));
        let expected: HashSet<_> = [Direction::North, Direction::West, Direction::East].into();
        assert_eq!(gold, expected);

        let silver = dirs(Piece::new(PieceType::Rabbit, Color::Silver));
        let expected: HashSet<_> = [Direction::South, Direction::West, Direction::East].into();
        assert_eq!(silver, expected);
    }

    #[test]
    fn test_piece_codes() {
        let elephant = Piece::from_code('E').unwrap();
        assert_eq!(elephant, Piece::new(PieceType::Elephant, Color::Gold));
        assert_eq!(Piece::from_code('m').unwrap().owner, Color::Silver);
        assert_eq!(Piece::from_code('x'), None);
        for piece_type in PieceType::ALL {
            for owner in [Color::Gold, Color::Silver] {
                let piece = Piece::new(piece_type, owner);
                assert_eq!(Piece::from_code(piece.code()), Some(piece));
            }
        }
    }

    #[test]
    fn test_players() {
        let gold = Player::new(1, false, "alice").unwrap();
        assert_eq!(gold.color(), Color::Gold);
        assert_eq!(gold.goal_direction(), Direction::North);
        let silver = Player::new(2, true, "bot").unwrap();
        assert_eq!(silver.color(), Color::Silver);
        assert_eq!(silver.goal_direction(), Direction::South);
        assert!(silver.is_computer);
        assert_eq!(Player::new(3, false, ""), Err(EngineError::InvalidPlayer(3)));
    }

    #[test]
    fn test_standard_army_has_sixteen_pieces() {
        let total: usize = PieceType::ALL.iter().map(|t| t.standard_count()).sum();
        assert_eq!(total, 16);
    }
}
