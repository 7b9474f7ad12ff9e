//! Move notation: placement/step/capture tokens, turn labels and turn lines
//!
//! `Ra1` places a gold rabbit on a1, `dc3n` steps the silver dog on c3 north,
//! `rc6x` records the silver rabbit on c6 being removed by a trap. A turn line
//! is a label such as `2g` followed by the tokens of that turn.

use std::fmt;
use std::str::FromStr;

use crate::board::Board;
use crate::error::{EngineError, Result};
use crate::game::{Event, MoveReport};
use crate::moves::StepMove;
use crate::pieces::{Color, Piece};
use crate::position::{Direction, Position};

const RESIGNS: &str = "resigns";

/// Largest turn number whose phase counter still fits in a `u32`
const MAX_TURN_NUMBER: u32 = u32::MAX / 2;

// ============================================================================
// TOKENS
// ============================================================================

/// One entry of a turn line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// Arrangement placement (3 characters)
    Place { piece: Piece, at: Position },
    /// One-square step (4 characters, direction letter last)
    Step {
        piece: Piece,
        from: Position,
        direction: Direction,
    },
    /// Trap removal (4 characters, `x` last)
    Capture { piece: Piece, at: Position },
}

impl Token {
    pub fn piece(&self) -> Piece {
        match *self {
            Token::Place { piece, .. } | Token::Step { piece, .. } | Token::Capture { piece, .. } => piece,
        }
    }

    /// Square the token starts from
    pub fn square(&self) -> Position {
        match *self {
            Token::Place { at, .. } | Token::Capture { at, .. } => at,
            Token::Step { from, .. } => from,
        }
    }

    /// Counts against the turn budget; captures are bookkeeping only
    pub fn is_step(&self) -> bool {
        !matches!(self, Token::Capture { .. })
    }

    /// Destination of a step token
    pub fn target(&self) -> Result<Position> {
        match *self {
            Token::Step {
                from, direction, ..
            } => from.adjacent(direction).filter(|&to| to != from).ok_or_else(|| {
                EngineError::InvalidNotation(format!("{} leaves the board", self))
            }),
            _ => Err(EngineError::InvalidNotation(format!("{} is not a step", self))),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Place { piece, at } => write!(f, "{}{}", piece, at),
            Token::Step {
                piece,
                from,
                direction,
            } => write!(f, "{}{}{}", piece, from, direction.code()),
            Token::Capture { piece, at } => write!(f, "{}{}x", piece, at),
        }
    }
}

impl FromStr for Token {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || EngineError::InvalidNotation(format!("bad token '{}'", s));
        if !s.is_ascii() || !(3..=4).contains(&s.len()) {
            return Err(invalid());
        }
        let mut chars = s.chars();
        let piece = chars.next().and_then(Piece::from_code).ok_or_else(invalid)?;
        let at: Position = s[1..3].parse().map_err(|_| invalid())?;

        let token = match s[3..].chars().next() {
            None => Token::Place { piece, at },
            Some('x') => Token::Capture { piece, at },
            Some(code) => {
                let direction = Direction::from_code(code).ok_or_else(invalid)?;
                Token::Step {
                    piece,
                    from: at,
                    direction,
                }
            }
        };
        if let Token::Step { .. } = token {
            token.target().map_err(|_| invalid())?;
        }
        Ok(token)
    }
}

impl Event {
    pub fn token(&self) -> Token {
        match *self {
            Event::Stepped { piece, step } => Token::Step {
                piece,
                from: step.from,
                direction: step.direction().unwrap_or(Direction::None),
            },
            Event::Captured { piece, at } => Token::Capture { piece, at },
        }
    }
}

impl MoveReport {
    pub fn tokens(&self) -> Vec<Token> {
        self.events.iter().map(Event::token).collect()
    }
}

/// Placement tokens for every piece of `color`, in board order
pub fn placement_tokens(board: &Board, color: Color) -> Vec<Token> {
    board
        .pieces()
        .filter(|(_, piece)| piece.owner == color)
        .map(|(at, piece)| Token::Place { piece, at })
        .collect()
}

// ============================================================================
// TURN LABELS
// ============================================================================

/// Half-turn label: `1g` and `1s` are the arrangements, `2g` the first move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TurnLabel {
    pub number: u32,
    pub color: Color,
}

impl TurnLabel {
    pub fn new(number: u32, color: Color) -> Self {
        Self { number, color }
    }

    /// Label for a 1-based phase counter: 1 → 1g, 2 → 1s, 3 → 2g, ...
    pub fn from_phase(phase: u32) -> Self {
        let phase = phase.max(1);
        if phase % 2 == 0 {
            Self::new(phase / 2, Color::Silver)
        } else {
            Self::new((phase + 1) / 2, Color::Gold)
        }
    }

    pub fn to_phase(self) -> u32 {
        match self.color {
            Color::Gold => self.number.saturating_mul(2).saturating_sub(1),
            Color::Silver => self.number.saturating_mul(2),
        }
    }

    pub fn next(self) -> Self {
        Self::from_phase(self.to_phase().saturating_add(1))
    }
}

impl fmt::Display for TurnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.color.letter())
    }
}

impl FromStr for TurnLabel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || EngineError::InvalidNotation(format!("bad turn label '{}'", s));
        let split = s.len().checked_sub(1).filter(|&i| s.is_char_boundary(i)).ok_or_else(invalid)?;
        let (digits, letter) = s.split_at(split);
        let number: u32 = digits.parse().map_err(|_| invalid())?;
        if number == 0 || number > MAX_TURN_NUMBER || digits.starts_with('+') {
            return Err(invalid());
        }
        let color = match letter {
            "g" => Color::Gold,
            "s" => Color::Silver,
            _ => return Err(invalid()),
        };
        Ok(Self::new(number, color))
    }
}

// ============================================================================
// TURN LINES
// ============================================================================

/// A label and the tokens recorded under it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnLine {
    pub label: TurnLabel,
    pub tokens: Vec<Token>,
    pub resigns: bool,
}

impl TurnLine {
    pub fn new(label: TurnLabel) -> Self {
        Self {
            label,
            tokens: Vec::new(),
            resigns: false,
        }
    }

    /// Budget already spent on this line
    pub fn steps_taken(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_step()).count()
    }
}

impl fmt::Display for TurnLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        for token in &self.tokens {
            write!(f, " {}", token)?;
        }
        if self.resigns {
            write!(f, " {}", RESIGNS)?;
        }
        Ok(())
    }
}

impl FromStr for TurnLine {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let mut words = s.split_whitespace();
        let label = words
            .next()
            .ok_or_else(|| EngineError::InvalidNotation("empty turn line".to_string()))?
            .parse()?;
        let mut line = TurnLine::new(label);
        for word in words {
            if word == RESIGNS {
                line.resigns = true;
            } else {
                line.tokens.push(word.parse()?);
            }
        }
        Ok(line)
    }
}

// ============================================================================
// REPLAY
// ============================================================================

/// Rebuild a board by applying every token to an empty board.
///
/// Legality is not checked; steps only need an occupied source and an empty
/// target, and each token's piece must match the square it names.
pub fn replay(lines: &[TurnLine]) -> Result<Board> {
    let mut board = Board::new();
    for token in lines.iter().flat_map(|line| &line.tokens) {
        apply_token(&mut board, token)?;
    }
    Ok(board)
}

fn apply_token(board: &mut Board, token: &Token) -> Result<()> {
    if let Token::Place { piece, at } = *token {
        return board.place_piece(piece, at);
    }

    let square = token.square();
    let found = board.piece_at(square).ok_or(EngineError::EmptySource(square))?;
    if found != token.piece() {
        return Err(EngineError::InvalidNotation(format!(
            "{} names {} but {} stands there",
            token,
            token.piece(),
            found
        )));
    }
    match *token {
        Token::Step { from, .. } => board.make_step(StepMove::new(from, token.target()?)),
        _ => board.remove_piece_at(square).map(|_| ()),
    }
}
