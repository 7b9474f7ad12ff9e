//! Engine error type

use crate::moves::Move;
use crate::pieces::Color;
use crate::position::Position;

/// Errors raised by the engine.
///
/// The first four kinds are precondition violations of the board mutators;
/// the rest come from the turn controller and the notation helpers. None of
/// them describe a game result: wins and resignations are reported through
/// [`crate::game::Phase::Ended`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("position (row {row}, column {column}) is outside the board")]
    OutOfBounds { row: i16, column: i16 },

    #[error("square {0} is already occupied")]
    OccupiedTarget(Position),

    #[error("square {0} is empty")]
    EmptySource(Position),

    #[error("illegal move shape: {0}")]
    IllegalMoveShape(String),

    #[error("invalid notation: {0}")]
    InvalidNotation(String),

    #[error("player id must be 1 or 2, got {0}")]
    InvalidPlayer(u8),

    #[error("the game has already ended")]
    GameEnded,

    #[error("cannot {action} while {phase}")]
    WrongPhase { action: &'static str, phase: String },

    #[error("move needs {needed} steps but only {left} remain this turn")]
    InsufficientSteps { needed: u8, left: u8 },

    #[error("{mv} is not a legal move for {color}")]
    IllegalMove { mv: Move, color: Color },

    #[error("a turn must contain at least one step")]
    EmptyTurn,
}

/// Engine result alias
pub type Result<T> = std::result::Result<T, EngineError>;
