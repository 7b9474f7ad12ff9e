//! Arimaa Core - Rule engine and game records
//!
//! This crate provides the core game logic for Arimaa:
//! - Board geometry (8x8 grid, traps, goal rows)
//! - Piece strength, freezing, steps, pushes and pulls
//! - Turn controller with the four-step budget and win detection
//! - Move notation and the saved game record format
//! - JSON starting layouts and a seeded random mover

pub mod error;
pub mod position;
pub mod pieces;
pub mod moves;
pub mod board;
pub mod game;
pub mod notation;
pub mod record;
pub mod setup;
pub mod random;

// Re-exports for convenient access
pub use error::{EngineError, Result};
pub use position::{Direction, Position, BOARD_SIZE, TRAPS};
pub use pieces::{Color, Piece, PieceType, Player};
pub use moves::{Move, StepMove};
pub use board::{Board, WinReason};
pub use game::{Event, Game, MoveReport, Outcome, Phase, STEPS_PER_TURN};
pub use notation::{placement_tokens, replay, Token, TurnLabel, TurnLine};
pub use record::GameRecord;
pub use setup::Setup;
pub use random::{RandomPlayer, TurnPlay};
