//! Turn controller: arrangement phases, four-step turns and game end

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{Board, WinReason};
use crate::error::{EngineError, Result};
use crate::moves::{Move, StepMove};
use crate::notation::TurnLabel;
use crate::pieces::{Color, Piece, Player};
use crate::position::Position;
use crate::setup::Setup;

/// Step budget of a playing turn
pub const STEPS_PER_TURN: u8 = 4;

/// Phase counter value of the first playing turn (2g)
pub const FIRST_PLAYING_PHASE: u32 = 3;

// ============================================================================
// CORE TYPES
// ============================================================================

/// How a finished game ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: Color,
    pub reason: WinReason,
}

/// Controller state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// The given color places its army; any edit is allowed
    Arranging(Color),
    /// `active` has `moves_left` steps of its turn remaining
    Playing { active: Color, moves_left: u8 },
    /// Absorbing
    Ended(Outcome),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Arranging(color) => write!(f, "{} is arranging", color),
            Phase::Playing { active, moves_left } => {
                write!(f, "{} to move, {} steps left", active, moves_left)
            }
            Phase::Ended(outcome) => write!(f, "{} won by {}", outcome.winner, outcome.reason),
        }
    }
}

/// One atomic change made while applying a move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Stepped { piece: Piece, step: StepMove },
    Captured { piece: Piece, at: Position },
}

/// What `apply_move` did
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveReport {
    /// Steps and captures in the order they happened
    pub events: Vec<Event>,
    /// Budget left for the player who moved (0 once the turn passed)
    pub moves_left: u8,
    pub turn_passed: bool,
    pub outcome: Option<Outcome>,
}

// ============================================================================
// GAME
// ============================================================================

/// A game between a gold and a silver player
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    gold: Player,
    silver: Player,
    phase: Phase,
    game_phase: u32,
}

impl Game {
    /// New game on an empty board, gold arranging first
    pub fn new(gold: Player, silver: Player) -> Result<Self> {
        Self::with_board(gold, silver, Board::new())
    }

    /// New game starting from `board` in the gold arrangement phase
    pub fn with_board(gold: Player, silver: Player, board: Board) -> Result<Self> {
        if gold.color() != Color::Gold {
            return Err(EngineError::InvalidPlayer(gold.id()));
        }
        if silver.color() != Color::Silver {
            return Err(EngineError::InvalidPlayer(silver.id()));
        }
        Ok(Self {
            board,
            gold,
            silver,
            phase: Phase::Arranging(Color::Gold),
            game_phase: 1,
        })
    }

    /// New game with both armies in the standard layout, ready to arrange
    pub fn with_standard_setup(gold: Player, silver: Player) -> Result<Self> {
        Self::with_board(gold, silver, Setup::standard().to_board()?)
    }

    /// Rebuild a game at `label` with `moves_left` steps of that turn remaining.
    ///
    /// A budget of zero passes straight to the next turn. A position that is
    /// already won ends the game.
    pub fn resume(
        gold: Player,
        silver: Player,
        board: Board,
        label: TurnLabel,
        moves_left: u8,
    ) -> Result<Self> {
        let mut game = Self::with_board(gold, silver, board)?;
        game.game_phase = label.to_phase();
        if game.game_phase < FIRST_PLAYING_PHASE {
            game.phase = Phase::Arranging(label.color);
            return Ok(game);
        }

        game.phase = Phase::Playing {
            active: label.color,
            moves_left: moves_left.min(STEPS_PER_TURN),
        };
        if let Some(outcome) = game.check_winner() {
            game.phase = Phase::Ended(outcome);
        } else if moves_left == 0 {
            game.pass_turn(label.color);
        }
        Ok(game)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 1-based counter: 1 and 2 are the arrangement phases, 3 is the first
    /// gold turn, and every passed turn adds one
    pub fn game_phase(&self) -> u32 {
        self.game_phase
    }

    pub fn turn_label(&self) -> TurnLabel {
        TurnLabel::from_phase(self.game_phase)
    }

    pub fn player(&self, color: Color) -> &Player {
        match color {
            Color::Gold => &self.gold,
            Color::Silver => &self.silver,
        }
    }

    /// Color whose turn it is; `None` once the game has ended
    pub fn active_color(&self) -> Option<Color> {
        match self.phase {
            Phase::Arranging(color) => Some(color),
            Phase::Playing { active, .. } => Some(active),
            Phase::Ended(_) => None,
        }
    }

    /// Steps left this turn; zero outside the playing phase
    pub fn moves_left(&self) -> u8 {
        match self.phase {
            Phase::Playing { moves_left, .. } => moves_left,
            _ => 0,
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, Phase::Ended(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn winner(&self) -> Option<&Player> {
        self.outcome().map(|o| self.player(o.winner))
    }

    /// Moves the active player may make with the remaining budget
    pub fn legal_moves(&self) -> Vec<Move> {
        match self.phase {
            Phase::Playing { active, moves_left } => self
                .board
                .legal_moves(active)
                .into_iter()
                .filter(|mv| mv.cost() <= moves_left)
                .collect(),
            _ => Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Arrangement
    // ------------------------------------------------------------------------

    pub fn place(&mut self, piece: Piece, pos: Position) -> Result<()> {
        self.require_arranging("place a piece")?;
        self.board.place_piece(piece, pos)
    }

    pub fn remove(&mut self, pos: Position) -> Result<Piece> {
        self.require_arranging("remove a piece")?;
        self.board.remove_piece_at(pos)
    }

    pub fn swap(&mut self, a: Position, b: Position) -> Result<()> {
        self.require_arranging("swap pieces")?;
        self.board.switch_pieces(a, b)
    }

    /// Hand arrangement to silver, or start play once silver is done
    pub fn finish_arranging(&mut self) -> Result<()> {
        let color = self.require_arranging("finish arranging")?;
        self.phase = match color {
            Color::Gold => Phase::Arranging(Color::Silver),
            Color::Silver => Phase::Playing {
                active: Color::Gold,
                moves_left: STEPS_PER_TURN,
            },
        };
        self.game_phase += 1;
        info!(phase = %self.phase, "{} finished arranging", color);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Play
    // ------------------------------------------------------------------------

    /// Apply a legal move for the active player.
    ///
    /// Traps are resolved and the win is checked after each leg. The first
    /// winner seen is kept; the move itself always completes.
    pub fn apply_move(&mut self, mv: Move) -> Result<MoveReport> {
        let (active, moves_left) = self.require_playing("apply a move")?;
        if mv.cost() > moves_left {
            return Err(EngineError::InsufficientSteps {
                needed: mv.cost(),
                left: moves_left,
            });
        }
        if !self.board.legal_moves(active).contains(&mv) {
            return Err(EngineError::IllegalMove { mv, color: active });
        }
        self.board.validate_move(&mv)?;

        let mut events = Vec::new();
        let mut outcome = None;
        for leg in mv.legs() {
            let piece = self
                .board
                .piece_at(leg.from)
                .ok_or(EngineError::EmptySource(leg.from))?;
            self.board.make_step(leg)?;
            debug!(%piece, step = %leg, "stepped");
            events.push(Event::Stepped { piece, step: leg });

            for (at, piece) in self.board.resolve_traps() {
                debug!(%piece, %at, "captured");
                events.push(Event::Captured { piece, at });
            }

            if outcome.is_none() {
                outcome = self.check_winner();
            }
        }

        if let Some(outcome) = outcome {
            self.phase = Phase::Ended(outcome);
            info!(winner = %outcome.winner, reason = %outcome.reason, "game over");
            return Ok(MoveReport {
                events,
                moves_left: moves_left - mv.cost(),
                turn_passed: false,
                outcome: Some(outcome),
            });
        }

        let left = moves_left - mv.cost();
        let turn_passed = left == 0;
        if turn_passed {
            self.pass_turn(active);
        } else {
            self.phase = Phase::Playing {
                active,
                moves_left: left,
            };
        }
        Ok(MoveReport {
            events,
            moves_left: left,
            turn_passed,
            outcome: None,
        })
    }

    /// End the active turn early; at least one step must have been taken
    pub fn finish_turn(&mut self) -> Result<()> {
        let (active, moves_left) = self.require_playing("finish a turn")?;
        if moves_left == STEPS_PER_TURN {
            return Err(EngineError::EmptyTurn);
        }
        self.pass_turn(active);
        Ok(())
    }

    /// The active player gives up; the other player wins at once
    pub fn resign(&mut self) -> Result<Outcome> {
        let loser = self.active_color().ok_or(EngineError::GameEnded)?;
        let outcome = Outcome {
            winner: loser.opponent(),
            reason: WinReason::Resignation,
        };
        self.phase = Phase::Ended(outcome);
        info!(winner = %outcome.winner, "{} resigned", loser);
        Ok(outcome)
    }

    fn pass_turn(&mut self, active: Color) {
        self.phase = Phase::Playing {
            active: active.opponent(),
            moves_left: STEPS_PER_TURN,
        };
        self.game_phase += 1;
        debug!(label = %self.turn_label(), "turn passed");
    }

    /// Gold is checked first, so it wins a simultaneous result
    fn check_winner(&self) -> Option<Outcome> {
        [Color::Gold, Color::Silver].into_iter().find_map(|color| {
            self.board
                .win_reason(color, color.opponent())
                .map(|reason| Outcome { winner: color, reason })
        })
    }

    fn require_arranging(&self, action: &'static str) -> Result<Color> {
        match self.phase {
            Phase::Arranging(color) => Ok(color),
            Phase::Ended(_) => Err(EngineError::GameEnded),
            Phase::Playing { .. } => Err(EngineError::WrongPhase {
                action,
                phase: self.phase.to_string(),
            }),
        }
    }

    fn require_playing(&self, action: &'static str) -> Result<(Color, u8)> {
        match self.phase {
            Phase::Playing { active, moves_left } => Ok((active, moves_left)),
            Phase::Ended(_) => Err(EngineError::GameEnded),
            Phase::Arranging(_) => Err(EngineError::WrongPhase {
                action,
                phase: self.phase.to_string(),
            }),
        }
    }
}
