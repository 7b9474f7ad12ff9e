//! Board state and the movement rules: freezing, steps, pushes, pulls,
//! trap captures and win detection

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::moves::{Move, StepMove};
use crate::pieces::{Color, Piece, PieceType};
use crate::position::{Position, BOARD_SIZE, TRAPS};

/// Why a game was won
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinReason {
    /// A rabbit reached its goal row
    Goal,
    /// The enemy has no rabbits left
    Elimination,
    /// The enemy resigned
    Resignation,
}

impl fmt::Display for WinReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            WinReason::Goal => "goal",
            WinReason::Elimination => "elimination",
            WinReason::Resignation => "resignation",
        };
        write!(f, "{}", text)
    }
}

/// 8x8 grid of optional pieces
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

/// Grid of notation tokens: `""` is empty, uppercase is gold, lowercase silver
pub type Grid<'a> = [[&'a str; BOARD_SIZE as usize]; BOARD_SIZE as usize];

impl Board {
    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from a notation grid (row 0 is rank 8)
    pub fn from_grid(grid: &Grid<'_>) -> Result<Self> {
        let mut board = Self::new();
        board.populate_from_grid(grid)?;
        Ok(board)
    }

    /// Place every piece of `grid` onto this board.
    ///
    /// Fails without changing the board if a token is unknown or lands on an
    /// occupied square.
    pub fn populate_from_grid(&mut self, grid: &Grid<'_>) -> Result<()> {
        let mut next = self.clone();
        for (row, cells) in grid.iter().enumerate() {
            for (column, token) in cells.iter().enumerate() {
                if token.is_empty() {
                    continue;
                }
                let piece = parse_grid_token(token)?;
                next.place_piece(piece, Position::new(row as u8, column as u8)?)?;
            }
        }
        *self = next;
        Ok(())
    }

    /// Remove every piece
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    // ========================================================================
    // PRIMITIVES
    // ========================================================================

    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.cells[pos.row() as usize][pos.column() as usize]
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.piece_at(pos).is_none()
    }

    fn set(&mut self, pos: Position, piece: Option<Piece>) {
        self.cells[pos.row() as usize][pos.column() as usize] = piece;
    }

    pub fn place_piece(&mut self, piece: Piece, pos: Position) -> Result<()> {
        if !self.is_empty(pos) {
            return Err(EngineError::OccupiedTarget(pos));
        }
        self.set(pos, Some(piece));
        Ok(())
    }

    pub fn remove_piece_at(&mut self, pos: Position) -> Result<Piece> {
        let piece = self.piece_at(pos).ok_or(EngineError::EmptySource(pos))?;
        self.set(pos, None);
        Ok(piece)
    }

    /// Exchange the contents of two squares; at least one must hold a piece
    pub fn switch_pieces(&mut self, a: Position, b: Position) -> Result<()> {
        let (first, second) = (self.piece_at(a), self.piece_at(b));
        if first.is_none() && second.is_none() {
            return Err(EngineError::EmptySource(a));
        }
        self.set(a, second);
        self.set(b, first);
        Ok(())
    }

    /// Occupied squares in row-major order
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| self.piece_at(pos).map(|piece| (pos, piece)))
    }

    pub fn positions_of(&self, color: Color) -> Vec<Position> {
        self.pieces()
            .filter(|(_, piece)| piece.owner == color)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn rabbit_count(&self, color: Color) -> usize {
        let rabbit = Piece::new(PieceType::Rabbit, color);
        self.pieces().filter(|(_, piece)| *piece == rabbit).count()
    }

    pub fn piece_counts(&self, color: Color) -> FxHashMap<PieceType, usize> {
        let mut counts = FxHashMap::default();
        for (_, piece) in self.pieces().filter(|(_, p)| p.owner == color) {
            *counts.entry(piece.piece_type).or_insert(0) += 1;
        }
        counts
    }

    /// One string per row, `.` for empty squares
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or('.', |piece| piece.code()))
                    .collect()
            })
            .collect()
    }

    // ========================================================================
    // FREEZING
    // ========================================================================

    /// True if a neighbor holds a piece of the same owner as the piece at `pos`
    pub fn is_friendly_piece_nearby(&self, pos: Position) -> bool {
        let Some(piece) = self.piece_at(pos) else {
            return false;
        };
        pos.neighbors()
            .into_iter()
            .any(|n| self.piece_at(n).map_or(false, |other| other.owner == piece.owner))
    }

    /// Neighbors holding an enemy strictly stronger than the piece at `pos`
    pub fn adjacent_stronger_enemies(&self, pos: Position) -> Vec<Position> {
        let Some(piece) = self.piece_at(pos) else {
            return Vec::new();
        };
        pos.neighbors()
            .into_iter()
            .filter(|&n| {
                self.piece_at(n)
                    .map_or(false, |other| other.owner != piece.owner && other.is_stronger_than(&piece))
            })
            .collect()
    }

    pub fn is_position_frozen(&self, pos: Position) -> bool {
        !self.adjacent_stronger_enemies(pos).is_empty() && !self.is_friendly_piece_nearby(pos)
    }

    // ========================================================================
    // STEP GENERATION
    // ========================================================================

    /// Steps the piece at `pos` may make on its own: none when frozen, and
    /// only in its own permitted directions
    pub fn legal_step_moves_by_self(&self, pos: Position) -> Vec<StepMove> {
        let Some(piece) = self.piece_at(pos) else {
            return Vec::new();
        };
        if self.is_position_frozen(pos) {
            return Vec::new();
        }
        pos.adjacent_positions(&piece.possible_directions())
            .into_iter()
            .filter(|&to| self.is_empty(to))
            .map(|to| StepMove::new(pos, to))
            .collect()
    }

    /// Steps the piece at `pos` may be forced into by an opponent.
    ///
    /// All four directions count and freezing is ignored; the agent is the
    /// opponent.
    pub fn legal_step_moves_as_moved(&self, pos: Position) -> Vec<StepMove> {
        if self.is_empty(pos) {
            return Vec::new();
        }
        pos.neighbors()
            .into_iter()
            .filter(|&to| self.is_empty(to))
            .map(|to| StepMove::new(pos, to))
            .collect()
    }

    pub fn can_step_move_itself(&self, pos: Position) -> bool {
        !self.legal_step_moves_by_self(pos).is_empty()
    }

    pub fn can_be_moved(&self, pos: Position) -> bool {
        !self.legal_step_moves_as_moved(pos).is_empty()
    }

    pub fn positions_that_can_step(&self, color: Color) -> Vec<Position> {
        self.positions_of(color)
            .into_iter()
            .filter(|&pos| self.can_step_move_itself(pos))
            .collect()
    }

    // ========================================================================
    // PUSH / PULL
    // ========================================================================

    /// Stronger enemies next to `pulled_pos` that are able to step away
    pub fn candidate_pullers(&self, pulled_pos: Position) -> Vec<Position> {
        self.adjacent_stronger_enemies(pulled_pos)
            .into_iter()
            .filter(|&pos| self.can_step_move_itself(pos))
            .collect()
    }

    /// Stronger enemies next to `pushed_pos`
    pub fn candidate_pushers(&self, pushed_pos: Position) -> Vec<Position> {
        self.adjacent_stronger_enemies(pushed_pos)
    }

    pub fn can_be_pulled(&self, pos: Position) -> bool {
        !self.candidate_pullers(pos).is_empty()
    }

    pub fn can_be_pushed(&self, pos: Position) -> bool {
        self.can_be_moved(pos) && !self.adjacent_stronger_enemies(pos).is_empty()
    }

    /// Pieces of `color`'s opponent that some piece of `color` can pull
    pub fn pullable_enemy_positions(&self, color: Color) -> Vec<Position> {
        self.positions_of(color.opponent())
            .into_iter()
            .filter(|&pos| self.can_be_pulled(pos))
            .collect()
    }

    /// Pieces of `color`'s opponent that some piece of `color` can push
    pub fn pushable_enemy_positions(&self, color: Color) -> Vec<Position> {
        self.positions_of(color.opponent())
            .into_iter()
            .filter(|&pos| self.can_be_pushed(pos))
            .collect()
    }

    /// Every pull of `pulled_pos` by `puller_pos`: one per puller step, with
    /// the pulled piece following into the puller's square
    pub fn legal_pull_moves(&self, puller_pos: Position, pulled_pos: Position) -> Vec<Move> {
        if !self.adjacent_stronger_enemies(pulled_pos).contains(&puller_pos) {
            return Vec::new();
        }
        self.legal_step_moves_by_self(puller_pos)
            .into_iter()
            .map(|step| Move::Pull {
                from: puller_pos,
                to: step.to,
                pulled_from: pulled_pos,
                pulled_to: puller_pos,
            })
            .collect()
    }

    /// Every push of `pushed_pos` by `pusher_pos`: one per square the pushed
    /// piece can be moved to, with the pusher taking its place
    pub fn legal_push_moves(&self, pusher_pos: Position, pushed_pos: Position) -> Vec<Move> {
        if !self.candidate_pushers(pushed_pos).contains(&pusher_pos) {
            return Vec::new();
        }
        self.legal_step_moves_as_moved(pushed_pos)
            .into_iter()
            .map(|step| Move::Push {
                from: pusher_pos,
                to: pushed_pos,
                pushed_from: pushed_pos,
                pushed_to: step.to,
            })
            .collect()
    }

    /// All steps, pulls and pushes available to `color`, ignoring the turn
    /// budget.
    ///
    /// A frozen piece is never the agent: it cannot step, pull or push.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves: Vec<Move> = self
            .positions_of(color)
            .into_iter()
            .flat_map(|pos| self.legal_step_moves_by_self(pos))
            .map(Into::into)
            .collect();

        for pulled in self.pullable_enemy_positions(color) {
            for puller in self.candidate_pullers(pulled) {
                moves.extend(self.legal_pull_moves(puller, pulled));
            }
        }

        for pushed in self.pushable_enemy_positions(color) {
            for pusher in self.candidate_pushers(pushed) {
                if self.is_position_frozen(pusher) {
                    continue;
                }
                moves.extend(self.legal_push_moves(pusher, pushed));
            }
        }

        moves
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Relocate one piece to an adjacent empty square
    pub fn make_step(&mut self, step: StepMove) -> Result<()> {
        if !step.from.is_adjacent_to(step.to) {
            return Err(EngineError::IllegalMoveShape(format!(
                "{} and {} are not adjacent",
                step.from, step.to
            )));
        }
        let piece = self.piece_at(step.from).ok_or(EngineError::EmptySource(step.from))?;
        if !self.is_empty(step.to) {
            return Err(EngineError::OccupiedTarget(step.to));
        }
        self.set(step.from, None);
        self.set(step.to, Some(piece));
        Ok(())
    }

    /// Check that every leg of `mv` can be applied in order, without mutating
    pub fn validate_move(&self, mv: &Move) -> Result<()> {
        match *mv {
            Move::Step { .. } => {}
            Move::Pull {
                from, pulled_to, ..
            } if pulled_to != from => {
                return Err(EngineError::IllegalMoveShape(format!(
                    "pulled piece must follow into {}, not {}",
                    from, pulled_to
                )));
            }
            Move::Push {
                to, pushed_from, ..
            } if to != pushed_from => {
                return Err(EngineError::IllegalMoveShape(format!(
                    "pusher must take the pushed square {}, not {}",
                    pushed_from, to
                )));
            }
            Move::Pull { .. } | Move::Push { .. } => {}
        }

        let mut scratch = self.clone();
        for leg in mv.legs() {
            scratch.make_step(leg)?;
        }
        Ok(())
    }

    /// Apply `mv` leg by leg. Nothing changes if any leg would fail.
    pub fn make_move(&mut self, mv: &Move) -> Result<()> {
        self.validate_move(mv)?;
        for leg in mv.legs() {
            self.make_step(leg)?;
        }
        Ok(())
    }

    /// Remove every trapped piece with no friendly neighbor
    pub fn resolve_traps(&mut self) -> Vec<(Position, Piece)> {
        let mut captured = Vec::new();
        for trap in TRAPS {
            if let Some(piece) = self.piece_at(trap) {
                if !self.is_friendly_piece_nearby(trap) {
                    self.set(trap, None);
                    captured.push((trap, piece));
                }
            }
        }
        captured
    }

    // ========================================================================
    // WIN DETECTION
    // ========================================================================

    /// Goal if one of `player`'s rabbits stands on its goal row, otherwise
    /// elimination if `enemy` has no rabbits
    pub fn win_reason(&self, player: Color, enemy: Color) -> Option<WinReason> {
        let rabbit = Piece::new(PieceType::Rabbit, player);
        if player
            .goal_row()
            .iter()
            .any(|&pos| self.piece_at(pos) == Some(rabbit))
        {
            return Some(WinReason::Goal);
        }
        if self.rabbit_count(enemy) == 0 {
            return Some(WinReason::Elimination);
        }
        None
    }

    pub fn has_player_won(&self, player: Color, enemy: Color) -> bool {
        self.win_reason(player, enemy).is_some()
    }
}

fn parse_grid_token(token: &str) -> Result<Piece> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(code), None) => Piece::from_code(code),
        _ => None,
    }
    .ok_or_else(|| EngineError::InvalidNotation(format!("bad piece code '{}'", token)))
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " +-----------------+")?;
        for (row, cells) in self.cells.iter().enumerate() {
            write!(f, "{}|", BOARD_SIZE as usize - row)?;
            for (column, cell) in cells.iter().enumerate() {
                let symbol = match cell {
                    Some(piece) => piece.code(),
                    None if TRAPS.iter().any(|t| {
                        t.row() as usize == row && t.column() as usize == column
                    }) =>
                    {
                        'x'
                    }
                    None => '.',
                };
                write!(f, " {}", symbol)?;
            }
            writeln!(f, " |")?;
        }
        writeln!(f, " +-----------------+")?;
        write!(f, "   a b c d e f g h")
    }
}
