//! Random mover used for self-play and batch matches

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::game::{Game, MoveReport, Phase};
use crate::moves::Move;
use crate::notation::TurnLabel;

/// Everything one player did in a single playing turn
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnPlay {
    pub label: TurnLabel,
    pub reports: Vec<MoveReport>,
}

/// Picks uniformly among the legal moves
pub struct RandomPlayer {
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_rng(rng: ChaCha8Rng) -> Self {
        Self { rng }
    }

    /// Uniform choice over `game.legal_moves()`
    pub fn choose_move(&mut self, game: &Game) -> Option<Move> {
        game.legal_moves().choose(&mut self.rng).copied()
    }

    /// Shuffle the arranging side's pieces over the squares they occupy, then
    /// finish its arrangement
    pub fn arrange(&mut self, game: &mut Game) -> Result<()> {
        let Phase::Arranging(color) = game.phase() else {
            return Err(EngineError::WrongPhase {
                action: "arrange",
                phase: game.phase().to_string(),
            });
        };
        let squares = game.board().positions_of(color);
        for i in (1..squares.len()).rev() {
            let j = self.rng.gen_range(0..=i);
            if i != j {
                game.swap(squares[i], squares[j])?;
            }
        }
        game.finish_arranging()
    }

    /// Move until the turn passes or the game ends.
    ///
    /// Returns no reports when the active player has no legal move at the
    /// start of its turn.
    pub fn play_turn(&mut self, game: &mut Game) -> Result<TurnPlay> {
        let label = game.turn_label();
        let mut reports = Vec::new();

        while game.turn_label() == label && !game.is_ended() {
            match self.choose_move(game) {
                Some(mv) => {
                    debug!(%label, %mv, "random move");
                    reports.push(game.apply_move(mv)?);
                }
                None if reports.is_empty() => break,
                None => {
                    game.finish_turn()?;
                    break;
                }
            }
        }

        Ok(TurnPlay { label, reports })
    }

    /// Arrange both sides if needed, then play up to `max_turns` half-turns.
    ///
    /// Stops early when the game ends or the side to move is stuck.
    pub fn play_game(&mut self, game: &mut Game, max_turns: u32) -> Result<Vec<TurnPlay>> {
        while matches!(game.phase(), Phase::Arranging(_)) {
            self.arrange(game)?;
        }

        let mut turns = Vec::new();
        for _ in 0..max_turns {
            if game.is_ended() {
                break;
            }
            let turn = self.play_turn(game)?;
            let stuck = turn.reports.is_empty();
            turns.push(turn);
            if stuck {
                debug!(label = %game.turn_label(), "no legal move");
                break;
            }
        }
        Ok(turns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::game::STEPS_PER_TURN;
    use crate::pieces::{Color, Piece, Player};
    use crate::position::Position;

    fn new_game() -> Game {
        Game::with_standard_setup(Player::gold("a"), Player::silver("b")).unwrap()
    }

    #[test]
    fn test_arrange_keeps_the_army() {
        let mut game = new_game();
        let before = game.board().piece_counts(Color::Gold);
        let squares = game.board().positions_of(Color::Gold);
        let mut player = RandomPlayer::new(7);

        player.arrange(&mut game).unwrap();
        assert_eq!(game.phase(), Phase::Arranging(Color::Silver));
        assert_eq!(game.board().piece_counts(Color::Gold), before);
        assert_eq!(game.board().positions_of(Color::Gold), squares);
    }

    #[test]
    fn test_play_turn_spends_the_budget() {
        let mut game = new_game();
        let mut player = RandomPlayer::new(1);
        player.arrange(&mut game).unwrap();
        player.arrange(&mut game).unwrap();

        let turn = player.play_turn(&mut game).unwrap();
        assert_eq!(turn.label.to_string(), "2g");
        let spent: u8 = turn
            .reports
            .iter()
            .map(|r| r.events.iter().filter(|e| e.token().is_step()).count() as u8)
            .sum();
        assert_eq!(spent, STEPS_PER_TURN);
        assert_eq!(game.active_color(), Some(Color::Silver));
    }

    #[test]
    fn test_same_seed_same_game() {
        let play = |seed| {
            let mut game = new_game();
            let turns = RandomPlayer::new(seed).play_game(&mut game, 20).unwrap();
            (turns, game.board().clone())
        };
        assert_eq!(play(99), play(99));
    }

    #[test]
    fn test_play_game_respects_turn_limit() {
        let mut game = new_game();
        let turns = RandomPlayer::new(5).play_game(&mut game, 6).unwrap();
        assert!(turns.len() <= 6);
        assert!(game.is_ended() || turns.len() == 6);
    }

    #[test]
    fn test_stuck_player_stops_the_game() {
        let mut board = Board::new();
        for (square, code) in [("a1", 'R'), ("a2", 'c'), ("b1", 'c'), ("h8", 'r')] {
            board
                .place_piece(Piece::from_code(code).unwrap(), Position::from_notation(square).unwrap())
                .unwrap();
        }
        let mut game = Game::resume(
            Player::gold("a"),
            Player::silver("b"),
            board,
            "2g".parse().unwrap(),
            STEPS_PER_TURN,
        )
        .unwrap();

        let turns = RandomPlayer::new(3).play_game(&mut game, 10).unwrap();
        assert_eq!(turns.len(), 1);
        assert!(turns[0].reports.is_empty());
        assert!(!game.is_ended());
    }
}
