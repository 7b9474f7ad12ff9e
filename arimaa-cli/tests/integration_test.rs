//! Integration tests for the Arimaa engine
//!
//! Tests the full stack: board rules, turn control, notation, game records
//! and seeded self-play

use arimaa_core::{
    placement_tokens, Board, Color, EngineError, Event, Game, GameRecord, Move, Phase, Piece,
    PieceType, Player, Position, RandomPlayer, Setup, Token, WinReason, STEPS_PER_TURN,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn sq(notation: &str) -> Position {
    Position::from_notation(notation).unwrap()
}

fn piece(code: char) -> Piece {
    Piece::from_code(code).unwrap()
}

/// Board from `(code, square)` pairs
fn board_with(pieces: &[(char, &str)]) -> Board {
    let mut board = Board::new();
    for &(code, at) in pieces {
        board.place_piece(piece(code), sq(at)).unwrap();
    }
    board
}

/// Game on `board` with both arrangement phases already done
fn playing_game(board: Board) -> Game {
    let mut game = Game::with_board(Player::gold("gold"), Player::silver("silver"), board).unwrap();
    game.finish_arranging().unwrap();
    game.finish_arranging().unwrap();
    game
}

/// Self-play game recorded the way the CLI saves it
fn recorded_self_play(seed: u64, max_turns: u32) -> (Game, GameRecord) {
    let mut game =
        Game::with_standard_setup(Player::gold("gold"), Player::silver("Computer").computer())
            .unwrap();
    let mut player = RandomPlayer::new(seed);
    let mut record = GameRecord::new("gold", "Computer");

    while let Phase::Arranging(color) = game.phase() {
        let label = game.turn_label();
        player.arrange(&mut game).unwrap();
        record.record_tokens(label, placement_tokens(game.board(), color));
        record.start_turn(game.turn_label());
    }
    for _ in 0..max_turns {
        if game.is_ended() {
            break;
        }
        let turn = player.play_turn(&mut game).unwrap();
        if turn.reports.is_empty() {
            break;
        }
        record.record_tokens(turn.label, turn.reports.iter().flat_map(|r| r.tokens()));
        if !game.is_ended() {
            record.start_turn(game.turn_label());
        }
    }
    record.record_outcome(game.outcome());
    (game, record)
}

// ============================================================================
// BOARD RULES
// ============================================================================

#[test]
fn test_standard_layout() {
    let board = Setup::standard().to_board().unwrap();

    for color in [Color::Gold, Color::Silver] {
        let counts = board.piece_counts(color);
        for kind in PieceType::ALL {
            assert_eq!(counts.get(&kind).copied().unwrap_or(0), kind.standard_count());
        }
        assert_eq!(board.rabbit_count(color), 8);
    }
    assert!(Setup::standard().army_issues().unwrap().is_empty());
}

#[test]
fn test_opening_moves_are_steps_only() {
    let board = Setup::standard().to_board().unwrap();
    let moves = board.legal_moves(Color::Gold);

    assert!(!moves.is_empty());
    assert!(moves.iter().all(|mv| matches!(mv, Move::Step { .. })));
    // Only the front row can step, and only forward
    assert_eq!(moves.len(), 8);
}

#[test]
fn test_frozen_piece_cannot_step() {
    let board = board_with(&[('r', "d5"), ('E', "d4"), ('R', "a1")]);

    assert!(board.is_position_frozen(sq("d5")));
    assert!(!board.can_step_move_itself(sq("d5")));
    assert!(board.can_be_pushed(sq("d5")));
    assert!(board.can_be_pulled(sq("d5")));
}

#[test]
fn test_friend_unfreezes() {
    let board = board_with(&[('r', "d5"), ('r', "e5"), ('E', "d4"), ('R', "a1")]);

    assert!(!board.is_position_frozen(sq("d5")));
    assert!(board.can_step_move_itself(sq("d5")));
}

// ============================================================================
// TURN CONTROL
// ============================================================================

#[test]
fn test_push_costs_two_steps() {
    let mut game = playing_game(board_with(&[('E', "d4"), ('r', "d5"), ('R', "h1"), ('r', "a8")]));

    let push = Move::Push {
        from: sq("d4"),
        to: sq("d5"),
        pushed_from: sq("d5"),
        pushed_to: sq("d6"),
    };
    assert!(game.legal_moves().contains(&push));

    let report = game.apply_move(push).unwrap();
    assert_eq!(report.moves_left, STEPS_PER_TURN - 2);
    assert!(!report.turn_passed);
    assert_eq!(game.board().piece_at(sq("d6")), Some(piece('r')));
    assert_eq!(game.board().piece_at(sq("d5")), Some(piece('E')));
}

#[test]
fn test_pull_moves_puller_first() {
    let mut game = playing_game(board_with(&[('E', "d4"), ('r', "d5"), ('R', "h1"), ('r', "a8")]));

    let pull = Move::Pull {
        from: sq("d4"),
        to: sq("d3"),
        pulled_from: sq("d5"),
        pulled_to: sq("d4"),
    };
    let report = game.apply_move(pull).unwrap();

    let stepped: Vec<Piece> = report
        .events
        .iter()
        .filter_map(|e| match e {
            Event::Stepped { piece, .. } => Some(*piece),
            _ => None,
        })
        .collect();
    assert_eq!(stepped, vec![piece('E'), piece('r')]);
    assert_eq!(game.board().piece_at(sq("d3")), Some(piece('E')));
    assert_eq!(game.board().piece_at(sq("d4")), Some(piece('r')));
}

#[test]
fn test_push_into_trap_wins_by_elimination() {
    let mut game = playing_game(board_with(&[('E', "c4"), ('r', "c5"), ('R', "h1")]));

    let push = Move::Push {
        from: sq("c4"),
        to: sq("c5"),
        pushed_from: sq("c5"),
        pushed_to: sq("c6"),
    };
    let report = game.apply_move(push).unwrap();

    assert!(report.events.iter().any(|e| matches!(
        e,
        Event::Captured { piece: p, at } if *p == piece('r') && *at == sq("c6")
    )));
    // The pusher still completes its leg
    assert_eq!(game.board().piece_at(sq("c5")), Some(piece('E')));

    let outcome = game.outcome().unwrap();
    assert_eq!(outcome.winner, Color::Gold);
    assert_eq!(outcome.reason, WinReason::Elimination);
    assert!(matches!(
        game.apply_move(Move::Step {
            from: sq("h1"),
            to: sq("h2")
        }),
        Err(EngineError::GameEnded)
    ));
}

#[test]
fn test_rabbit_reaches_goal() {
    let mut game = playing_game(board_with(&[('R', "a7"), ('r', "h8")]));

    game.apply_move(Move::Step {
        from: sq("a7"),
        to: sq("a8"),
    })
    .unwrap();

    let outcome = game.outcome().unwrap();
    assert_eq!(outcome.winner, Color::Gold);
    assert_eq!(outcome.reason, WinReason::Goal);
}

#[test]
fn test_turn_passes_after_four_steps() {
    let mut game = playing_game(Setup::standard().to_board().unwrap());

    for (from, to) in [("a2", "a3"), ("a3", "a4"), ("b2", "b3"), ("b3", "b4")] {
        game.apply_move(Move::Step {
            from: sq(from),
            to: sq(to),
        })
        .unwrap();
    }

    assert_eq!(
        game.phase(),
        Phase::Playing {
            active: Color::Silver,
            moves_left: STEPS_PER_TURN
        }
    );
    assert_eq!(game.turn_label().to_string(), "2s");
}

// ============================================================================
// GAME RECORDS
// ============================================================================

#[test]
fn test_record_round_trips_through_text() {
    let (game, record) = recorded_self_play(21, 12);

    let text = record.to_string();
    let parsed: GameRecord = text.parse().unwrap();
    assert_eq!(parsed, record);
    assert_eq!(&parsed.board().unwrap(), game.board());
}

#[test]
fn test_record_resumes_where_it_stopped() {
    let (game, record) = recorded_self_play(5, 3);
    if game.is_ended() {
        return;
    }

    let parsed: GameRecord = record.to_string().parse().unwrap();
    let resumed = parsed.resume().unwrap();
    assert_eq!(resumed.phase(), game.phase());
    assert_eq!(resumed.turn_label(), game.turn_label());
    assert_eq!(resumed.board(), game.board());
    assert!(resumed.player(Color::Silver).is_computer);
}

#[test]
fn test_mismatched_record_is_rejected() {
    let (_, record) = recorded_self_play(8, 2);
    let mut broken = record.clone();

    let Some(Token::Step { piece, .. }) = broken.lines[2].tokens.first_mut() else {
        panic!("first gold turn should open with a step");
    };
    piece.piece_type = if piece.piece_type == PieceType::Elephant {
        PieceType::Camel
    } else {
        PieceType::Elephant
    };

    assert!(record.board().is_ok());
    assert!(broken.board().is_err());
}

// ============================================================================
// SETUP FILES
// ============================================================================

#[test]
fn test_setup_json_round_trip() {
    let board = board_with(&[('E', "d4"), ('r', "d5"), ('R', "h1")]);
    let setup = Setup::from_board("sparse", &board);

    let json = serde_json::to_string(&setup).unwrap();
    let loaded: Setup = serde_json::from_str(&json).unwrap();
    assert_eq!(loaded.name, "sparse");
    assert_eq!(loaded.to_board().unwrap(), board);
    assert!(!loaded.army_issues().unwrap().is_empty());
}

// ============================================================================
// SELF-PLAY
// ============================================================================

#[test]
fn test_self_play_is_deterministic() {
    let play = |seed: u64| {
        let mut game =
            Game::with_standard_setup(Player::gold("a"), Player::silver("b")).unwrap();
        let mut player = RandomPlayer::from_rng(ChaCha8Rng::seed_from_u64(seed));
        let turns = player.play_game(&mut game, 30).unwrap();
        (turns.len(), game.board().clone(), game.outcome())
    };

    assert_eq!(play(99), play(99));
}

#[test]
fn test_self_play_keeps_budget() {
    let mut game = Game::with_standard_setup(Player::gold("a"), Player::silver("b")).unwrap();
    let turns = RandomPlayer::new(3).play_game(&mut game, 20).unwrap();

    for turn in &turns {
        let spent: u8 = turn
            .reports
            .iter()
            .map(|r| {
                r.events
                    .iter()
                    .filter(|e| matches!(e, Event::Stepped { .. }))
                    .count() as u8
            })
            .sum();
        assert!(spent <= STEPS_PER_TURN, "{} spent {}", turn.label, spent);
    }
}
