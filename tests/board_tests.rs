//! Move execution and bookkeeping: turn order, counters, the move log,
//! castling, en passant, promotion, and terminal states.

use gambit::{fen, Board, CastleSide, ChessError, Color, PieceType, Position};

fn pos(s: &str) -> Position {
    s.parse().expect("test position should parse")
}

fn play(board: &mut Board, moves: &[&str]) {
    for mv in moves {
        let (from, to) = mv.split_at(2);
        board
            .make_move(pos(from), pos(to))
            .unwrap_or_else(|e| panic!("move {mv} should be legal: {e}"));
    }
}

#[test]
fn test_initial_state() {
    let board = Board::new();

    assert_eq!(board.turn(), Color::White);
    assert_eq!(board.halfmove_clock(), 0);
    assert_eq!(board.fullmove_number(), 1);
    assert_eq!(board.castling_rights(), "KQkq");
    assert!(!board.finished());
    assert!(board.game_message().is_empty());
    assert_eq!(board.to_fen(), fen::DEFAULT_FEN);
    assert_eq!(board.player(Color::White).direction(), 1);
    assert_eq!(board.player(Color::Black).direction(), -1);
}

#[test]
fn test_turn_alternates_and_log_is_numbered() {
    let mut board = Board::new();
    play(&mut board, &["e2e4", "e7e5", "g1f3"]);

    assert_eq!(board.turn(), Color::Black);
    assert_eq!(board.fullmove_number(), 2);
    assert_eq!(board.moves_text(), "1. e2e4 | e7e5\n2. g1f3");
}

#[test]
fn test_halfmove_clock_resets_on_pawn_moves_and_captures() {
    let mut board = Board::new();

    play(&mut board, &["g1f3", "b8c6"]);
    assert_eq!(board.halfmove_clock(), 2);

    play(&mut board, &["e2e4"]);
    assert_eq!(board.halfmove_clock(), 0);

    play(&mut board, &["c6d4", "f3d4"]);
    // The knight capture on d4 resets the clock again.
    assert_eq!(board.halfmove_clock(), 0);
}

#[test]
fn test_pawn_double_step_updates_fen() {
    let mut board = Board::new();
    play(&mut board, &["a2a4"]);

    assert_eq!(board.halfmove_clock(), 0);
    assert_eq!(board.turn(), Color::Black);
    assert_eq!(
        board.to_fen(),
        "rnbqkbnr/pppppppp/8/8/P7/8/1PPPPPPP/RNBQKBNR b KQkq - 0 1"
    );
}

#[test]
fn test_illegal_move_leaves_board_unmodified() {
    let mut board = Board::new();

    let result = board.make_move(pos("e2"), pos("e5"));
    assert!(matches!(result, Err(ChessError::IllegalMove(_))));
    assert_eq!(board.to_fen(), fen::DEFAULT_FEN);
}

#[test]
fn test_out_of_turn_move_is_rejected() {
    let mut board = Board::new();

    let result = board.make_move(pos("e7"), pos("e5"));
    assert!(matches!(result, Err(ChessError::IllegalMove(_))));
    assert_eq!(board.to_fen(), fen::DEFAULT_FEN);
}

#[test]
fn test_kingside_castling() {
    let mut board =
        Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQK2R w KQkq - 0 1").unwrap();

    assert!(board.legal_moves(pos("e1")).contains(&pos("g1")));
    play(&mut board, &["e1g1"]);

    assert_eq!(
        board.piece_at(pos("g1")).map(|p| p.piece_type),
        Some(PieceType::King)
    );
    assert_eq!(
        board.piece_at(pos("f1")).map(|p| p.piece_type),
        Some(PieceType::Rook)
    );
    assert!(board.piece_at(pos("e1")).is_none());
    assert!(board.piece_at(pos("h1")).is_none());

    // The rook relocation is a sub-move: one log entry, one turn flip.
    assert_eq!(board.moves().len(), 1);
    assert_eq!(board.moves_text(), "1. e1g1");
    assert_eq!(board.turn(), Color::Black);
    assert_eq!(board.halfmove_clock(), 1);
    assert_eq!(board.castling_rights(), "kq");
}

#[test]
fn test_queenside_castling() {
    let mut board =
        Board::from_fen("r3kbnr/pppppppp/8/8/8/8/PPPPPPPP/R3KBNR w KQkq - 0 1").unwrap();

    assert!(board.legal_moves(pos("e1")).contains(&pos("c1")));
    play(&mut board, &["e1c1"]);

    assert_eq!(
        board.piece_at(pos("c1")).map(|p| p.piece_type),
        Some(PieceType::King)
    );
    assert_eq!(
        board.piece_at(pos("d1")).map(|p| p.piece_type),
        Some(PieceType::Rook)
    );
    assert!(board.piece_at(pos("a1")).is_none());
    assert_eq!(board.moves().len(), 1);
    assert_eq!(board.turn(), Color::Black);
}

#[test]
fn test_castling_blocked_by_pieces_between() {
    let board = Board::new();
    assert!(!board.legal_moves(pos("e1")).contains(&pos("g1")));
    assert!(!board.legal_moves(pos("e1")).contains(&pos("c1")));
}

#[test]
fn test_castling_blocked_when_transit_square_attacked() {
    // Black's rook on d8 covers d1, the queenside transit square.
    let mut board =
        Board::from_fen("3rkbnr/ppp1pppp/8/8/8/8/PPP1PPPP/R3KBNR w KQ - 0 1").unwrap();

    assert!(!board.legal_moves(pos("e1")).contains(&pos("c1")));
    assert!(matches!(
        board.make_move(pos("e1"), pos("c1")),
        Err(ChessError::IllegalMove(_))
    ));
}

#[test]
fn test_cannot_castle_out_of_check() {
    let board = Board::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();

    assert!(board.in_check(Color::White));
    let legal = board.legal_moves(pos("e1"));
    assert!(!legal.contains(&pos("g1")));
    assert!(!legal.contains(&pos("c1")));
}

#[test]
fn test_rook_move_drops_one_castling_right() {
    let mut board =
        Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQK2R w KQkq - 0 1").unwrap();

    play(&mut board, &["h1g1"]);
    assert_eq!(board.castling_rights(), "Qkq");
}

#[test]
fn test_king_move_drops_both_castling_rights() {
    let mut board =
        Board::from_fen("r3kbnr/pppppppp/8/8/8/8/PPPPPPPP/R3KBNR w KQkq - 0 1").unwrap();

    play(&mut board, &["e1d1"]);
    assert_eq!(board.castling_rights(), "kq");
}

#[test]
fn test_capturing_corner_rook_drops_victims_right() {
    // White bishop takes the rook on h8.
    let mut board = Board::from_fen("rnbqk2r/ppppppp1/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
        .unwrap();
    board.set_piece(pos("g7"), None).unwrap();
    board
        .set_piece(
            pos("f6"),
            Some(gambit::Piece::new(PieceType::Bishop, Color::White)),
        )
        .unwrap();

    play(&mut board, &["f6h8"]);
    assert_eq!(board.castling_rights(), "KQq");
}

#[test]
fn test_en_passant_capture() {
    let mut board = Board::new();
    play(&mut board, &["e2e4", "a7a6", "e4e5", "d7d5"]);

    assert!(board.legal_moves(pos("e5")).contains(&pos("d6")));
    play(&mut board, &["e5d6"]);

    // The captured pawn disappears from d5, not d6.
    assert!(board.piece_at(pos("d5")).is_none());
    assert_eq!(
        board.piece_at(pos("d6")).map(|p| p.piece_type),
        Some(PieceType::Pawn)
    );
    assert!(board.piece_at(pos("d6")).is_some_and(|p| p.made_en_passant()));
    assert_eq!(board.halfmove_clock(), 0);
}

#[test]
fn test_en_passant_window_closes_after_one_move() {
    let mut board = Board::new();
    play(&mut board, &["e2e4", "a7a6", "e4e5", "d7d5", "b1c3", "a6a5"]);

    // d5 was capturable immediately after its double step; one move pair
    // later the window is gone.
    assert!(!board.legal_moves(pos("e5")).contains(&pos("d6")));
}

#[test]
fn test_en_passant_requires_last_moved_pawn() {
    let mut board = Board::new();
    play(&mut board, &["e2e4", "a7a6", "e4e5", "d7d5"]);
    assert!(board.legal_moves(pos("e5")).contains(&pos("d6")));

    // Forgetting the last-moved piece alone closes the window.
    board.set_last_moved(None);
    assert!(!board.legal_moves(pos("e5")).contains(&pos("d6")));
}

#[test]
fn test_en_passant_requires_double_step() {
    let mut board = Board::new();
    play(&mut board, &["e2e4", "d7d6", "e4e5", "d6d5"]);

    // The d-pawn arrived beside e5 in two single steps; its move counter
    // is 2, so the diagonal is closed.
    assert!(!board.legal_moves(pos("e5")).contains(&pos("d6")));
}

#[test]
fn test_promotion_suspends_game_until_choice() {
    let mut board = Board::from_fen("8/P7/8/8/8/7k/8/7K w - - 0 1").unwrap();
    play(&mut board, &["a7a8"]);

    assert_eq!(board.pending_promotion(), Some(pos("a8")));
    assert_eq!(board.turn(), Color::Black);

    // No move may be made while the promotion is pending.
    assert!(matches!(
        board.make_move(pos("h3"), pos("g3")),
        Err(ChessError::IllegalMove(_))
    ));
    // King and pawn are not promotion choices.
    assert!(matches!(
        board.promote(PieceType::King),
        Err(ChessError::IllegalMove(_))
    ));

    board.promote(PieceType::Queen).unwrap();
    assert_eq!(board.pending_promotion(), None);
    assert_eq!(
        board.piece_at(pos("a8")).map(|p| (p.piece_type, p.color)),
        Some((PieceType::Queen, Color::White))
    );
    play(&mut board, &["h3g3"]);
}

#[test]
fn test_promotion_to_each_choice() {
    for choice in PieceType::PROMOTION_CHOICES {
        let mut board = Board::from_fen("8/P7/8/8/8/7k/8/7K w - - 0 1").unwrap();
        play(&mut board, &["a7a8"]);
        board.promote(choice).unwrap();
        assert_eq!(board.piece_at(pos("a8")).map(|p| p.piece_type), Some(choice));
    }
}

#[test]
fn test_promote_without_pending_is_rejected() {
    let mut board = Board::new();
    assert!(matches!(
        board.promote(PieceType::Queen),
        Err(ChessError::IllegalMove(_))
    ));
}

#[test]
fn test_fools_mate_is_checkmate() {
    let mut board = Board::new();
    play(&mut board, &["f2f3", "e7e5", "g2g4", "d8h4"]);

    assert!(board.finished());
    assert_eq!(board.game_message(), "White got checkmated.");

    // The finished flag and message are latched.
    assert!(matches!(
        board.make_move(pos("a2"), pos("a3")),
        Err(ChessError::IllegalMove(_))
    ));
    assert_eq!(board.game_message(), "White got checkmated.");
}

#[test]
fn test_stalemate_is_draw() {
    let mut board = Board::from_fen("7k/8/8/8/8/2q5/8/K7 b - - 0 1").unwrap();
    play(&mut board, &["c3b3"]);

    assert!(board.finished());
    assert_eq!(board.game_message(), "White got stalemated. Draw!");
}

#[test]
fn test_fifty_move_rule_draws() {
    let mut board =
        Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 49 1").unwrap();
    play(&mut board, &["g1f3"]);

    assert_eq!(board.halfmove_clock(), 50);
    assert!(board.finished());
    assert_eq!(board.game_message(), "The game resulted in a draw.");
}

#[test]
fn test_checkmate_wins_over_inactivity_draw() {
    // The mating move also pushes the clock to 50; checkmate is evaluated
    // first.
    let mut board = Board::from_fen("7k/8/6K1/8/8/8/8/R7 w - - 49 1").unwrap();
    play(&mut board, &["a1a8"]);

    assert!(board.finished());
    assert_eq!(board.game_message(), "Black got checkmated.");
}

#[test]
fn test_set_piece_is_noop_for_same_piece() {
    let mut board = Board::new();
    let piece = *board.piece_at(pos("e2")).unwrap();
    board.set_piece(pos("e2"), Some(piece)).unwrap();
    assert_eq!(board.to_fen(), fen::DEFAULT_FEN);
}

#[test]
fn test_castling_setters() {
    let mut board = Board::new();
    board.set_castling(Color::White, CastleSide::King, false);
    assert_eq!(board.castling_rights(), "Qkq");
    board.disable_castling();
    assert_eq!(board.castling_rights(), "-");
}
