use crate::error::{ChessError, Result};
use crate::fen;
use crate::movement;
use crate::moves::Move;
use crate::piece::{Color, Piece, PieceType};
use crate::player::{CastleSide, Player};
use crate::position::Position;
use tracing::{debug, info};

/// The raw 8x8 grid, indexed `[rank][file]` with a1 at `[0][0]`.
pub(crate) type Squares = [[Option<Piece>; 8]; 8];

/// A chess board with full game state: the piece grid, both players, whose
/// turn it is, the move log, the half-move and full-move counters, the
/// latched finished flag, and the pending-promotion slot.
///
/// The board owns every piece; pieces are addressed by their `Position` and
/// never refer back to the board. All mutation goes through [`make_move`]
/// and [`promote`].
///
/// [`make_move`]: Board::make_move
/// [`promote`]: Board::promote
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    squares: Squares,
    white: Player,
    black: Player,
    turn: Color,
    last_moved: Option<Position>,
    moves: Vec<Move>,
    halfmove_clock: u16,
    fullmove_number: u16,
    finished: bool,
    game_message: String,
    pending_promotion: Option<Position>,
}

impl Board {
    /// Create a new board with the standard starting position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_starting_position();
        board
    }

    /// Create a board with no pieces on it.
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
            white: Player::new(Color::White),
            black: Player::new(Color::Black),
            turn: Color::White,
            last_moved: None,
            moves: Vec::new(),
            halfmove_clock: 0,
            fullmove_number: 1,
            finished: false,
            game_message: String::new(),
            pending_promotion: None,
        }
    }

    /// Create a board from a FEN string.
    pub fn from_fen(text: &str) -> Result<Self> {
        fen::board_from_fen(text)
    }

    /// The current board state as a FEN string.
    pub fn to_fen(&self) -> String {
        fen::board_to_fen(self)
    }

    /// Set up the standard chess starting position.
    fn setup_starting_position(&mut self) {
        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for (file, &piece_type) in back_rank.iter().enumerate() {
            self.squares[0][file] = Some(Piece::new(piece_type, Color::White));
            self.squares[7][file] = Some(Piece::new(piece_type, Color::Black));
        }

        for file in 0..8 {
            self.squares[1][file] = Some(Piece::new(PieceType::Pawn, Color::White));
            self.squares[6][file] = Some(Piece::new(PieceType::Pawn, Color::Black));
        }
    }

    /// Get the piece at the specified position, if any.
    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        if pos.file > 7 || pos.rank > 7 {
            return None;
        }
        self.squares[pos.rank as usize][pos.file as usize].as_ref()
    }

    /// Set a piece at the specified position. A no-op if the square already
    /// holds that exact piece.
    pub fn set_piece(&mut self, pos: Position, piece: Option<Piece>) -> Result<()> {
        if pos.file > 7 || pos.rank > 7 {
            return Err(ChessError::IllegalPosition(format!(
                "Position ({},{}) is out of bounds",
                pos.file, pos.rank
            )));
        }

        let slot = &mut self.squares[pos.rank as usize][pos.file as usize];
        if *slot == piece {
            return Ok(());
        }
        *slot = piece;
        Ok(())
    }

    pub(crate) fn squares(&self) -> &Squares {
        &self.squares
    }

    pub fn player(&self, color: Color) -> &Player {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn player_mut(&mut self, color: Color) -> &mut Player {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// All destinations the piece at `from` may legally move to. Empty for
    /// a vacant square, a finished game, or while a promotion is pending.
    pub fn legal_moves(&self, from: Position) -> Vec<Position> {
        if self.finished || self.pending_promotion.is_some() {
            return Vec::new();
        }
        movement::legal_moves(self, from)
    }

    /// Check if the player of the given color is in check.
    pub fn in_check(&self, color: Color) -> bool {
        movement::in_check(&self.squares, color)
    }

    /// Execute the move `from` -> `to` for the side to move.
    ///
    /// Rejects with [`ChessError::IllegalMove`] when the game is over, a
    /// promotion is pending, the source square is empty or holds the
    /// opponent's piece, or the destination is not in the piece's legal
    /// set. A rejected move leaves the board completely unmodified.
    ///
    /// A castling request (the king moving two files) relocates the rook as
    /// a sub-move first; only the king's own move completes the turn.
    pub fn make_move(&mut self, from: Position, to: Position) -> Result<()> {
        if self.finished {
            return Err(ChessError::IllegalMove("The game is over".to_string()));
        }
        if self.pending_promotion.is_some() {
            return Err(ChessError::IllegalMove(
                "A pawn promotion is pending".to_string(),
            ));
        }
        let piece = match self.piece_at(from) {
            Some(piece) => *piece,
            None => {
                return Err(ChessError::IllegalMove(format!("No piece at {from}")));
            }
        };
        if piece.color != self.turn {
            return Err(ChessError::IllegalMove(format!(
                "It is {}'s turn",
                self.turn
            )));
        }
        if !movement::legal_moves(self, from).contains(&to) {
            return Err(ChessError::IllegalMove(format!(
                "{from}{to} is not a legal move"
            )));
        }

        // Castling: relocate the rook as a sub-move before the king's own
        // move is finalized.
        if piece.piece_type == PieceType::King && from.file.abs_diff(to.file) == 2 {
            let (rook_from, rook_to) = if to.file < from.file {
                (
                    Position::new_unchecked(0, from.rank),
                    Position::new_unchecked(3, from.rank),
                )
            } else {
                (
                    Position::new_unchecked(7, from.rank),
                    Position::new_unchecked(5, from.rank),
                )
            };
            debug!(%rook_from, %rook_to, "castling rook sub-move");
            self.execute_move(rook_from, rook_to, true);
        }

        self.execute_move(from, to, false);
        Ok(())
    }

    /// Relocate a piece and update all bookkeeping. A castle sub-move (the
    /// rook half of a castle) neither logs, updates counters, flips the
    /// turn, nor triggers terminal-state evaluation.
    fn execute_move(&mut self, from: Position, to: Position, is_castle_submove: bool) {
        let Some(mut piece) = self.squares[from.rank as usize][from.file as usize] else {
            return;
        };
        let mut captured = self.squares[to.rank as usize][to.file as usize].is_some();

        // A pawn sliding diagonally onto an empty square is capturing en
        // passant; legality was established during enumeration.
        let is_en_passant =
            piece.piece_type == PieceType::Pawn && from.file != to.file && !captured;

        self.disable_castling_rights(&piece, from, to);

        if is_en_passant {
            piece.set_made_en_passant(true);
            let victim = Position::new_unchecked(to.file, from.rank);
            self.squares[victim.rank as usize][victim.file as usize] = None;
            captured = true;
            debug!(%from, %to, %victim, "en passant capture");
        }

        piece.bump_move_count();
        self.squares[from.rank as usize][from.file as usize] = None;
        self.squares[to.rank as usize][to.file as usize] = Some(piece);
        self.last_moved = Some(to);

        if !is_castle_submove {
            self.moves.push(Move::new_unchecked(from, to, None));
            if piece.piece_type == PieceType::Pawn || captured {
                self.halfmove_clock = 0;
            } else {
                self.halfmove_clock += 1;
            }
            if piece.color == Color::Black {
                self.fullmove_number += 1;
            }
            self.turn = piece.color.opposite();
            debug!(%from, %to, turn = %self.turn, "move executed");
        }

        // A pawn on the far rank suspends the game until the replacement
        // piece is chosen.
        if piece.piece_type == PieceType::Pawn {
            let far_rank = if piece.color.direction() > 0 { 7 } else { 0 };
            if to.rank == far_rank {
                self.pending_promotion = Some(to);
                debug!(%to, "promotion pending");
                return;
            }
        }

        if !is_castle_submove {
            self.evaluate_terminal();
        }
    }

    /// Disable castling rights as a consequence of this move: a king move
    /// drops both rights, a corner rook's first move drops its wing, and
    /// capturing a never-moved corner rook drops the victim's wing.
    fn disable_castling_rights(&mut self, piece: &Piece, from: Position, to: Position) {
        match piece.piece_type {
            PieceType::King => self.player_mut(piece.color).disable_castling(),
            PieceType::Rook if !piece.has_moved() => {
                if let Some(side) = Self::corner_side(from) {
                    self.player_mut(piece.color).set_castling(side, false);
                }
            }
            _ => {}
        }

        if let Some(victim) = self.squares[to.rank as usize][to.file as usize] {
            if victim.piece_type == PieceType::Rook && !victim.has_moved() {
                if let Some(side) = Self::corner_side(to) {
                    self.player_mut(victim.color).set_castling(side, false);
                }
            }
        }
    }

    fn corner_side(pos: Position) -> Option<CastleSide> {
        match pos.file {
            0 => Some(CastleSide::Queen),
            7 => Some(CastleSide::King),
            _ => None,
        }
    }

    /// Replace the pawn awaiting promotion with the chosen variant, then
    /// evaluate the terminal state that was suspended by the promotion.
    pub fn promote(&mut self, choice: PieceType) -> Result<()> {
        let pos = match self.pending_promotion {
            Some(pos) => pos,
            None => {
                return Err(ChessError::IllegalMove(
                    "No promotion is pending".to_string(),
                ));
            }
        };
        if !PieceType::PROMOTION_CHOICES.contains(&choice) {
            return Err(ChessError::IllegalMove(format!(
                "Pawns promote to queen, rook, bishop or knight, not {choice}"
            )));
        }

        let color = match self.squares[pos.rank as usize][pos.file as usize] {
            Some(pawn) => pawn.color,
            None => {
                return Err(ChessError::IllegalMove(
                    "No pawn awaiting promotion".to_string(),
                ));
            }
        };
        self.squares[pos.rank as usize][pos.file as usize] = Some(Piece::new(choice, color));
        self.pending_promotion = None;
        info!(%pos, %choice, "pawn promoted");

        self.evaluate_terminal();
        Ok(())
    }

    /// Decide whether the game just ended for the player now to act:
    /// checkmate, then stalemate, then the 50-move draw. The first match
    /// latches the finished flag and message permanently.
    fn evaluate_terminal(&mut self) {
        if self.finished {
            return;
        }

        let player = self.turn;
        let in_check = self.in_check(player);
        let has_move = movement::has_any_legal_move(self, player);

        if in_check && !has_move {
            self.finished = true;
            self.game_message = format!("{player} got checkmated.");
            info!(loser = %player, "checkmate");
        } else if !in_check && !has_move {
            self.finished = true;
            self.game_message = format!("{player} got stalemated. Draw!");
            info!(%player, "stalemate");
        } else if self.halfmove_clock >= 50 {
            self.finished = true;
            self.game_message = "The game resulted in a draw.".to_string();
            info!("draw by inactivity");
        }
    }

    /// Get the current active color (player to move).
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn set_turn(&mut self, color: Color) {
        self.turn = color;
    }

    /// Get the current halfmove clock (moves since the last pawn move or
    /// capture).
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    pub fn set_halfmove_clock(&mut self, value: u16) {
        self.halfmove_clock = value;
    }

    /// Get the current fullmove number (increments after Black's move).
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    pub fn set_fullmove_number(&mut self, value: u16) {
        self.fullmove_number = value;
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    /// The latched end-of-game message; empty while the game is running.
    pub fn game_message(&self) -> &str {
        &self.game_message
    }

    /// The position of the piece that moved most recently.
    pub fn last_moved(&self) -> Option<Position> {
        self.last_moved
    }

    pub fn set_last_moved(&mut self, pos: Option<Position>) {
        self.last_moved = pos;
    }

    /// The square of the pawn awaiting promotion, if any.
    pub fn pending_promotion(&self) -> Option<Position> {
        self.pending_promotion
    }

    pub fn set_castling(&mut self, color: Color, side: CastleSide, allowed: bool) {
        self.player_mut(color).set_castling(side, allowed);
    }

    /// Remove all castling rights for both players.
    pub fn disable_castling(&mut self) {
        self.white.disable_castling();
        self.black.disable_castling();
    }

    /// The FEN castling field: both players' remaining rights, or "-".
    pub fn castling_rights(&self) -> String {
        let rights = format!(
            "{}{}",
            self.white.castling_rights(),
            self.black.castling_rights()
        );
        if rights.is_empty() {
            "-".to_string()
        } else {
            rights
        }
    }

    /// The moves made so far, numbered one full move per line, e.g.
    /// `"1. e2e4 | e7e5\n2. g1f3"`.
    pub fn moves_text(&self) -> String {
        let mut text = String::new();
        for (i, mv) in self.moves.iter().enumerate() {
            if i % 2 == 0 {
                text.push_str(&format!("{}. {}", i / 2 + 1, mv));
            } else {
                text.push_str(&format!(" | {}\n", mv));
            }
        }
        text
    }

    /// The move log as played, oldest first.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Display the board as ASCII art from White's perspective with
    /// coordinate labels, rank 8 at the top.
    pub fn to_ascii(&self) -> String {
        let mut result = String::new();

        result.push_str("  a b c d e f g h\n");

        for rank in (0..8).rev() {
            let rank_number = rank + 1;
            result.push_str(&format!("{rank_number} "));

            for file in 0..8 {
                let symbol = match self.squares[rank][file] {
                    Some(piece) => piece.to_char(),
                    None => '.',
                };
                result.push(symbol);
                if file < 7 {
                    result.push(' ');
                }
            }

            result.push_str(&format!(" {rank_number}\n"));
        }

        result.push_str("  a b c d e f g h");

        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
