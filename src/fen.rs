//! FEN (Forsyth-Edwards Notation) codec: board <-> text, the canonical
//! default start, single-line `.fen` file helpers, and the shuffled
//! back-rank start generator.

use crate::board::Board;
use crate::error::{ChessError, Result};
use crate::piece::{Color, Piece};
use crate::player::CastleSide;
use crate::position::Position;
use rand::seq::SliceRandom;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The standard chess starting position.
pub const DEFAULT_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// File extension for saved positions.
pub const FEN_EXTENSION: &str = "fen";

const BACK_RANK: &str = "rnbqkbnr";
const SHUFFLE_ATTEMPTS: usize = 1000;

/// Parse a FEN string into a board.
///
/// FEN format: piece_placement active_color castling_rights en_passant
/// halfmove fullmove. The en passant field is accepted but not
/// reconstructed into board state; the capture window is tracked through
/// the last-moved piece instead.
pub fn board_from_fen(text: &str) -> Result<Board> {
    let text = text.trim();
    let parts: Vec<&str> = text.split_whitespace().collect();

    if parts.len() != 6 {
        return Err(ChessError::MalformedFen(format!(
            "FEN must have exactly 6 fields (piece_placement active_color castling_rights en_passant halfmove fullmove), found {}",
            parts.len()
        )));
    }
    let [placement, active_color, castling, en_passant, halfmove_str, fullmove_str] =
        parts.as_slice()
    else {
        unreachable!()
    };

    let mut board = Board::empty();
    parse_placement(&mut board, placement)?;

    match *active_color {
        "w" => board.set_turn(Color::White),
        "b" => board.set_turn(Color::Black),
        _ => {
            return Err(ChessError::MalformedFen(format!(
                "Invalid active color '{active_color}' (must be 'w' or 'b')"
            )));
        }
    }

    board.disable_castling();
    if *castling != "-" {
        for c in castling.chars() {
            let (color, side) = match c {
                'K' => (Color::White, CastleSide::King),
                'Q' => (Color::White, CastleSide::Queen),
                'k' => (Color::Black, CastleSide::King),
                'q' => (Color::Black, CastleSide::Queen),
                _ => {
                    return Err(ChessError::MalformedFen(format!(
                        "Invalid castling rights character '{c}' (valid: K, Q, k, q, or - for none)"
                    )));
                }
            };
            board.set_castling(color, side, true);
        }
    }

    // Validated for shape only; the window is not reconstructed.
    if *en_passant != "-" {
        en_passant.parse::<Position>().map_err(|_| {
            ChessError::MalformedFen(format!(
                "Invalid en passant target '{en_passant}' (expected a square like 'e3' or '-')"
            ))
        })?;
    }

    let halfmove = halfmove_str.parse::<u16>().map_err(|_| {
        ChessError::MalformedFen(format!(
            "Invalid halfmove clock '{halfmove_str}' (must be a non-negative integer)"
        ))
    })?;
    board.set_halfmove_clock(halfmove);

    let fullmove = fullmove_str.parse::<u16>().map_err(|_| {
        ChessError::MalformedFen(format!(
            "Invalid fullmove number '{fullmove_str}' (must be a positive integer)"
        ))
    })?;
    board.set_fullmove_number(fullmove);

    debug!(fen = %text, "parsed FEN");
    Ok(board)
}

/// Parse the piece placement field (8 `/`-separated ranks, top first) onto
/// an empty board.
fn parse_placement(board: &mut Board, placement: &str) -> Result<()> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessError::MalformedFen(format!(
            "Piece placement must have exactly 8 ranks separated by '/', found {}",
            ranks.len()
        )));
    }

    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_idx as u8;
        let fen_rank_number = 8 - rank_idx;
        let mut file: u8 = 0;

        for c in rank_str.chars() {
            if file >= 8 {
                return Err(ChessError::MalformedFen(format!(
                    "Rank {fen_rank_number} has more than 8 squares"
                )));
            }
            if let Some(digit) = c.to_digit(10) {
                if digit == 0 || digit > 8 {
                    return Err(ChessError::MalformedFen(format!(
                        "Invalid empty square count '{c}' in rank {fen_rank_number} (must be 1-8)"
                    )));
                }
                file += digit as u8;
                if file > 8 {
                    return Err(ChessError::MalformedFen(format!(
                        "Empty square count '{c}' in rank {fen_rank_number} exceeds 8 squares"
                    )));
                }
            } else {
                let piece = Piece::from_char(c)?;
                board.set_piece(Position::new_unchecked(file, rank), Some(piece))?;
                file += 1;
            }
        }

        if file != 8 {
            return Err(ChessError::MalformedFen(format!(
                "Rank {fen_rank_number} must represent exactly 8 squares, found {file}"
            )));
        }
    }

    Ok(())
}

/// Serialize the board to FEN: run-length piece placement rank 8 down to
/// rank 1, side to move, castling rights, a literal "-" for the en passant
/// field, then the two counters.
pub fn board_to_fen(board: &Board) -> String {
    let placement = generate_placement(board);
    let active_color = match board.turn() {
        Color::White => 'w',
        Color::Black => 'b',
    };
    let castling = board.castling_rights();
    let halfmove = board.halfmove_clock();
    let fullmove = board.fullmove_number();

    format!("{placement} {active_color} {castling} - {halfmove} {fullmove}")
}

fn generate_placement(board: &Board) -> String {
    let mut ranks = Vec::with_capacity(8);

    for rank in (0..8).rev() {
        let mut rank_string = String::new();
        let mut empty_count = 0;

        for file in 0..8 {
            match board.piece_at(Position::new_unchecked(file, rank)) {
                Some(piece) => {
                    if empty_count > 0 {
                        rank_string.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    rank_string.push(piece.to_char());
                }
                None => empty_count += 1,
            }
        }
        if empty_count > 0 {
            rank_string.push_str(&empty_count.to_string());
        }

        ranks.push(rank_string);
    }

    ranks.join("/")
}

/// Read the first line of a `.fen` file. A missing file surfaces as an
/// ordinary [`io::Error`] for the caller to recover from.
pub fn read_fen_file(path: &Path) -> io::Result<String> {
    let content = fs::read_to_string(path)?;
    Ok(content.lines().next().unwrap_or_default().trim().to_string())
}

/// Write a FEN string as a single-line file, appending the `.fen`
/// extension if the path lacks it. Returns the path actually written.
pub fn write_fen_file(path: &Path, fen: &str) -> io::Result<PathBuf> {
    let path = if path.extension().is_some_and(|ext| ext == FEN_EXTENSION) {
        path.to_path_buf()
    } else {
        path.with_extension(FEN_EXTENSION)
    };
    fs::write(&path, format!("{fen}\n"))?;
    Ok(path)
}

/// Generate a starting FEN with a randomized back rank: bishops on opposite
/// square colors and the king strictly between the rooks. Black's rank is
/// mirrored for White, neither side may castle, and White is to move. Falls
/// back to the canonical order if no legal permutation appears within the
/// retry bound.
pub fn shuffled_start_fen() -> String {
    let mut rng = rand::thread_rng();
    let mut chars: Vec<char> = BACK_RANK.chars().collect();
    let mut placement = BACK_RANK.to_string();

    for _ in 0..SHUFFLE_ATTEMPTS {
        chars.shuffle(&mut rng);
        let candidate: String = chars.iter().collect();
        if legal_back_rank(&candidate) {
            placement = candidate;
            break;
        }
    }

    let mirrored = placement.to_uppercase();
    format!("{placement}/pppppppp/8/8/8/8/PPPPPPPP/{mirrored} w - - 0 1")
}

/// Whether a full FEN string describes a legal shuffled start: 8 ranks,
/// with both back ranks satisfying the placement rules.
pub fn is_legal_shuffled(fen: &str) -> bool {
    let Some(placement) = fen.split_whitespace().next() else {
        return false;
    };
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return false;
    }
    legal_back_rank(ranks[0]) && legal_back_rank(&ranks[7].to_lowercase())
}

/// The back-rank placement rules: exactly the standard piece set, bishops
/// on opposite square colors (file indices summing odd), king strictly
/// between the rooks.
fn legal_back_rank(rank: &str) -> bool {
    let chars: Vec<char> = rank.chars().collect();
    if chars.len() != 8 {
        return false;
    }

    for (c, expected) in [('r', 2), ('n', 2), ('b', 2), ('q', 1), ('k', 1)] {
        if chars.iter().filter(|&&x| x == c).count() != expected {
            return false;
        }
    }

    let position = |c| chars.iter().position(|&x| x == c);
    let rposition = |c| chars.iter().rposition(|&x| x == c);
    let (Some(king), Some(bishop1), Some(bishop2), Some(rook1), Some(rook2)) = (
        position('k'),
        position('b'),
        rposition('b'),
        position('r'),
        rposition('r'),
    ) else {
        return false;
    };

    if (bishop1 + bishop2) % 2 != 1 {
        return false;
    }
    rook1 < king && king < rook2
}
