//! Move geometry for every piece variant, the threat detector used for
//! check queries, and the king-safety filter that trims geometric reach
//! down to genuinely legal destinations.
//!
//! Threat queries operate on a plain grid so the safety filter can probe a
//! copied snapshot instead of mutating the live board.

use crate::board::{Board, Squares};
use crate::piece::{Color, Piece, PieceType};
use crate::player::CastleSide;
use crate::position::Position;

const ORTHOGONALS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

fn at(squares: &Squares, pos: Position) -> Option<Piece> {
    squares[pos.rank as usize][pos.file as usize]
}

/// All destinations the piece at `from` may legally move to: geometric
/// reach filtered so no destination leaves the mover's own king in check.
/// Empty for a vacant square.
pub(crate) fn legal_moves(board: &Board, from: Position) -> Vec<Position> {
    let Some(&piece) = board.piece_at(from) else {
        return Vec::new();
    };

    // The king filters its own candidates; castling needs board state
    // beyond the grid.
    if piece.piece_type == PieceType::King {
        return king_moves(board, from, piece);
    }

    let squares = board.squares();
    let candidates = match piece.piece_type {
        PieceType::Knight => knight_candidates(squares, from, piece.color),
        PieceType::Bishop => sliding_candidates(squares, from, piece.color, &DIAGONALS),
        PieceType::Rook => sliding_candidates(squares, from, piece.color, &ORTHOGONALS),
        PieceType::Queen => {
            let mut moves = sliding_candidates(squares, from, piece.color, &ORTHOGONALS);
            moves.extend(sliding_candidates(squares, from, piece.color, &DIAGONALS));
            moves
        }
        PieceType::Pawn => pawn_candidates(board, from, piece),
        PieceType::King => unreachable!(),
    };

    candidates
        .into_iter()
        .filter(|&to| !exposes_king(squares, from, to, piece.color))
        .collect()
}

/// Whether any piece owned by `color` has at least one legal move.
pub(crate) fn has_any_legal_move(board: &Board, color: Color) -> bool {
    Position::all_positions().any(|pos| {
        matches!(board.piece_at(pos), Some(piece) if piece.color == color)
            && !legal_moves(board, pos).is_empty()
    })
}

/// Whether `color` is in check on the given grid. A grid holding no king of
/// that color reports false, which lets sparse test positions probe freely.
pub(crate) fn in_check(squares: &Squares, color: Color) -> bool {
    match find_king(squares, color) {
        Some(king_pos) => square_attacked(squares, king_pos, color.opposite()),
        None => false,
    }
}

/// Whether moving `from` -> `to` would leave the mover's own king
/// attacked. Probes a copy of the grid: the piece vacates its source and
/// lands on the candidate square (capturing whatever is there), and the
/// king square is then tested. The live grid is never touched.
pub(crate) fn exposes_king(squares: &Squares, from: Position, to: Position, color: Color) -> bool {
    let mut probe = *squares;
    probe[to.rank as usize][to.file as usize] = probe[from.rank as usize][from.file as usize].take();
    in_check(&probe, color)
}

fn find_king(squares: &Squares, color: Color) -> Option<Position> {
    Position::all_positions().find(|&pos| {
        matches!(at(squares, pos), Some(piece) if piece.piece_type == PieceType::King && piece.color == color)
    })
}

/// Whether any piece of `by` geometrically attacks `target`. Ignores the
/// king-safety filter entirely; this is the reach used for check detection.
pub(crate) fn square_attacked(squares: &Squares, target: Position, by: Color) -> bool {
    Position::all_positions().any(|pos| match at(squares, pos) {
        Some(piece) if piece.color == by => threatens(squares, pos, piece, target),
        _ => false,
    })
}

/// Geometric attack reach of the piece at `from`, independent of whose king
/// ends up where. Pawns threaten their two forward diagonals whether or not
/// the squares are occupied.
fn threatens(squares: &Squares, from: Position, piece: Piece, target: Position) -> bool {
    match piece.piece_type {
        PieceType::Knight => KNIGHT_OFFSETS
            .iter()
            .any(|&(df, dr)| from.offset(df, dr) == Some(target)),
        PieceType::King => KING_OFFSETS
            .iter()
            .any(|&(df, dr)| from.offset(df, dr) == Some(target)),
        PieceType::Pawn => {
            let dir = piece.color.direction();
            from.offset(-1, dir) == Some(target) || from.offset(1, dir) == Some(target)
        }
        PieceType::Bishop => ray_reaches(squares, from, target, &DIAGONALS),
        PieceType::Rook => ray_reaches(squares, from, target, &ORTHOGONALS),
        PieceType::Queen => {
            ray_reaches(squares, from, target, &ORTHOGONALS)
                || ray_reaches(squares, from, target, &DIAGONALS)
        }
    }
}

/// Walk each ray outward from `from`, stopping at the first occupied square
/// regardless of ownership. True if `target` lies on a ray at or before the
/// first blocker.
fn ray_reaches(squares: &Squares, from: Position, target: Position, directions: &[(i8, i8)]) -> bool {
    for &(df, dr) in directions {
        let mut current = from;
        while let Some(next) = current.offset(df, dr) {
            if next == target {
                return true;
            }
            if at(squares, next).is_some() {
                break;
            }
            current = next;
        }
    }
    false
}

fn knight_candidates(squares: &Squares, from: Position, color: Color) -> Vec<Position> {
    KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(df, dr)| from.offset(df, dr))
        .filter(|&to| !matches!(at(squares, to), Some(other) if other.color == color))
        .collect()
}

/// Shared walker for the sliding pieces. For each direction: stop without
/// adding on a friendly piece, add and stop on an enemy piece, add and
/// continue through empty squares.
fn sliding_candidates(
    squares: &Squares,
    from: Position,
    color: Color,
    directions: &[(i8, i8)],
) -> Vec<Position> {
    let mut moves = Vec::new();
    for &(df, dr) in directions {
        let mut current = from;
        while let Some(next) = current.offset(df, dr) {
            match at(squares, next) {
                None => moves.push(next),
                Some(other) => {
                    if other.color != color {
                        moves.push(next);
                    }
                    break;
                }
            }
            current = next;
        }
    }
    moves
}

fn pawn_candidates(board: &Board, from: Position, pawn: Piece) -> Vec<Position> {
    let squares = board.squares();
    let dir = pawn.color.direction();
    let mut moves = Vec::new();

    if let Some(one) = from.offset(0, dir) {
        if at(squares, one).is_none() {
            moves.push(one);
            // Two forward only from the starting square, through an empty
            // intermediate.
            if !pawn.has_moved() {
                if let Some(two) = from.offset(0, 2 * dir) {
                    if at(squares, two).is_none() {
                        moves.push(two);
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let Some(diag) = from.offset(df, dir) else {
            continue;
        };
        match at(squares, diag) {
            Some(other) => {
                if other.color != pawn.color {
                    moves.push(diag);
                }
            }
            None => {
                // En passant: the square behind the empty destination holds
                // a pawn that just made its first, two-square advance.
                let behind = Position::new_unchecked(diag.file, from.rank);
                let capturable = matches!(
                    at(squares, behind),
                    Some(other) if other.piece_type == PieceType::Pawn && other.move_count() == 1
                );
                if capturable && board.last_moved() == Some(behind) {
                    moves.push(diag);
                }
            }
        }
    }

    moves
}

/// The king's eight adjacent squares plus any castling destinations, all
/// filtered through the safety probe (the king vacates its source square
/// before each probe, so it never blocks its own attack line).
fn king_moves(board: &Board, from: Position, king: Piece) -> Vec<Position> {
    let squares = board.squares();
    let mut moves: Vec<Position> = KING_OFFSETS
        .iter()
        .filter_map(|&(df, dr)| from.offset(df, dr))
        .filter(|&to| !matches!(at(squares, to), Some(other) if other.color == king.color))
        .filter(|&to| !exposes_king(squares, from, to, king.color))
        .collect();

    if !in_check(squares, king.color) {
        for (side, corner_file, step) in [
            (CastleSide::King, 7u8, 1i8),
            (CastleSide::Queen, 0u8, -1i8),
        ] {
            if let Some(to) = castle_destination(board, from, king, side, corner_file, step) {
                moves.push(to);
            }
        }
    }

    moves
}

/// Castling eligibility for one wing: the right is retained, a never-moved
/// friendly rook stands on the corner, every square strictly between king
/// and rook is empty, and both transit squares survive the safety probe.
fn castle_destination(
    board: &Board,
    from: Position,
    king: Piece,
    side: CastleSide,
    corner_file: u8,
    step: i8,
) -> Option<Position> {
    if !board.player(king.color).can_castle(side) {
        return None;
    }

    let squares = board.squares();
    let corner = Position::new_unchecked(corner_file, from.rank);
    match at(squares, corner) {
        Some(rook)
            if rook.piece_type == PieceType::Rook
                && rook.color == king.color
                && !rook.has_moved() => {}
        _ => return None,
    }

    let (low, high) = if corner_file < from.file {
        (corner_file + 1, from.file - 1)
    } else {
        (from.file + 1, corner_file - 1)
    };
    for file in low..=high {
        if at(squares, Position::new_unchecked(file, from.rank)).is_some() {
            return None;
        }
    }

    let one = from.offset(step, 0)?;
    let two = from.offset(2 * step, 0)?;
    if at(squares, one).is_some() || at(squares, two).is_some() {
        return None;
    }
    if exposes_king(squares, from, one, king.color) || exposes_king(squares, from, two, king.color)
    {
        return None;
    }

    Some(two)
}
