use crate::error::ChessError;
use crate::piece::{Color, PieceType};
use crate::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub promotion: Option<PieceType>,
}

impl Move {
    /// Create a new move with validation
    pub fn new(
        from: Position,
        to: Position,
        promotion: Option<PieceType>,
    ) -> Result<Self, ChessError> {
        // Validate that from != to
        if from == to {
            return Err(ChessError::IllegalMove(
                "Source and destination positions cannot be the same".to_string(),
            ));
        }

        // Validate promotion logic
        if let Some(piece_type) = promotion {
            if matches!(piece_type, PieceType::King | PieceType::Pawn) {
                return Err(ChessError::IllegalMove(
                    "Cannot promote to King or Pawn".to_string(),
                ));
            }
        }

        Ok(Self {
            from,
            to,
            promotion,
        })
    }

    /// Create a new move without validation (for internal use when validity
    /// is guaranteed)
    pub const fn new_unchecked(from: Position, to: Position, promotion: Option<PieceType>) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }

    /// Create a simple move without promotion
    pub fn simple(from: Position, to: Position) -> Result<Self, ChessError> {
        Self::new(from, to, None)
    }

    /// Check if this is a promotion move
    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Check if this is a castling move (king moves two squares horizontally)
    pub fn is_castling(&self) -> bool {
        (self.from.rank == self.to.rank) && (self.from.file.abs_diff(self.to.file) == 2)
    }

    /// Parse a move string with color context for proper castling
    /// disambiguation
    pub fn from_str_with_color(s: &str, color: Color) -> Result<Self, ChessError> {
        let s = s.trim();

        // Handle special castling moves with color context
        match s.to_uppercase().as_str() {
            "O-O" | "0-0" => {
                // Kingside castling with proper color-based rank
                let rank = match color {
                    Color::White => 0, // rank 1 (e1, g1)
                    Color::Black => 7, // rank 8 (e8, g8)
                };
                return Ok(Move::new_unchecked(
                    Position::new_unchecked(4, rank), // e1 or e8
                    Position::new_unchecked(6, rank), // g1 or g8
                    None,
                ));
            }
            "O-O-O" | "0-0-0" => {
                // Queenside castling with proper color-based rank
                let rank = match color {
                    Color::White => 0, // rank 1 (e1, c1)
                    Color::Black => 7, // rank 8 (e8, c8)
                };
                return Ok(Move::new_unchecked(
                    Position::new_unchecked(4, rank), // e1 or e8
                    Position::new_unchecked(2, rank), // c1 or c8
                    None,
                ));
            }
            _ => {} // Continue with standard parsing
        }

        // Basic move format (e2e4)
        if s.len() == 4 && s.is_ascii() {
            let from = s[0..2].parse::<Position>()?;
            let to = s[2..4].parse::<Position>()?;

            return Self::new(from, to, None);
        }
        // Move with promotion (e7e8q)
        else if s.len() == 5 && s.is_ascii() {
            let from = s[0..2].parse::<Position>()?;
            let to = s[2..4].parse::<Position>()?;
            let promotion = s[4..5].parse::<PieceType>()?;

            return Self::new(from, to, Some(promotion));
        }

        Err(ChessError::IllegalMove(format!(
            "Invalid move format '{s}'. Expected 'e2e4', 'e7e8q' for promotion, or 'O-O'/'O-O-O' for castling."
        )))
    }
}

// Implement Display for algebraic notation
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion)?;
        }
        Ok(())
    }
}

// Implement FromStr for parsing algebraic move notation
impl FromStr for Move {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Default to White for backward compatibility
        // Note: For castling moves, this assumes White. Use
        // from_str_with_color() for proper color context.
        Self::from_str_with_color(s, Color::White)
    }
}
