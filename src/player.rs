use crate::piece::Color;

/// The two wings a king may castle to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

/// Per-color game state: castling rights and the forward direction of the
/// color's pawns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    color: Color,
    can_castle_kingside: bool,
    can_castle_queenside: bool,
}

impl Player {
    /// Create a new player with both castling rights available.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            can_castle_kingside: true,
            can_castle_queenside: true,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Forward direction of this player's pawns: +1 for White, -1 for Black.
    pub fn direction(&self) -> i8 {
        self.color.direction()
    }

    pub fn can_castle(&self, side: CastleSide) -> bool {
        match side {
            CastleSide::King => self.can_castle_kingside,
            CastleSide::Queen => self.can_castle_queenside,
        }
    }

    pub fn set_castling(&mut self, side: CastleSide, allowed: bool) {
        match side {
            CastleSide::King => self.can_castle_kingside = allowed,
            CastleSide::Queen => self.can_castle_queenside = allowed,
        }
    }

    /// Remove both castling rights (when the king moves).
    pub fn disable_castling(&mut self) {
        self.can_castle_kingside = false;
        self.can_castle_queenside = false;
    }

    /// This player's fragment of the FEN castling field: kingside letter
    /// before queenside, uppercase for White. Empty if neither right remains.
    pub fn castling_rights(&self) -> String {
        let mut rights = String::new();
        if self.can_castle_kingside {
            rights.push('k');
        }
        if self.can_castle_queenside {
            rights.push('q');
        }

        if self.color == Color::White {
            rights = rights.to_uppercase();
        }
        rights
    }
}
