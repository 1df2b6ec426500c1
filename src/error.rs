use thiserror::Error;

/// Errors surfaced by the chess engine. All of them are recoverable: the
/// board is left untouched by a rejected operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChessError {
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Illegal position: {0}")]
    IllegalPosition(String),

    #[error("Malformed FEN: {0}")]
    MalformedFen(String),
}

pub type Result<T> = std::result::Result<T, ChessError>;
