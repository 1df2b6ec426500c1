use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gambit")]
#[command(about = "A terminal chess board driven by the gambit rules engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play from the standard starting position
    Play,

    /// Play from an explicit FEN string
    ///
    /// Falls back to the standard starting position if the string does not
    /// parse.
    ///
    /// Example: gambit fen "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    Fen {
        /// The position in Forsyth-Edwards Notation
        fen: String,
    },

    /// Play from a single-line .fen file
    ///
    /// Falls back to the standard starting position if the file is missing
    /// or does not parse.
    Load {
        /// Path to the .fen file
        path: PathBuf,
    },

    /// Play from a randomized shuffled back rank
    Shuffled,
}
