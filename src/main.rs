use anyhow::Result;
use clap::Parser;
use gambit::board::Board;
use gambit::cli::{self, Cli, Commands};
use gambit::fen;
use tracing::warn;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let board = match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => Board::new(),
        Commands::Fen { fen: text } => board_or_default(&text),
        Commands::Load { path } => match fen::read_fen_file(&path) {
            Ok(text) => board_or_default(&text),
            Err(e) => {
                warn!("Could not read {}: {e}. Using the default start.", path.display());
                Board::new()
            }
        },
        Commands::Shuffled => Board::from_fen(&fen::shuffled_start_fen())?,
    };

    cli::run(board)
}

/// A board parsed from the FEN text, or the default starting position if
/// the text does not parse.
fn board_or_default(text: &str) -> Board {
    match Board::from_fen(text) {
        Ok(board) => board,
        Err(e) => {
            warn!("{e}. Using the default start.");
            Board::new()
        }
    }
}
