//! Line-oriented driver for the engine: prints the board, reads moves and
//! queries from stdin, and handles the promotion prompt. This is the whole
//! presentation layer; every rule lives in the engine.

use crate::board::Board;
use crate::moves::Move;
use crate::piece::PieceType;
use crate::position::Position;
use anyhow::Result;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Run the interactive loop until the game ends or the player quits.
pub fn run(mut board: Board) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("{}", board.to_ascii());
    println!("{} to move. Type 'help' for commands.", board.turn());

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        match command {
            "quit" | "exit" => break,
            "help" => print_help(),
            "board" => println!("{}", board.to_ascii()),
            "fen" => println!("{}", board.to_fen()),
            "moves" => print!("{}", board.moves_text()),
            "legal" => match rest.parse::<Position>() {
                Ok(pos) => {
                    let legal = board.legal_moves(pos);
                    if legal.is_empty() {
                        println!("No legal moves from {pos}.");
                    } else {
                        let squares: Vec<String> =
                            legal.iter().map(|p| p.to_string()).collect();
                        println!("{}", squares.join(" "));
                    }
                }
                Err(e) => println!("{e}"),
            },
            "save" => {
                if rest.is_empty() {
                    println!("Usage: save <path>");
                } else {
                    match crate::fen::write_fen_file(rest.as_ref(), &board.to_fen()) {
                        Ok(path) => println!("Saved to {}.", path.display()),
                        Err(e) => println!("Could not save: {e}"),
                    }
                }
            }
            "move" => apply_move(&mut board, rest, &mut lines)?,
            // A bare move like "e2e4" works without the keyword.
            _ => apply_move(&mut board, input, &mut lines)?,
        }

        if board.finished() {
            println!("{}", board.to_ascii());
            println!("{}", board.game_message());
            print!("{}", board.moves_text());
            break;
        }
    }

    Ok(())
}

fn apply_move(
    board: &mut Board,
    input: &str,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    let mv = match Move::from_str_with_color(input, board.turn()) {
        Ok(mv) => mv,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };

    match board.make_move(mv.from, mv.to) {
        Ok(()) => {
            if board.pending_promotion().is_some() {
                let choice = prompt_promotion(mv.promotion, lines)?;
                board.promote(choice)?;
                println!("Promoted to {choice}.");
            }
            println!("{}", board.to_ascii());
            if !board.finished() {
                println!("{} to move.", board.turn());
            }
        }
        Err(e) => println!("{e}"),
    }

    Ok(())
}

/// Ask for the replacement piece. An unrecognized or empty answer falls
/// back to a queen.
fn prompt_promotion(
    preselected: Option<PieceType>,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<PieceType> {
    if let Some(choice) = preselected.filter(|c| PieceType::PROMOTION_CHOICES.contains(c)) {
        return Ok(choice);
    }

    print!("Promote to (queen/rook/bishop/knight) [queen]: ");
    io::stdout().flush()?;

    let answer = match lines.next() {
        Some(line) => line?,
        None => String::new(),
    };
    let choice = answer
        .trim()
        .parse::<PieceType>()
        .ok()
        .filter(|c| PieceType::PROMOTION_CHOICES.contains(c))
        .unwrap_or(PieceType::Queen);
    debug!(%choice, "promotion choice");
    Ok(choice)
}

fn print_help() {
    println!("Commands:");
    println!("  <move>        make a move: e2e4, e7e8q, O-O, O-O-O");
    println!("  legal <sq>    list legal destinations for the piece on <sq>");
    println!("  board         redraw the board");
    println!("  fen           print the current position as FEN");
    println!("  moves         print the move log");
    println!("  save <path>   save the position to a .fen file");
    println!("  quit          leave the game");
}
