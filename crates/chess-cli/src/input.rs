//! Parsing of lines typed at the move prompt.

use chess_core::{Color, Notation, NotationError, PieceKind, Square};
use chess_rules::Board;
use thiserror::Error;

/// Errors for a line that cannot be turned into a command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid notation: {0}")]
    Notation(#[from] NotationError),

    /// The piece letter does not match what the player owns on the square.
    #[error("No/Invalid {piece} selected at {square}!")]
    WrongPiece { piece: PieceKind, square: Square },
}

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A move or castling request.
    Play(Notation),
    /// Save the game, optionally under a name given on the same line.
    Save(Option<String>),
    Help,
    Quit,
}

/// Parses a line of input.
pub fn parse_command(line: &str) -> Result<Command, InputError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        ":save" => {
            let name = (!rest.is_empty()).then(|| rest.to_string());
            Ok(Command::Save(name))
        }
        ":help" | "help" => Ok(Command::Help),
        ":quit" | ":q" | "quit" => Ok(Command::Quit),
        _ => Ok(Command::Play(Notation::parse(line)?)),
    }
}

/// Checks that the piece letter of a typed move names a piece `side` owns on
/// the origin square.
pub fn check_selection(board: &Board, side: Color, notation: &Notation) -> Result<(), InputError> {
    let Notation::Move { piece, from, .. } = *notation else {
        return Ok(());
    };
    match board.piece_at(from) {
        Some(found) if found.kind == piece && found.color == side => Ok(()),
        _ => Err(InputError::WrongPiece {
            piece,
            square: from,
        }),
    }
}
