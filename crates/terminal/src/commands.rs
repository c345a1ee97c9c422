//! Parsing of the lines typed at the prompt

use chess_session::Square;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pick up the piece on `from` and drop it on `to`
    Drop { from: Square, to: Square },
    Undo,
    NewGame,
    Resize,
    Fen,
    State,
    Moves,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command {0:?}, type `help` for a list")]
    Unknown(String),

    #[error(transparent)]
    Square(#[from] chess_session::ParseError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim().to_ascii_lowercase();
        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts.as_slice() {
            [] => Err(CommandError::Empty),
            ["undo" | "u"] => Ok(Command::Undo),
            ["new" | "n"] => Ok(Command::NewGame),
            ["resize"] => Ok(Command::Resize),
            ["fen"] => Ok(Command::Fen),
            ["state"] => Ok(Command::State),
            ["moves"] => Ok(Command::Moves),
            ["help" | "?"] => Ok(Command::Help),
            ["quit" | "exit" | "q"] => Ok(Command::Quit),
            [mv] if mv.len() == 4 && mv.is_ascii() => Ok(Command::Drop {
                from: mv[0..2].parse()?,
                to: mv[2..4].parse()?,
            }),
            [from, to] => Ok(Command::Drop {
                from: from.parse()?,
                to: to.parse()?,
            }),
            _ => Err(CommandError::Unknown(line.clone())),
        }
    }
}

pub const HELP: &str = "\
Commands:
  e2e4 | e2 e4   move a piece (pawns always promote to a queen)
  undo           take back your last move and the reply
  new            start a new game
  moves          list legal moves
  fen            print the current position
  state          print the session as JSON
  resize         redraw the board
  help           show this help
  quit           leave";
