use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    Event, Game, GameStatus, MoveReport, PendingSwap, Piece, Pools, Rejection, RulesEngine,
    Selection, Side, Square, SquareFromStrErr, TokenKind, TurnState,
};

/// An input from the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// A click on a board square, see [`Game::click_square()`].
    Click { square: Square },
    SelectPiece { square: Square },
    Move { to: Square },
    /// Choose the neutral token at this slot for the pending swap.
    SelectNeutralToken { slot: usize },
    /// Ask for a [`Snapshot`].
    Show,
    Quit,
}

impl Command {
    /// Runs a game action. Returns `None` for commands that do not act on
    /// the game.
    pub fn execute<R: RulesEngine>(&self, game: &mut Game<R>) -> Option<Result<Event, Rejection>> {
        match *self {
            Command::Click { square } => Some(game.click_square(square)),
            Command::SelectPiece { square } => Some(game.select_piece(square)),
            Command::Move { to } => Some(game.attempt_move(to)),
            Command::SelectNeutralToken { slot } => Some(game.select_neutral_slot(slot)),
            Command::Show | Command::Quit => None,
        }
    }
}

/// The error type for the [`FromStr`] instance of [`Command`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandFromStrErr {
    Empty,
    UnknownCommand(String),
    MissingArgument,
    TooManyArguments,
    InvalidSquare(SquareFromStrErr),
    InvalidSlot(String),
}

impl std::error::Error for CommandFromStrErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandFromStrErr::InvalidSquare(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for CommandFromStrErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandFromStrErr::Empty => write!(f, "No command given"),
            CommandFromStrErr::UnknownCommand(word) => write!(f, "Unknown command '{}'", word),
            CommandFromStrErr::MissingArgument => write!(f, "The command needs an argument"),
            CommandFromStrErr::TooManyArguments => write!(f, "The command got too many arguments"),
            CommandFromStrErr::InvalidSquare(err) => write!(f, "Invalid square: {}", err),
            CommandFromStrErr::InvalidSlot(slot) => write!(f, "Invalid token slot '{}'", slot),
        }
    }
}

/// Parses the terse text form used by the interactive driver.
///
/// ```
/// # use token_chess::{square, Command};
/// assert_eq!("e2".parse(), Ok(Command::Click { square: square!("e2") }));
/// assert_eq!("move e4".parse(), Ok(Command::Move { to: square!("e4") }));
/// assert_eq!("neutral 2".parse(), Ok(Command::SelectNeutralToken { slot: 2 }));
/// ```
impl FromStr for Command {
    type Err = CommandFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let first = words.next().ok_or(CommandFromStrErr::Empty)?;
        let argument = words.next();
        if words.next().is_some() {
            return Err(CommandFromStrErr::TooManyArguments);
        }
        let square_arg = || -> Result<Square, CommandFromStrErr> {
            argument
                .ok_or(CommandFromStrErr::MissingArgument)?
                .parse()
                .map_err(CommandFromStrErr::InvalidSquare)
        };
        let command = match first.to_ascii_lowercase().as_str() {
            "show" | "board" => Command::Show,
            "quit" | "exit" => Command::Quit,
            "click" => Command::Click { square: square_arg()? },
            "select" => Command::SelectPiece { square: square_arg()? },
            "move" | "to" => Command::Move { to: square_arg()? },
            "neutral" | "swap" => {
                let slot = argument.ok_or(CommandFromStrErr::MissingArgument)?;
                Command::SelectNeutralToken {
                    slot: slot
                        .parse()
                        .map_err(|_| CommandFromStrErr::InvalidSlot(String::from(slot)))?,
                }
            }
            word => match (word.parse::<Square>(), argument) {
                (Ok(square), None) => Command::Click { square },
                (Ok(_), Some(_)) => return Err(CommandFromStrErr::TooManyArguments),
                (Err(_), _) => return Err(CommandFromStrErr::UnknownCommand(String::from(first))),
            },
        };
        Ok(command)
    }
}

/// A piece and where it stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub square: Square,
    pub piece: Piece,
}

/// Everything the presentation layer can query, in one value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub turn_state: TurnState,
    pub side_to_move: Side,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub selection: Option<Selection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub pending_swap: Option<PendingSwap>,
    pub pools: Pools,
    pub required_types: Vec<TokenKind>,
    /// Sorted from a8 to h1, row by row.
    pub board: Vec<PlacedPiece>,
    pub status: GameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub last_move: Option<MoveReport>,
}

impl Snapshot {
    pub fn of<R: RulesEngine>(game: &Game<R>) -> Self {
        let board = Square::all()
            .filter_map(|square| {
                game.rules()
                    .piece_at(square)
                    .map(|piece| PlacedPiece { square, piece })
            })
            .collect();
        Self {
            turn_state: game.turn_state(),
            side_to_move: game.side_to_move(),
            selection: game.selection().copied(),
            pending_swap: game.pending_swap().copied(),
            pools: game.pools().clone(),
            required_types: Vec::from_iter(game.required_types().kinds()),
            board,
            status: game.status(),
            last_move: game.last_move().copied(),
        }
    }
}

/// The answer to one [`Command`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ok { event: Event },
    Rejected { rejection: Rejection, message: String },
    Snapshot { snapshot: Box<Snapshot> },
    /// The input could not be understood at all.
    Error { message: String },
}

impl From<Result<Event, Rejection>> for Response {
    fn from(result: Result<Event, Rejection>) -> Self {
        match result {
            Ok(event) => Response::Ok { event },
            Err(rejection) => Response::Rejected {
                rejection,
                message: rejection.to_string(),
            },
        }
    }
}
