use serde::{Deserialize, Serialize};

use crate::{PieceKind, Square, TokenRef};

/// Why an action was rejected by the [`Game`](crate::Game).
///
/// None of these are fatal. A rejected action never changes the pools or
/// the turn state; only [`Rejection::IllegalMove`] also drops the current
/// selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// The piece belongs to the side that is not on move, or any piece was
    /// selected while a neutral token has to be chosen.
    NotYourTurn,
    /// There is no piece on the selected square.
    EmptySquare { square: Square },
    /// The piece needs a token which its owner's pool does not have.
    NoTokenAvailable { kind: PieceKind },
    /// A destination was given without selecting a piece first.
    NoActiveSelection,
    /// The rules engine rejected the move.
    IllegalMove { from: Square, to: Square },
    /// A neutral token was chosen although no swap is pending.
    NotAwaitingSwap,
    /// The chosen token is not in the neutral pool.
    InvalidSwapTarget { token: TokenRef },
}

impl std::error::Error for Rejection {}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::NotYourTurn => write!(f, "It is not your turn to select a piece"),
            Rejection::EmptySquare { square } => write!(f, "There is no piece on {}", square),
            Rejection::NoTokenAvailable { kind } => {
                write!(f, "Moving a {} requires a {} token, but there is none left", kind, kind)
            }
            Rejection::NoActiveSelection => write!(f, "Select a piece before choosing a destination"),
            Rejection::IllegalMove { from, to } => write!(f, "Moving from {} to {} is illegal", from, to),
            Rejection::NotAwaitingSwap => write!(f, "No token has been spent, so there is nothing to swap"),
            Rejection::InvalidSwapTarget { token } => {
                write!(f, "The token {} is not in the neutral pool", token)
            }
        }
    }
}
