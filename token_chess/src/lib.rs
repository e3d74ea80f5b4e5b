//! A chess variant in which rooks, knights, bishops and queens may only move
//! by spending a matching token, and every spent token has to be swapped
//! with one from a neutral pool before the opponent may act.
//!
//! [`Game`] is the entry point. Standard chess legality is delegated to a
//! [`RulesEngine`], by default [`StandardChess`].

pub use errors::*;
pub use game::*;
pub use pieces::*;
pub use protocol::*;
pub use requirements::*;
pub use rules::*;
pub use setup::*;
pub use swap::*;
pub use tokens::*;
pub use turn::{PendingSwap, Selection, TurnState};
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod bitset;
mod errors;
mod game;
mod pieces;
mod protocol;
mod requirements;
mod rules;
mod setup;
mod swap;
mod tokens;
mod turn;
mod visualization;
