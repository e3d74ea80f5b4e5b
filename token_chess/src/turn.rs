use serde::{Deserialize, Serialize};

use crate::{Piece, Side, Square, TokenRef};

/// What the game is waiting for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    /// The side on move has to pick a piece and a destination.
    SelectPiece,
    /// A token was spent and the spender has to pick a neutral token to
    /// swap it with before the opponent may act.
    SelectNeutralToken,
}

/// A piece that was picked up, together with the token that will be spent
/// if it moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub square: Square,
    pub piece: Piece,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub token: Option<TokenRef>,
}

/// A spent token that still has to be swapped with a neutral one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSwap {
    pub spent: TokenRef,
    pub spending_owner: Side,
}

/// The turn state machine.
///
/// The pending swap lives inside the `SelectNeutralToken` phase and the
/// selection inside the `SelectPiece` phase, so there can never be a pending
/// swap outside of `SelectNeutralToken`, nor a selection during it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    SelectPiece { selection: Option<Selection> },
    SelectNeutralToken { pending: PendingSwap },
}

impl Default for Phase {
    fn default() -> Self {
        Phase::SelectPiece { selection: None }
    }
}

impl Phase {
    pub(crate) fn turn_state(&self) -> TurnState {
        match self {
            Phase::SelectPiece { .. } => TurnState::SelectPiece,
            Phase::SelectNeutralToken { .. } => TurnState::SelectNeutralToken,
        }
    }

    pub(crate) fn selection(&self) -> Option<&Selection> {
        match self {
            Phase::SelectPiece { selection } => selection.as_ref(),
            Phase::SelectNeutralToken { .. } => None,
        }
    }

    pub(crate) fn pending_swap(&self) -> Option<&PendingSwap> {
        match self {
            Phase::SelectPiece { .. } => None,
            Phase::SelectNeutralToken { pending } => Some(pending),
        }
    }

    /// Replaces the selection. Does nothing while awaiting a swap.
    pub(crate) fn set_selection(&mut self, new_selection: Option<Selection>) {
        if let Phase::SelectPiece { selection } = self {
            *selection = new_selection;
        }
    }

    /// Removes and returns the selection, if any.
    pub(crate) fn take_selection(&mut self) -> Option<Selection> {
        match self {
            Phase::SelectPiece { selection } => selection.take(),
            Phase::SelectNeutralToken { .. } => None,
        }
    }

    /// `SelectPiece` to `SelectNeutralToken`, after a token-gated move.
    pub(crate) fn await_swap(&mut self, pending: PendingSwap) {
        debug_assert_eq!(self.turn_state(), TurnState::SelectPiece);
        *self = Phase::SelectNeutralToken { pending };
    }

    /// `SelectNeutralToken` back to `SelectPiece`, once the swap is done.
    pub(crate) fn finish_swap(&mut self) -> Option<PendingSwap> {
        let pending = self.pending_swap().copied()?;
        *self = Phase::default();
        Some(pending)
    }
}
