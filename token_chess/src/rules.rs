mod standard;

pub use standard::*;

use serde::{Deserialize, Serialize};

use crate::{Piece, PieceKind, Side, Square};

/// The collaborator that knows standard chess.
///
/// The [`Game`](crate::Game) only asks who is on move, what stands where,
/// and whether a move is legal. Everything about tokens happens outside of
/// the rules engine.
pub trait RulesEngine {
    /// The side whose move it is according to the board position.
    fn turn_owner(&self) -> Side;

    fn piece_at(&self, square: Square) -> Option<Piece>;

    /// Plays the move if it is legal, which also passes the move to the
    /// opponent. An illegal move leaves the position untouched.
    ///
    /// `promotion` is only used when a pawn reaches the last rank.
    fn attempt_move(
        &mut self,
        origin: Square,
        destination: Square,
        promotion: PieceKind,
    ) -> Result<MoveReport, IllegalMove>;

    /// Check, mate and draw detection for the current position. Only used
    /// for reporting, never for deciding what a player may do.
    fn status(&self) -> GameStatus;
}

/// The state of the position after a move, from the point of view of the
/// side that is now on move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
    InsufficientMaterial,
}

impl GameStatus {
    pub fn is_game_over(self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate | GameStatus::Stalemate | GameStatus::InsufficientMaterial
        )
    }
}

/// Describes a move that was played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    pub from: Square,
    pub to: Square,
    /// The piece as it stood on `from`, i.e. before any promotion.
    pub piece: Piece,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub captured: Option<PieceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub promotion: Option<PieceKind>,
    pub status: GameStatus,
}

/// The rules engine refused a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IllegalMove {
    pub from: Square,
    pub to: Square,
}

impl std::error::Error for IllegalMove {}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "There is no legal move from {} to {}", self.from, self.to)
    }
}
