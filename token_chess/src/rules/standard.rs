use shakmaty::fen::{Fen, ParseFenError};
use shakmaty::{CastlingMode, Chess, Color, File, Move, Position, Rank, Role};

use super::{GameStatus, IllegalMove, MoveReport, RulesEngine};
use crate::{Piece, PieceKind, Side, Square};

/// Standard chess rules, backed by `shakmaty`.
///
/// Castling is entered as the two-square king move (e.g. `e1` to `g1`).
#[derive(Clone, Debug, Default)]
pub struct StandardChess {
    position: Chess,
}

/// The error type for [`StandardChess::from_fen()`].
#[derive(Debug)]
pub enum RulesError {
    InvalidFen(ParseFenError),
    /// The FEN was well-formed but does not describe a legal position.
    InvalidPosition(String),
}

impl std::error::Error for RulesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RulesError::InvalidFen(err) => Some(err),
            RulesError::InvalidPosition(_) => None,
        }
    }
}

impl std::fmt::Display for RulesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RulesError::InvalidFen(_) => write!(f, "Could not parse the FEN"),
            RulesError::InvalidPosition(reason) => write!(f, "The FEN describes an illegal position: {}", reason),
        }
    }
}

impl StandardChess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let fen: Fen = fen.parse().map_err(RulesError::InvalidFen)?;
        let position: Chess = fen
            .into_position(CastlingMode::Standard)
            .map_err(|err| RulesError::InvalidPosition(err.to_string()))?;
        Ok(Self { position })
    }

    fn find_legal_move(&self, origin: Square, destination: Square, promotion: PieceKind) -> Option<Move> {
        let from = to_shakmaty_square(origin);
        let to = to_shakmaty_square(destination);
        let promotion = to_role(promotion);
        let turn = self.position.turn();
        self.position
            .legal_moves()
            .into_iter()
            .find(|m| {
                m.from() == Some(from)
                    && king_destination(m, turn) == to
                    && m.promotion().map_or(true, |role| role == promotion)
            })
    }
}

impl RulesEngine for StandardChess {
    fn turn_owner(&self) -> Side {
        to_side(self.position.turn())
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position
            .board()
            .piece_at(to_shakmaty_square(square))
            .map(|piece| Piece {
                side: to_side(piece.color),
                kind: to_piece_kind(piece.role),
            })
    }

    fn attempt_move(
        &mut self,
        origin: Square,
        destination: Square,
        promotion: PieceKind,
    ) -> Result<MoveReport, IllegalMove> {
        let m = self
            .find_legal_move(origin, destination, promotion)
            .ok_or(IllegalMove {
                from: origin,
                to: destination,
            })?;
        let piece = Piece {
            side: to_side(self.position.turn()),
            kind: to_piece_kind(m.role()),
        };
        self.position.play_unchecked(&m);
        Ok(MoveReport {
            from: origin,
            to: destination,
            piece,
            captured: m.capture().map(to_piece_kind),
            promotion: m.promotion().map(to_piece_kind),
            status: self.status(),
        })
    }

    fn status(&self) -> GameStatus {
        if self.position.is_checkmate() {
            GameStatus::Checkmate
        } else if self.position.is_stalemate() {
            GameStatus::Stalemate
        } else if self.position.is_insufficient_material() {
            GameStatus::InsufficientMaterial
        } else if self.position.is_check() {
            GameStatus::Check
        } else {
            GameStatus::Ongoing
        }
    }
}

/// Where the king ends up, for castling moves; the target square otherwise.
fn king_destination(m: &Move, turn: Color) -> shakmaty::Square {
    match m.castling_side() {
        Some(side) => side.king_to(turn),
        None => m.to(),
    }
}

fn to_shakmaty_square(square: Square) -> shakmaty::Square {
    shakmaty::Square::from_coords(
        File::new(u32::from(square.file())),
        Rank::new(u32::from(square.rank())),
    )
}

fn to_side(color: Color) -> Side {
    match color {
        Color::White => Side::White,
        Color::Black => Side::Black,
    }
}

fn to_piece_kind(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

fn to_role(kind: PieceKind) -> Role {
    match kind {
        PieceKind::Pawn => Role::Pawn,
        PieceKind::Knight => Role::Knight,
        PieceKind::Bishop => Role::Bishop,
        PieceKind::Rook => Role::Rook,
        PieceKind::Queen => Role::Queen,
        PieceKind::King => Role::King,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square;

    const FOOLS_MATE: &str = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";

    #[test]
    fn valid_pawn_move() {
        let mut rules = StandardChess::new();
        let report = rules
            .attempt_move(square!("e2"), square!("e4"), PieceKind::Queen)
            .unwrap();
        assert_eq!(report.piece, Piece { side: Side::White, kind: PieceKind::Pawn });
        assert_eq!(report.status, GameStatus::Ongoing);
        assert_eq!(rules.piece_at(square!("e4")).map(|p| p.kind), Some(PieceKind::Pawn));
        assert_eq!(rules.piece_at(square!("e2")), None);
        assert_eq!(rules.turn_owner(), Side::Black);
    }

    #[test]
    fn invalid_pawn_move_leaves_position_untouched() {
        let mut rules = StandardChess::new();
        let err = rules
            .attempt_move(square!("e2"), square!("e5"), PieceKind::Queen)
            .unwrap_err();
        assert_eq!(err, IllegalMove { from: square!("e2"), to: square!("e5") });
        assert_eq!(rules.turn_owner(), Side::White);
        assert!(rules.piece_at(square!("e2")).is_some());
    }

    #[test]
    fn cannot_move_onto_own_piece() {
        let mut rules = StandardChess::new();
        assert!(rules
            .attempt_move(square!("a1"), square!("a2"), PieceKind::Queen)
            .is_err());
    }

    #[test]
    fn opponent_pieces_cannot_be_moved() {
        let mut rules = StandardChess::new();
        assert!(rules
            .attempt_move(square!("e7"), square!("e5"), PieceKind::Queen)
            .is_err());
    }

    #[test]
    fn detects_checkmate() {
        let rules = StandardChess::from_fen(FOOLS_MATE).unwrap();
        assert_eq!(rules.status(), GameStatus::Checkmate);
        assert!(rules.status().is_game_over());
    }

    #[test]
    fn reports_check_after_move() {
        let mut rules =
            StandardChess::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let report = rules
            .attempt_move(square!("a1"), square!("a8"), PieceKind::Queen)
            .unwrap();
        assert_eq!(report.status, GameStatus::Check);
    }

    #[test]
    fn castling_by_king_move() {
        let mut rules =
            StandardChess::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let report = rules
            .attempt_move(square!("e1"), square!("g1"), PieceKind::Queen)
            .unwrap();
        assert_eq!(report.piece.kind, PieceKind::King);
        assert_eq!(rules.piece_at(square!("g1")).map(|p| p.kind), Some(PieceKind::King));
        assert_eq!(rules.piece_at(square!("f1")).map(|p| p.kind), Some(PieceKind::Rook));
    }

    #[test]
    fn promotes_to_requested_kind() {
        let mut rules = StandardChess::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let report = rules
            .attempt_move(square!("a7"), square!("a8"), PieceKind::Queen)
            .unwrap();
        assert_eq!(report.piece.kind, PieceKind::Pawn);
        assert_eq!(report.promotion, Some(PieceKind::Queen));
        assert_eq!(rules.piece_at(square!("a8")).map(|p| p.kind), Some(PieceKind::Queen));
    }

    #[test]
    fn captures_are_reported() {
        let mut rules =
            StandardChess::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let report = rules
            .attempt_move(square!("e4"), square!("d5"), PieceKind::Queen)
            .unwrap();
        assert_eq!(report.captured, Some(PieceKind::Pawn));
    }

    #[test]
    fn rejects_garbage_fen() {
        assert!(matches!(
            StandardChess::from_fen("not a fen"),
            Err(RulesError::InvalidFen(_))
        ));
    }
}
