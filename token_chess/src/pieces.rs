use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the two players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}

/// The kind of a chess piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// The kind of a token.
///
/// Only these four piece kinds can ever be gated by a token; pawns and
/// kings are never placed in a pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TokenKind {
    Rook,
    Knight,
    Bishop,
    Queen,
}

pub const TOKEN_KINDS: [TokenKind; 4] = [
    TokenKind::Rook,
    TokenKind::Knight,
    TokenKind::Bishop,
    TokenKind::Queen,
];

impl PieceKind {
    /// The token kind that has to be spent to move a piece of this kind,
    /// if there is one at all.
    pub fn token_kind(self) -> Option<TokenKind> {
        match self {
            PieceKind::Rook => Some(TokenKind::Rook),
            PieceKind::Knight => Some(TokenKind::Knight),
            PieceKind::Bishop => Some(TokenKind::Bishop),
            PieceKind::Queen => Some(TokenKind::Queen),
            PieceKind::Pawn | PieceKind::King => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        }
    }
}

impl TokenKind {
    pub fn piece_kind(self) -> PieceKind {
        match self {
            TokenKind::Rook => PieceKind::Rook,
            TokenKind::Knight => PieceKind::Knight,
            TokenKind::Bishop => PieceKind::Bishop,
            TokenKind::Queen => PieceKind::Queen,
        }
    }

    /// Render this token as a filled Unicode chess symbol.
    pub fn unicode_char(self) -> char {
        match self {
            TokenKind::Rook => '♜',
            TokenKind::Knight => '♞',
            TokenKind::Bishop => '♝',
            TokenKind::Queen => '♛',
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.piece_kind().name())
    }
}

/// A piece on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl Piece {
    pub fn unicode_char(&self) -> char {
        // https://en.wikipedia.org/wiki/Chess_symbols_in_Unicode
        let offset = match self.kind {
            PieceKind::King => 0,
            PieceKind::Queen => 1,
            PieceKind::Rook => 2,
            PieceKind::Bishop => 3,
            PieceKind::Knight => 4,
            PieceKind::Pawn => 5,
        };
        let base = match self.side {
            Side::White => 0x2654,
            Side::Black => 0x265A,
        };
        char::from_u32(base + offset).unwrap_or('?')
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.side, self.kind)
    }
}

/// A square on the board, addressed by file (`a`-`h` as 0-7) and rank
/// (`1`-`8` as 0-7).
///
/// Presentation layers usually think in rows and columns with row 0 at the
/// top, i.e. on rank 8. [`Square::from_row_col()`] converts from those.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Returns `None` if either index is outside of `0..8`.
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    pub fn from_row_col(row: u8, col: u8) -> Option<Self> {
        if row < 8 {
            Self::new(col, 7 - row)
        } else {
            None
        }
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub fn row(self) -> u8 {
        7 - self.rank
    }

    pub fn col(self) -> u8 {
        self.file
    }

    /// All squares, row by row from a8 to h1.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square { file: col, rank: 7 - row }))
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

/// The error type for the [`FromStr`] instance of [`Square`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SquareFromStrErr {
    LessThanTwoChars,
    MoreThanTwoChars,
    InvalidFile,
    InvalidRank,
}

impl std::error::Error for SquareFromStrErr {}

impl std::fmt::Display for SquareFromStrErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SquareFromStrErr::LessThanTwoChars => write!(f, "A square needs a file and a rank"),
            SquareFromStrErr::MoreThanTwoChars => write!(f, "A square has exactly two characters"),
            SquareFromStrErr::InvalidFile => write!(f, "The file must be one of a-h"),
            SquareFromStrErr::InvalidRank => write!(f, "The rank must be one of 1-8"),
        }
    }
}

impl FromStr for Square {
    type Err = SquareFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let file_char = chars.next().ok_or(SquareFromStrErr::LessThanTwoChars)?;
        let rank_char = chars.next().ok_or(SquareFromStrErr::LessThanTwoChars)?;
        if chars.next().is_some() {
            return Err(SquareFromStrErr::MoreThanTwoChars);
        }
        let file = match file_char.to_ascii_lowercase() {
            c @ 'a'..='h' => c as u8 - b'a',
            _ => return Err(SquareFromStrErr::InvalidFile),
        };
        let rank = match rank_char {
            c @ '1'..='8' => c as u8 - b'1',
            _ => return Err(SquareFromStrErr::InvalidRank),
        };
        Ok(Square { file, rank })
    }
}

impl Serialize for Square {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Shorthand for creating squares from algebraic notation.
///
/// This macro is just calling the [`FromStr`] instance of [`Square`].
/// ```
/// # use token_chess::{square, Square};
/// let e4 = square!("e4");
/// assert_eq!((e4.row(), e4.col()), (4, 4));
/// assert_eq!(Square::from_row_col(0, 0), Some(square!("a8")));
/// ```
#[macro_export]
macro_rules! square {
    ($s:literal) => {
        <$crate::Square as std::str::FromStr>::from_str($s)
            .expect("Invalid square given to square! macro")
    };
}
#[allow(unused_imports)]
pub(crate) use square;
