use std::collections::BTreeMap;
use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::bitset::bitset_traits;
use crate::{Side, TokenKind, TOKEN_KINDS};

/// Who a pool of tokens belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Owner {
    White,
    Black,
    /// The bank that spent tokens are swapped with.
    Neutral,
}

pub const OWNERS: [Owner; 3] = [Owner::White, Owner::Black, Owner::Neutral];

impl From<Side> for Owner {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Owner::White,
            Side::Black => Owner::Black,
        }
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Owner::White => write!(f, "white"),
            Owner::Black => write!(f, "black"),
            Owner::Neutral => write!(f, "neutral"),
        }
    }
}

/// A token in a pool.
///
/// Tokens have no identity besides their slot, see [`TokenRef`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
}

/// Points to one slot in one of the [`Pools`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenRef {
    pub owner: Owner,
    pub slot: usize,
}

impl std::fmt::Display for TokenRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} #{}", self.owner, self.slot)
    }
}

/// A [`TokenRef`] did not point into any pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidTokenRef(pub TokenRef);

impl std::error::Error for InvalidTokenRef {}

impl std::fmt::Display for InvalidTokenRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "There is no token at {}", self.0)
    }
}

/// The token pools of white, black and the neutral bank.
///
/// The number of slots in each pool is fixed when the pools are created.
/// The only mutation is [`Pools::swap()`], which relabels two slots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pools {
    white: Vec<Token>,
    black: Vec<Token>,
    neutral: Vec<Token>,
}

impl Pools {
    pub fn new(white: &[TokenKind], black: &[TokenKind], neutral: &[TokenKind]) -> Self {
        let to_tokens = |kinds: &[TokenKind]| kinds.iter().map(|&kind| Token { kind }).collect();
        Self {
            white: to_tokens(white),
            black: to_tokens(black),
            neutral: to_tokens(neutral),
        }
    }

    pub fn get(&self, owner: Owner) -> &[Token] {
        match owner {
            Owner::White => &self.white,
            Owner::Black => &self.black,
            Owner::Neutral => &self.neutral,
        }
    }

    fn get_mut(&mut self, owner: Owner) -> &mut [Token] {
        match owner {
            Owner::White => &mut self.white,
            Owner::Black => &mut self.black,
            Owner::Neutral => &mut self.neutral,
        }
    }

    pub fn token(&self, token_ref: TokenRef) -> Option<Token> {
        self.get(token_ref.owner).get(token_ref.slot).copied()
    }

    /// References to every slot of a pool, in pool order.
    pub fn refs(&self, owner: Owner) -> impl Iterator<Item = TokenRef> {
        (0..self.get(owner).len()).map(move |slot| TokenRef { owner, slot })
    }

    pub fn total_len(&self) -> usize {
        self.white.len() + self.black.len() + self.neutral.len()
    }

    /// The kinds of one pool as a set.
    pub fn kinds(&self, owner: Owner) -> TokenKindSet {
        self.get(owner).iter().map(|token| token.kind).collect()
    }

    /// How often each kind occurs across all three pools.
    pub fn kind_counts(&self) -> BTreeMap<TokenKind, usize> {
        let mut counts = BTreeMap::new();
        for owner in OWNERS {
            for token in self.get(owner) {
                *counts.entry(token.kind).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Exchanges the kinds of two tokens in place.
    ///
    /// Both references must be valid, otherwise nothing is changed.
    /// Swapping a token with itself is allowed and has no effect.
    pub fn swap(&mut self, a: TokenRef, b: TokenRef) -> Result<(), InvalidTokenRef> {
        let kind_a = self.token(a).ok_or(InvalidTokenRef(a))?.kind;
        let kind_b = self.token(b).ok_or(InvalidTokenRef(b))?.kind;
        self.get_mut(a.owner)[a.slot].kind = kind_b;
        self.get_mut(b.owner)[b.slot].kind = kind_a;
        Ok(())
    }
}

/// A compact set of [`TokenKind`]s.
///
/// Allows intersection/union/xor with other such sets via bitwise ops.
/// ```
/// use token_chess::{TokenKind, TokenKindSet};
/// let set = TokenKindSet::new()
///     .insert(TokenKind::Queen)
///     .insert(TokenKind::Rook);
/// assert_eq!(Vec::from_iter(set), vec![TokenKind::Rook, TokenKind::Queen]);
/// assert!(!set.contains(TokenKind::Knight));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenKindSet {
    // Only the low 4 bits are used.
    bits: u8,
}

impl TokenKindSet {
    const VALID_BITS: u8 = 0b1111;

    /// Creates a new, empty set.
    pub fn new() -> Self {
        Self { bits: 0 }
    }

    pub fn len(self) -> u32 {
        self.bits.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn contains(self, kind: TokenKind) -> bool {
        (self.bits & (1u8 << kind as u8)) != 0
    }

    #[must_use] // Because users might expect this to be a mutating method
    pub fn insert(self, kind: TokenKind) -> Self {
        Self {
            bits: self.bits | (1u8 << kind as u8),
        }
    }

    #[must_use] // Because users might expect this to be a mutating method
    pub fn remove(self, kind: TokenKind) -> Self {
        Self {
            bits: self.bits & !(1u8 << kind as u8),
        }
    }
}

bitset_traits!(TokenKindSet);

impl FromIterator<TokenKind> for TokenKindSet {
    fn from_iter<T: IntoIterator<Item = TokenKind>>(iter: T) -> Self {
        let mut set = TokenKindSet::new();
        for kind in iter {
            set = set.insert(kind);
        }
        set
    }
}

impl IntoIterator for TokenKindSet {
    type Item = TokenKind;
    type IntoIter = TokenKindSetIter;

    fn into_iter(self) -> Self::IntoIter {
        TokenKindSetIter { set: self, next: 0 }
    }
}

pub struct TokenKindSetIter {
    set: TokenKindSet,
    next: usize,
}

impl Iterator for TokenKindSetIter {
    type Item = TokenKind;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&kind) = TOKEN_KINDS.get(self.next) {
            self.next += 1;
            if self.set.contains(kind) {
                return Some(kind);
            }
        }
        None
    }
}

impl FusedIterator for TokenKindSetIter {}

impl std::fmt::Display for TokenKindSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (idx, kind) in self.into_iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", kind)?;
        }
        write!(f, "}}")
    }
}
