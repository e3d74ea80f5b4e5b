use crate::{Owner, PieceKind, Pools, TokenKindSet, TokenRef, OWNERS};

/// The piece kinds that can only move by spending a matching token.
///
/// This is the union of the token kinds in all three pools at the start of
/// the game, neutral pool included, and it does not change afterwards even
/// though the pools' contents do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequiredTypes {
    kinds: TokenKindSet,
}

impl RequiredTypes {
    pub fn from_pools(pools: &Pools) -> Self {
        let mut kinds = TokenKindSet::new();
        for owner in OWNERS {
            kinds |= pools.kinds(owner);
        }
        Self { kinds }
    }

    pub fn kinds(&self) -> TokenKindSet {
        self.kinds
    }

    pub fn requires_token(&self, piece_kind: PieceKind) -> bool {
        piece_kind
            .token_kind()
            .is_some_and(|kind| self.kinds.contains(kind))
    }

    /// Required kinds that neither white nor black currently hold.
    ///
    /// Pieces of these kinds cannot be moved by anyone right now. When a
    /// kind only ever existed in the neutral pool, it stays that way for the
    /// whole game.
    pub fn unsatisfiable(&self, pools: &Pools) -> TokenKindSet {
        self.kinds & !(pools.kinds(Owner::White) | pools.kinds(Owner::Black))
    }
}

/// Finds the first token in `owner`'s pool that lets a piece of
/// `piece_kind` move. The earliest slot wins.
pub fn find_matching_token(pools: &Pools, owner: Owner, piece_kind: PieceKind) -> Option<TokenRef> {
    let wanted = piece_kind.token_kind()?;
    pools
        .get(owner)
        .iter()
        .position(|token| token.kind == wanted)
        .map(|slot| TokenRef { owner, slot })
}
