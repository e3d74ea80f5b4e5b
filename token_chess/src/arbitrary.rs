use quickcheck::{Arbitrary, Gen};

use crate::{Event, Game, Owner, Pools, Rejection, Square, TokenKind, TokenRef, OWNERS, TOKEN_KINDS};

impl Arbitrary for TokenKind {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&TOKEN_KINDS).unwrap()
    }
}

impl Arbitrary for Owner {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&OWNERS).unwrap()
    }
}

impl Arbitrary for Square {
    fn arbitrary(g: &mut Gen) -> Self {
        Square::new(u8::arbitrary(g) % 8, u8::arbitrary(g) % 8).unwrap()
    }
}

fn arbitrary_kinds(g: &mut Gen) -> Vec<TokenKind> {
    let len = usize::arbitrary(g) % 6;
    (0..len).map(|_| TokenKind::arbitrary(g)).collect()
}

/// Some pools together with a list of swaps between valid slots.
#[derive(Clone, Debug)]
pub struct PoolsWithSwaps {
    pub pools: Pools,
    pub swaps: Vec<(TokenRef, TokenRef)>,
}

impl Arbitrary for PoolsWithSwaps {
    fn arbitrary(g: &mut Gen) -> Self {
        let pools = Pools::new(&arbitrary_kinds(g), &arbitrary_kinds(g), &arbitrary_kinds(g));
        let all_refs: Vec<TokenRef> = OWNERS.iter().flat_map(|&owner| pools.refs(owner)).collect();
        let mut swaps = Vec::new();
        if !all_refs.is_empty() {
            for _ in 0..usize::arbitrary(g) % 20 {
                let a = *g.choose(&all_refs).unwrap();
                let b = *g.choose(&all_refs).unwrap();
                swaps.push((a, b));
            }
        }
        PoolsWithSwaps { pools, swaps }
    }
}

/// An owner and an index that is wrapped around to a valid slot.
#[derive(Clone, Copy, Debug)]
pub struct TokenRefIn {
    owner: Owner,
    index: usize,
}

impl TokenRefIn {
    /// `None` if the owner's pool is empty.
    pub fn resolve(self, pools: &Pools) -> Option<TokenRef> {
        let len = pools.get(self.owner).len();
        (len > 0).then(|| TokenRef {
            owner: self.owner,
            slot: self.index % len,
        })
    }
}

impl Arbitrary for TokenRefIn {
    fn arbitrary(g: &mut Gen) -> Self {
        TokenRefIn {
            owner: Owner::arbitrary(g),
            index: usize::arbitrary(g),
        }
    }
}

/// Something a player could do to a game.
#[derive(Clone, Copy, Debug)]
pub enum Action {
    Click(Square),
    Select(Square),
    Move(Square),
    Neutral(usize),
    Token(TokenRef),
}

impl Action {
    pub fn apply(self, game: &mut Game) -> Result<Event, Rejection> {
        match self {
            Action::Click(square) => game.click_square(square),
            Action::Select(square) => game.select_piece(square),
            Action::Move(square) => game.attempt_move(square),
            Action::Neutral(slot) => game.select_neutral_slot(slot),
            Action::Token(token) => game.select_neutral_token(token),
        }
    }
}

impl Arbitrary for Action {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 10 {
            0..=4 => Action::Click(Square::arbitrary(g)),
            5 => Action::Select(Square::arbitrary(g)),
            6 => Action::Move(Square::arbitrary(g)),
            7 | 8 => Action::Neutral(usize::arbitrary(g) % 4),
            _ => Action::Token(TokenRef {
                owner: Owner::arbitrary(g),
                slot: usize::arbitrary(g) % 4,
            }),
        }
    }
}
