use serde::{Deserialize, Serialize};

use crate::{Owner, PendingSwap, Pools, Rejection, Side, TokenKind, TokenRef};

/// What a completed swap did to the pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRecord {
    pub owner: Side,
    pub spent: TokenRef,
    pub neutral: TokenRef,
    /// The kind that went into the neutral pool.
    pub spent_kind: TokenKind,
    /// The kind that came out of the neutral pool.
    pub received_kind: TokenKind,
}

/// Exchanges the spent token with the chosen neutral token.
///
/// Afterwards the spender's slot holds what used to be in the neutral slot,
/// and the neutral slot holds the kind that was just spent.
pub fn perform_swap(
    pools: &mut Pools,
    pending: &PendingSwap,
    chosen: TokenRef,
) -> Result<SwapRecord, Rejection> {
    let invalid = Rejection::InvalidSwapTarget { token: chosen };
    if chosen.owner != Owner::Neutral {
        return Err(invalid);
    }
    let received_kind = pools.token(chosen).ok_or(invalid)?.kind;
    let spent_kind = pools.token(pending.spent).ok_or(invalid)?.kind;
    pools.swap(pending.spent, chosen).map_err(|_| invalid)?;
    Ok(SwapRecord {
        owner: pending.spending_owner,
        spent: pending.spent,
        neutral: chosen,
        spent_kind,
        received_kind,
    })
}
