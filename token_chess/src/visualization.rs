use crate::{Owner, PendingSwap, Pools, RulesEngine, Selection, Square, OWNERS};

/// Draws the board from white's point of view, rank 8 at the top.
///
/// The selected piece, if any, is followed by a `*`.
pub fn visualize_board<R: RulesEngine>(rules: &R, selection: Option<&Selection>) -> String {
    let selected = selection.map(|selection| selection.square);
    let mut result = String::from("   a b c d e f g h\n  ╭");
    for _ in 0..8 {
        result += "──";
    }
    result += "╮\n";
    for row in 0..8u8 {
        let rank = 8 - row;
        result += &format!("{} │", rank);
        for col in 0..8u8 {
            let Some(square) = Square::from_row_col(row, col) else {
                continue;
            };
            let symbol = match rules.piece_at(square) {
                Some(piece) => piece.unicode_char(),
                None => '·',
            };
            result.push(symbol);
            result.push(if selected == Some(square) { '*' } else { ' ' });
        }
        result += &format!("│ {}\n", rank);
    }
    result += "  ╰";
    for _ in 0..8 {
        result += "──";
    }
    result += "╯\n   a b c d e f g h";
    result
}

/// One line per pool, every token prefixed with its slot index.
///
/// While a swap is pending, the spent token is followed by a `*`.
pub fn visualize_pools(pools: &Pools, pending: Option<&PendingSwap>) -> String {
    let mut lines = Vec::with_capacity(OWNERS.len());
    for owner in OWNERS {
        let mut line = format!("{:>7}:", owner.to_string());
        if pools.get(owner).is_empty() {
            line += " (empty)";
        }
        for token_ref in pools.refs(owner) {
            let Some(token) = pools.token(token_ref) else {
                continue;
            };
            let spent = pending.is_some_and(|pending| pending.spent == token_ref);
            line += &format!(
                " {}:{}{}",
                token_ref.slot,
                token.kind.unicode_char(),
                if spent { "*" } else { "" }
            );
        }
        if owner == Owner::Neutral && pending.is_some() {
            line += "  <- choose one";
        }
        lines.push(line);
    }
    lines.join("\n")
}
