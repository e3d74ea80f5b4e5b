use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::turn::Phase;
use crate::{
    find_matching_token, perform_swap, GameSetup, GameStatus, MoveReport, Owner, PendingSwap,
    PieceKind, Pools, Rejection, RequiredTypes, RulesEngine, RulesError, Selection, Side, Square,
    StandardChess, SwapRecord, TokenRef, TurnState,
};

/// Pawns always promote to a queen.
pub const PROMOTION_KIND: PieceKind = PieceKind::Queen;

/// Summarizes what an accepted action did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PieceSelected { selection: Selection },
    SelectionCleared,
    Moved {
        report: MoveReport,
        /// Whether a token was spent, so that the mover now has to pick a
        /// neutral token.
        awaiting_swap: bool,
    },
    Swapped { record: SwapRecord },
}

/// One game session: the token pools, the turn state machine and the
/// rules engine, driven by the actions of the two players.
///
/// Every action is either fully applied or rejected without touching the
/// pools or the turn state.
#[derive(Clone, Debug)]
pub struct Game<R = StandardChess> {
    rules: R,
    pools: Pools,
    required: RequiredTypes,
    phase: Phase,
    last_move: Option<MoveReport>,
}

impl Game<StandardChess> {
    pub fn from_setup(setup: &GameSetup) -> Result<Self, RulesError> {
        Ok(Self::new(setup.rules()?, setup.pools()))
    }
}

impl<R: RulesEngine> Game<R> {
    /// Starts a game. The required token kinds are fixed from here on.
    pub fn new(rules: R, pools: Pools) -> Self {
        let required = RequiredTypes::from_pools(&pools);
        let unsatisfiable = required.unsatisfiable(&pools);
        if !unsatisfiable.is_empty() {
            info!(kinds = %unsatisfiable, "Some token kinds are only in the neutral pool");
        }
        Self {
            rules,
            pools,
            required,
            phase: Phase::default(),
            last_move: None,
        }
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    pub fn required_types(&self) -> RequiredTypes {
        self.required
    }

    pub fn turn_state(&self) -> TurnState {
        self.phase.turn_state()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.phase.selection()
    }

    pub fn pending_swap(&self) -> Option<&PendingSwap> {
        self.phase.pending_swap()
    }

    /// The side that has to act next.
    ///
    /// While a swap is pending, this is the side that spent the token, even
    /// though the rules engine already has the opponent on move.
    pub fn side_to_move(&self) -> Side {
        match self.phase.pending_swap() {
            Some(pending) => pending.spending_owner,
            None => self.rules.turn_owner(),
        }
    }

    pub fn last_move(&self) -> Option<&MoveReport> {
        self.last_move.as_ref()
    }

    pub fn status(&self) -> GameStatus {
        self.rules.status()
    }

    /// Picks up the piece on `square`.
    ///
    /// Selecting the already selected piece again drops the selection.
    /// Selecting a different piece of the side on move replaces it.
    pub fn select_piece(&mut self, square: Square) -> Result<Event, Rejection> {
        if self.turn_state() == TurnState::SelectNeutralToken {
            return self.reject(Rejection::NotYourTurn);
        }
        if self.selection().is_some_and(|selection| selection.square == square) {
            self.phase.set_selection(None);
            debug!(%square, "Selection cleared");
            return Ok(Event::SelectionCleared);
        }
        let Some(piece) = self.rules.piece_at(square) else {
            return self.reject(Rejection::EmptySquare { square });
        };
        if piece.side != self.rules.turn_owner() {
            return self.reject(Rejection::NotYourTurn);
        }
        let token = if self.required.requires_token(piece.kind) {
            match find_matching_token(&self.pools, Owner::from(piece.side), piece.kind) {
                Some(token) => Some(token),
                None => return self.reject(Rejection::NoTokenAvailable { kind: piece.kind }),
            }
        } else {
            None
        };
        let selection = Selection {
            square,
            piece,
            token,
        };
        self.phase.set_selection(Some(selection));
        debug!(%square, %piece, token = ?token, "Piece selected");
        Ok(Event::PieceSelected { selection })
    }

    /// Moves the selected piece to `destination`.
    ///
    /// The selection is consumed whether or not the move is legal.
    pub fn attempt_move(&mut self, destination: Square) -> Result<Event, Rejection> {
        let Some(selection) = self.phase.take_selection() else {
            return self.reject(Rejection::NoActiveSelection);
        };
        let report = match self
            .rules
            .attempt_move(selection.square, destination, PROMOTION_KIND)
        {
            Ok(report) => report,
            Err(err) => {
                return self.reject(Rejection::IllegalMove {
                    from: err.from,
                    to: err.to,
                })
            }
        };
        // The token was only bound if the piece kind is required.
        let awaiting_swap = match selection.token {
            Some(spent) => {
                self.phase.await_swap(PendingSwap {
                    spent,
                    spending_owner: selection.piece.side,
                });
                true
            }
            None => false,
        };
        info!(
            from = %report.from,
            to = %report.to,
            piece = %report.piece,
            status = ?report.status,
            awaiting_swap,
            "Move played"
        );
        self.last_move = Some(report);
        Ok(Event::Moved {
            report,
            awaiting_swap,
        })
    }

    /// Swaps the spent token with `token`, which has to be in the neutral
    /// pool, and passes the turn to the opponent.
    pub fn select_neutral_token(&mut self, token: TokenRef) -> Result<Event, Rejection> {
        let Some(&pending) = self.phase.pending_swap() else {
            return self.reject(Rejection::NotAwaitingSwap);
        };
        let record = match perform_swap(&mut self.pools, &pending, token) {
            Ok(record) => record,
            Err(rejection) => return self.reject(rejection),
        };
        self.phase.finish_swap();
        info!(
            owner = %record.owner,
            spent = %record.spent_kind,
            received = %record.received_kind,
            "Tokens swapped"
        );
        Ok(Event::Swapped { record })
    }

    /// Shorthand for [`Self::select_neutral_token()`] by neutral slot index.
    pub fn select_neutral_slot(&mut self, slot: usize) -> Result<Event, Rejection> {
        self.select_neutral_token(TokenRef {
            owner: Owner::Neutral,
            slot,
        })
    }

    /// Handles a click on a square of the board.
    ///
    /// Without a selection, the click selects. Clicking the selected piece
    /// again deselects it, clicking another piece of the side on move
    /// selects that one instead, and anything else is a move destination.
    pub fn click_square(&mut self, square: Square) -> Result<Event, Rejection> {
        let selected_square = match &self.phase {
            Phase::SelectNeutralToken { .. } => return self.reject(Rejection::NotYourTurn),
            Phase::SelectPiece { selection } => selection.map(|selection| selection.square),
        };
        match selected_square {
            None => self.select_piece(square),
            Some(selected) if selected == square => self.select_piece(square),
            Some(_) => {
                let turn_owner = self.rules.turn_owner();
                let own_piece = self
                    .rules
                    .piece_at(square)
                    .is_some_and(|piece| piece.side == turn_owner);
                if own_piece {
                    self.select_piece(square)
                } else {
                    self.attempt_move(square)
                }
            }
        }
    }

    fn reject(&self, rejection: Rejection) -> Result<Event, Rejection> {
        debug!(side = %self.side_to_move(), %rejection, "Action rejected");
        Err(rejection)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::Action;
    use crate::TokenKind::*;
    use crate::{square, Piece, Token, TokenKind};

    fn scenario_a() -> Game {
        Game::from_setup(&GameSetup::default()).unwrap()
    }

    fn kinds(game: &Game, owner: Owner) -> Vec<TokenKind> {
        game.pools().get(owner).iter().map(|token| token.kind).collect()
    }

    fn play(game: &mut Game, from: &str, to: &str) -> Event {
        game.select_piece(from.parse().unwrap()).unwrap();
        game.attempt_move(to.parse().unwrap()).unwrap()
    }

    #[test]
    fn starts_in_select_piece() {
        let game = scenario_a();
        assert_eq!(game.turn_state(), TurnState::SelectPiece);
        assert_eq!(game.selection(), None);
        assert_eq!(game.pending_swap(), None);
        assert_eq!(game.side_to_move(), Side::White);
        assert_eq!(kinds(&game, Owner::White), vec![Rook, Knight, Bishop]);
        assert_eq!(kinds(&game, Owner::Black), vec![Rook, Knight, Bishop]);
        assert_eq!(kinds(&game, Owner::Neutral), vec![Rook, Rook, Queen]);
        assert_eq!(game.status(), GameStatus::Ongoing);
    }

    #[test]
    fn rook_move_spends_token_and_swaps() {
        let mut game = scenario_a();
        play(&mut game, "a2", "a4");
        play(&mut game, "h7", "h6");

        let event = game.select_piece(square!("a1")).unwrap();
        let Event::PieceSelected { selection } = event else {
            panic!("Unexpected event {:?}", event);
        };
        assert_eq!(selection.token, Some(TokenRef { owner: Owner::White, slot: 0 }));

        let event = game.attempt_move(square!("a3")).unwrap();
        assert!(matches!(event, Event::Moved { awaiting_swap: true, .. }));
        assert_eq!(game.turn_state(), TurnState::SelectNeutralToken);
        assert_eq!(
            game.pending_swap(),
            Some(&PendingSwap {
                spent: TokenRef { owner: Owner::White, slot: 0 },
                spending_owner: Side::White,
            })
        );
        assert_eq!(game.side_to_move(), Side::White);
        assert_eq!(game.rules().turn_owner(), Side::Black);

        let event = game.select_neutral_slot(0).unwrap();
        let Event::Swapped { record } = event else {
            panic!("Unexpected event {:?}", event);
        };
        assert_eq!(record.spent_kind, Rook);
        assert_eq!(record.received_kind, Rook);
        assert_eq!(game.turn_state(), TurnState::SelectPiece);
        assert_eq!(game.pending_swap(), None);
        assert_eq!(game.side_to_move(), Side::Black);
    }

    #[test]
    fn swap_takes_kind_from_chosen_neutral_slot() {
        let mut game = scenario_a();
        play(&mut game, "b1", "c3");
        game.select_neutral_slot(2).unwrap();
        assert_eq!(kinds(&game, Owner::White), vec![Rook, Queen, Bishop]);
        assert_eq!(kinds(&game, Owner::Neutral), vec![Rook, Rook, Knight]);

        // White has no knight token left after black's turn
        play(&mut game, "g8", "f6");
        game.select_neutral_slot(2).unwrap();
        assert_eq!(kinds(&game, Owner::Black), vec![Rook, Knight, Bishop]);
        assert_eq!(
            game.select_piece(square!("c3")),
            Err(Rejection::NoTokenAvailable { kind: PieceKind::Knight })
        );
        assert_eq!(game.selection(), None);
    }

    #[test]
    fn no_token_available_for_bishop() {
        let pools = Pools::new(&[Rook, Knight], &[Rook, Knight, Bishop], &[Queen]);
        let mut game = Game::new(StandardChess::new(), pools);
        play(&mut game, "d2", "d4");
        play(&mut game, "d7", "d5");
        let before = game.pools().clone();
        assert_eq!(
            game.select_piece(square!("c1")),
            Err(Rejection::NoTokenAvailable { kind: PieceKind::Bishop })
        );
        assert_eq!(game.selection(), None);
        assert_eq!(game.pools(), &before);
        assert_eq!(game.turn_state(), TurnState::SelectPiece);
    }

    #[test]
    fn illegal_move_clears_selection_only() {
        let mut game = scenario_a();
        game.select_piece(square!("a1")).unwrap();
        let before = game.pools().clone();
        assert_eq!(
            game.attempt_move(square!("a2")),
            Err(Rejection::IllegalMove {
                from: square!("a1"),
                to: square!("a2"),
            })
        );
        assert_eq!(game.selection(), None);
        assert_eq!(game.pools(), &before);
        assert_eq!(game.turn_state(), TurnState::SelectPiece);
        assert_eq!(game.rules().turn_owner(), Side::White);
        assert_eq!(game.attempt_move(square!("a3")), Err(Rejection::NoActiveSelection));
    }

    #[test]
    fn neutral_token_without_pending_swap() {
        let mut game = scenario_a();
        let before = game.pools().clone();
        assert_eq!(game.select_neutral_slot(0), Err(Rejection::NotAwaitingSwap));
        assert_eq!(game.pools(), &before);
        assert_eq!(game.turn_state(), TurnState::SelectPiece);
    }

    #[test]
    fn reselecting_same_piece_clears_selection() {
        let mut game = scenario_a();
        game.select_piece(square!("e2")).unwrap();
        assert!(game.selection().is_some());
        assert_eq!(game.select_piece(square!("e2")), Ok(Event::SelectionCleared));
        assert_eq!(game.selection(), None);
        assert_eq!(game.turn_state(), TurnState::SelectPiece);
    }

    #[test]
    fn selecting_another_piece_replaces_selection() {
        let mut game = scenario_a();
        game.select_piece(square!("e2")).unwrap();
        game.select_piece(square!("g1")).unwrap();
        let selection = game.selection().unwrap();
        assert_eq!(selection.square, square!("g1"));
        assert_eq!(selection.piece, Piece { side: Side::White, kind: PieceKind::Knight });
        assert_eq!(selection.token, Some(TokenRef { owner: Owner::White, slot: 1 }));
    }

    #[test]
    fn opponent_and_empty_squares_cannot_be_selected() {
        let mut game = scenario_a();
        assert_eq!(game.select_piece(square!("e7")), Err(Rejection::NotYourTurn));
        assert_eq!(
            game.select_piece(square!("e4")),
            Err(Rejection::EmptySquare { square: square!("e4") })
        );
        assert_eq!(game.selection(), None);
    }

    #[test]
    fn nobody_selects_while_swap_is_pending() {
        let mut game = scenario_a();
        play(&mut game, "g1", "f3");
        assert_eq!(game.select_piece(square!("e7")), Err(Rejection::NotYourTurn));
        assert_eq!(game.select_piece(square!("e2")), Err(Rejection::NotYourTurn));
        assert_eq!(game.click_square(square!("e4")), Err(Rejection::NotYourTurn));
        assert_eq!(game.attempt_move(square!("e5")), Err(Rejection::NoActiveSelection));
        assert_eq!(game.turn_state(), TurnState::SelectNeutralToken);
    }

    #[test]
    fn swap_target_must_be_neutral() {
        let mut game = scenario_a();
        play(&mut game, "g1", "f3");
        let before = game.pools().clone();
        for token in [
            TokenRef { owner: Owner::White, slot: 0 },
            TokenRef { owner: Owner::Black, slot: 1 },
            TokenRef { owner: Owner::Neutral, slot: 3 },
        ] {
            assert_eq!(
                game.select_neutral_token(token),
                Err(Rejection::InvalidSwapTarget { token })
            );
        }
        assert_eq!(game.pools(), &before);
        assert_eq!(game.turn_state(), TurnState::SelectNeutralToken);
    }

    #[test]
    fn pawns_and_kings_move_without_tokens() {
        let mut game = scenario_a();
        let event = play(&mut game, "e2", "e4");
        assert!(matches!(event, Event::Moved { awaiting_swap: false, .. }));
        assert_eq!(game.turn_state(), TurnState::SelectPiece);
        assert_eq!(game.side_to_move(), Side::Black);
        play(&mut game, "e7", "e5");
        let event = play(&mut game, "e1", "e2");
        assert!(matches!(event, Event::Moved { awaiting_swap: false, .. }));
        assert_eq!(game.last_move().map(|report| report.piece.kind), Some(PieceKind::King));
    }

    #[test]
    fn neutral_only_queen_can_never_move() {
        let mut game = scenario_a();
        play(&mut game, "e2", "e4");
        play(&mut game, "e7", "e5");
        assert!(game.required_types().requires_token(PieceKind::Queen));
        assert_eq!(
            game.select_piece(square!("d1")),
            Err(Rejection::NoTokenAvailable { kind: PieceKind::Queen })
        );
    }

    #[test]
    fn promotion_is_to_queen_and_not_gated() {
        let setup = GameSetup {
            fen: Some(String::from("7k/P7/8/8/8/8/8/K7 w - - 0 1")),
            ..GameSetup::default()
        };
        let mut game = Game::from_setup(&setup).unwrap();
        let event = play(&mut game, "a7", "a8");
        let Event::Moved { report, awaiting_swap } = event else {
            panic!("Unexpected event {:?}", event);
        };
        assert!(!awaiting_swap);
        assert_eq!(report.promotion, Some(PieceKind::Queen));
    }

    #[test]
    fn click_square_dispatch() {
        let mut game = scenario_a();
        assert!(matches!(
            game.click_square(square!("e2")),
            Ok(Event::PieceSelected { .. })
        ));
        assert!(matches!(
            game.click_square(square!("d2")),
            Ok(Event::PieceSelected { .. })
        ));
        assert_eq!(game.selection().map(|s| s.square), Some(square!("d2")));
        assert_eq!(game.click_square(square!("d2")), Ok(Event::SelectionCleared));
        game.click_square(square!("b1")).unwrap();
        assert!(matches!(
            game.click_square(square!("c3")),
            Ok(Event::Moved { awaiting_swap: true, .. })
        ));
        assert_eq!(game.click_square(square!("c6")), Err(Rejection::NotYourTurn));
        game.select_neutral_slot(1).unwrap();
        assert_eq!(game.click_square(square!("c2")), Err(Rejection::NotYourTurn));
        game.click_square(square!("d7")).unwrap();
        assert_eq!(
            game.click_square(square!("d3")),
            Err(Rejection::IllegalMove {
                from: square!("d7"),
                to: square!("d3"),
            })
        );
    }

    #[test]
    fn empty_pools_gate_nothing() {
        let mut game = Game::new(StandardChess::new(), Pools::new(&[], &[], &[]));
        let event = play(&mut game, "g1", "f3");
        assert!(matches!(event, Event::Moved { awaiting_swap: false, .. }));
        assert_eq!(game.pools().get(Owner::Neutral), &[] as &[Token]);
    }

    quickcheck! {
        fn invariants_hold_for_any_actions(actions: Vec<Action>) -> bool {
            let mut game = scenario_a();
            let total = game.pools().total_len();
            let counts = game.pools().kind_counts();
            let required = game.required_types();
            for action in actions {
                let pools_before = game.pools().clone();
                let state_before = game.turn_state();
                let turn_owner_before = game.rules().turn_owner();
                let result = action.apply(&mut game);
                if result.is_err()
                    && (game.pools() != &pools_before
                        || game.turn_state() != state_before
                        || game.rules().turn_owner() != turn_owner_before)
                {
                    return false;
                }
                let exclusive = (game.turn_state() == TurnState::SelectNeutralToken)
                    == game.pending_swap().is_some();
                let no_selection_during_swap =
                    game.pending_swap().is_none() || game.selection().is_none();
                if !exclusive
                    || !no_selection_during_swap
                    || game.pools().total_len() != total
                    || game.pools().kind_counts() != counts
                    || game.required_types() != required
                {
                    return false;
                }
            }
            true
        }
    }
}
