use serde::{Deserialize, Serialize};

use crate::{Pools, RulesError, StandardChess, TokenKind};

/// The starting conditions of a game.
///
/// Missing fields fall back to the defaults, so a setup file only needs to
/// list what it changes.
/// ```
/// # use token_chess::{GameSetup, TokenKind};
/// let setup: GameSetup = serde_json::from_str(r#"{ "neutral": ["queen"] }"#).unwrap();
/// assert_eq!(setup.neutral, vec![TokenKind::Queen]);
/// assert_eq!(setup.white, GameSetup::default().white);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSetup {
    pub white: Vec<TokenKind>,
    pub black: Vec<TokenKind>,
    pub neutral: Vec<TokenKind>,
    /// Start from this position instead of the standard one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fen: Option<String>,
}

impl Default for GameSetup {
    fn default() -> Self {
        use TokenKind::*;
        Self {
            white: vec![Rook, Knight, Bishop],
            black: vec![Rook, Knight, Bishop],
            neutral: vec![Rook, Rook, Queen],
            fen: None,
        }
    }
}

impl GameSetup {
    pub fn pools(&self) -> Pools {
        Pools::new(&self.white, &self.black, &self.neutral)
    }

    pub fn rules(&self) -> Result<StandardChess, RulesError> {
        match &self.fen {
            Some(fen) => StandardChess::from_fen(fen),
            None => Ok(StandardChess::new()),
        }
    }
}
