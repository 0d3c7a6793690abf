use thiserror::Error;

use crate::players::Side;

/// Every way a call into the game core can be rejected.
///
/// A rejected call never leaves a partial change behind: the board, the
/// side to move and the phase are exactly what they were before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid move: cell {index} is out of range or already taken")]
    InvalidMove { index: usize },

    #[error("illegal move by side {side}: {reason}")]
    IllegalMove { side: Side, reason: String },

    #[error("no legal move: the board is full")]
    NoLegalMove,

    #[error("unknown mode '{0}', expected 'single' or 'multi'")]
    UnknownMode(String),

    #[error("unknown difficulty '{0}', expected one of random, medium, hard, optimal")]
    UnknownDifficulty(String),

    #[error("unknown side '{0}', expected 'a' or 'b'")]
    UnknownSide(String),
}

pub type GameResult<T> = Result<T, GameError>;

impl GameError {
    pub fn illegal(side: Side, reason: impl Into<String>) -> Self {
        Self::IllegalMove {
            side,
            reason: reason.into(),
        }
    }
}
