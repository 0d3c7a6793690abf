//! Full-depth minimax for the strongest opponent.
//!
//! The search walks every legal continuation down to a finished board. A
//! board is a `Copy` value, so each hypothetical move lives in its own
//! snapshot and nothing has to be undone on the way back up.
//!
//! Scores are taken from the point of view of the side the search was
//! started for: a win for that side is `+10`, a loss `-10`, a draw `0`.
//! There is no depth discount. Among equal scores the lowest cell index
//! wins, so on an empty board the opening move is always cell 0.

use crate::board::{Board, GameStatus};
use crate::errors::{GameError, GameResult};
use crate::players::{Policy, Side};
use rand::RngCore;

pub const WIN_SCORE: i32 = 10;
pub const DRAW_SCORE: i32 = 0;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Scored {
    pub index: usize,
    pub score: i32,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OptimalPolicy;

impl Policy for OptimalPolicy {
    fn name(&self) -> &str {
        "optimal"
    }
    fn choose(&self, board: &Board, acting: Side, opponent: Side, _rng: &mut dyn RngCore) -> GameResult<usize> {
        best_move(board, acting, opponent).map(|best| best.index)
    }
}

/// Best cell for `maximizer`, who is to move, against `minimizer`.
pub fn best_move(board: &Board, maximizer: Side, minimizer: Side) -> GameResult<Scored> {
    select(board, maximizer, maximizer, minimizer)
}

fn select(board: &Board, to_move: Side, maximizer: Side, minimizer: Side) -> GameResult<Scored> {
    let maximizing = to_move == maximizer;
    let next = if maximizing { minimizer } else { maximizer };
    let mut best: Option<Scored> = None;
    for index in board.empty_cells() {
        let child = board.place(index, to_move)?;
        let score = score(&child, next, maximizer, minimizer)?;
        let improves = match best {
            None => true,
            Some(current) if maximizing => score > current.score,
            Some(current) => score < current.score,
        };
        if improves {
            best = Some(Scored { index, score });
        }
    }
    best.ok_or(GameError::NoLegalMove)
}

fn score(board: &Board, to_move: Side, maximizer: Side, minimizer: Side) -> GameResult<i32> {
    match board.status() {
        GameStatus::Won { side, .. } if side == maximizer => Ok(WIN_SCORE),
        GameStatus::Won { .. } => Ok(-WIN_SCORE),
        GameStatus::Drawn => Ok(DRAW_SCORE),
        GameStatus::InProgress => select(board, to_move, maximizer, minimizer).map(|best| best.score),
    }
}
