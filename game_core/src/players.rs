use crate::board::{Board, Cell, CENTER, CORNERS, WIN_LINES};
use crate::config::Difficulty;
use crate::errors::{GameError, GameResult};
use crate::minimax::OptimalPolicy;
use rand::prelude::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One of the two players. A always places the first mark of a round.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

/// Who controls a side in the current round.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Human,
    Opponent,
}

impl Side {
    pub const FIRST: Side = Side::A;

    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
    pub fn as_char(self) -> char {
        match self {
            Side::A => 'X',
            Side::B => 'O',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

impl FromStr for Side {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "x" => Ok(Side::A),
            "b" | "o" => Ok(Side::B),
            other => Err(GameError::UnknownSide(other.to_owned())),
        }
    }
}

/// A strategy that picks a cell for `acting` to mark.
///
/// Implementations never modify the board and fail with
/// [`GameError::NoLegalMove`] when there is no empty cell left.
pub trait Policy {
    fn name(&self) -> &str;
    fn choose(
        &self,
        board: &Board,
        acting: Side,
        opponent: Side,
        rng: &mut dyn RngCore,
    ) -> GameResult<usize>;
}

impl Difficulty {
    pub fn policy(self) -> Box<dyn Policy> {
        match self {
            Difficulty::Random => Box::new(RandomPolicy),
            Difficulty::Medium => Box::new(MediumPolicy),
            Difficulty::Hard => Box::new(HardPolicy),
            Difficulty::Optimal => Box::new(OptimalPolicy),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPolicy;

#[derive(Clone, Copy, Debug, Default)]
pub struct MediumPolicy;

#[derive(Clone, Copy, Debug, Default)]
pub struct HardPolicy;

fn random_cell(board: &Board, rng: &mut dyn RngCore) -> GameResult<usize> {
    board
        .empty_cells()
        .choose(rng)
        .copied()
        .ok_or(GameError::NoLegalMove)
}

/// The empty cell of the first line where `side` already holds the other two.
pub fn completing_cell(board: &Board, side: Side) -> Option<usize> {
    WIN_LINES.iter().find_map(|line| {
        let held = line.iter().filter(|&&i| board[i] == Cell::Mark(side)).count();
        let open = line.iter().copied().find(|&i| board[i].is_empty());
        match (held, open) {
            (2, Some(index)) => Some(index),
            _ => None,
        }
    })
}

impl MediumPolicy {
    /// Win if possible, otherwise block. `None` when neither applies.
    pub fn tactical(board: &Board, acting: Side, opponent: Side) -> Option<usize> {
        completing_cell(board, acting).or_else(|| completing_cell(board, opponent))
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }
    fn choose(&self, board: &Board, _acting: Side, _opponent: Side, rng: &mut dyn RngCore) -> GameResult<usize> {
        random_cell(board, rng)
    }
}

impl Policy for MediumPolicy {
    fn name(&self) -> &str {
        "medium"
    }
    fn choose(&self, board: &Board, acting: Side, opponent: Side, rng: &mut dyn RngCore) -> GameResult<usize> {
        if board.is_full() {
            return Err(GameError::NoLegalMove);
        }
        match Self::tactical(board, acting, opponent) {
            Some(index) => Ok(index),
            None => random_cell(board, rng),
        }
    }
}

impl Policy for HardPolicy {
    fn name(&self) -> &str {
        "hard"
    }
    fn choose(&self, board: &Board, acting: Side, opponent: Side, rng: &mut dyn RngCore) -> GameResult<usize> {
        if board.is_full() {
            return Err(GameError::NoLegalMove);
        }
        if let Some(index) = MediumPolicy::tactical(board, acting, opponent) {
            return Ok(index);
        }
        if board[CENTER].is_empty() {
            return Ok(CENTER);
        }
        let corners: Vec<usize> = CORNERS.iter().copied().filter(|&i| board[i].is_empty()).collect();
        match corners.choose(rng) {
            Some(&corner) => Ok(corner),
            None => random_cell(board, rng),
        }
    }
}
