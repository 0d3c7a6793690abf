use crate::board::{Board, GameStatus, Outcome};
use crate::config::GameConfig;
use crate::errors::{GameError, GameResult};
use crate::players::{Role, Side};
use serde::{Deserialize, Serialize};

/// Where the round stands, from the coordinator's point of view.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "detail", rename_all = "snake_case")]
pub enum Phase {
    AwaitingHuman(Side),
    AwaitingOpponent(Side),
    RoundOver(Outcome),
}

/// Mutable state of one game: board, side to move, settings and phase.
///
/// The session survives between rounds; a new round resets it in place and
/// bumps `generation`, which is how deferred work from an older round is
/// recognised and dropped.
#[derive(Clone, Debug)]
pub struct GameSession {
    board: Board,
    to_move: Side,
    config: GameConfig,
    phase: Phase,
    generation: u64,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        let mut session = GameSession {
            board: Board::new(),
            to_move: Side::FIRST,
            config,
            phase: Phase::AwaitingHuman(Side::FIRST),
            generation: 0,
        };
        session.phase = session.awaiting(Side::FIRST);
        session
    }

    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn to_move(&self) -> Side {
        self.to_move
    }
    pub fn config(&self) -> GameConfig {
        self.config
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn generation(&self) -> u64 {
        self.generation
    }
    pub fn status(&self) -> GameStatus {
        self.board.status()
    }

    pub fn role_of(&self, side: Side) -> Role {
        match self.config.opponent() {
            Some(opponent) if opponent == side => Role::Opponent,
            _ => Role::Human,
        }
    }

    fn awaiting(&self, side: Side) -> Phase {
        match self.role_of(side) {
            Role::Human => Phase::AwaitingHuman(side),
            Role::Opponent => Phase::AwaitingOpponent(side),
        }
    }

    /// Starts a fresh round with `config`.
    pub(crate) fn reset(&mut self, config: GameConfig) {
        self.generation += 1;
        self.config = config;
        self.board = Board::new();
        self.to_move = Side::FIRST;
        self.phase = self.awaiting(Side::FIRST);
    }

    /// Checks that `side` may move now, given who controls it.
    pub(crate) fn check_turn(&self, side: Side, role: Role) -> GameResult<()> {
        let expected = match role {
            Role::Human => Phase::AwaitingHuman(side),
            Role::Opponent => Phase::AwaitingOpponent(side),
        };
        if self.phase == expected {
            return Ok(());
        }
        let reason = match self.phase {
            Phase::RoundOver(_) => "the round is over".to_owned(),
            Phase::AwaitingOpponent(_) => "waiting for the computer opponent".to_owned(),
            Phase::AwaitingHuman(current) => format!("it is side {current}'s turn"),
        };
        Err(GameError::illegal(side, reason))
    }

    /// Places `side`'s mark and moves the round forward. On error the
    /// session is unchanged.
    pub(crate) fn apply(&mut self, index: usize, side: Side) -> GameResult<GameStatus> {
        let board = self.board.place(index, side)?;
        self.board = board;
        let status = board.status();
        match status.outcome() {
            Some(outcome) => self.phase = Phase::RoundOver(outcome),
            None => {
                self.to_move = side.other();
                self.phase = self.awaiting(self.to_move);
            }
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;

    #[test]
    fn human_on_b_waits_for_opponent() {
        let session = GameSession::new(GameConfig::single(Difficulty::Optimal, Side::B));
        assert_eq!(session.phase(), Phase::AwaitingOpponent(Side::A));
        assert_eq!(session.role_of(Side::B), Role::Human);
        assert_eq!(session.role_of(Side::A), Role::Opponent);
    }

    #[test]
    fn multi_has_only_humans() {
        let session = GameSession::new(GameConfig::multi());
        assert_eq!(session.phase(), Phase::AwaitingHuman(Side::A));
        assert_eq!(session.role_of(Side::B), Role::Human);
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let mut session = GameSession::new(GameConfig::multi());
        session.apply(4, Side::A).unwrap();
        assert_eq!(session.apply(4, Side::B), Err(GameError::InvalidMove { index: 4 }));
        assert_eq!(session.to_move(), Side::B);
        assert_eq!(session.board().marks_of(Side::B), 0);
        assert!(session.check_turn(Side::A, Role::Human).is_err());
        assert!(session.check_turn(Side::B, Role::Human).is_ok());
    }

    #[test]
    fn reset_bumps_generation() {
        let mut session = GameSession::new(GameConfig::multi());
        session.apply(0, Side::A).unwrap();
        session.reset(GameConfig::default());
        assert_eq!(session.generation(), 1);
        assert_eq!(*session.board(), Board::new());
        assert_eq!(session.phase(), Phase::AwaitingHuman(Side::A));
    }
}
