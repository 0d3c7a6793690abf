use crate::board::{Board, GameStatus, Outcome};
use crate::config::{GameConfig, Pacing};
use crate::errors::GameResult;
use crate::players::{Policy, Role, Side};
use crate::session::{GameSession, Phase};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub mod board;
pub mod config;
pub mod errors;
pub mod minimax;
pub mod players;
pub mod session;

pub use crate::config::{Difficulty, Mode};
pub use crate::errors::GameError;

/// Work the coordinator wants done later, after a pause.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deferred {
    OpponentMove,
    Restart,
}

/// A deferred task handed to the host. The host waits `delay` and passes
/// the ticket back to [`Game::fire`]. Tickets from an earlier round are
/// ignored when fired.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ticket {
    pub generation: u64,
    pub task: Deferred,
    pub delay: Duration,
}

/// Notifications for whatever draws the game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    BoardChanged { board: Board },
    TurnChanged { side: Side, role: Role },
    RoundEnded { outcome: Outcome, winner_role: Option<Role> },
}

pub trait Presenter {
    fn present(&mut self, event: &Event);
}

impl Presenter for Vec<Event> {
    fn present(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

/// Turn coordinator. Owns the session and is the only thing that changes it.
pub struct Game<P: Presenter> {
    session: GameSession,
    pacing: Pacing,
    policy: Box<dyn Policy>,
    presenter: P,
    rng: StdRng,
}

impl<P: Presenter> Game<P> {
    pub fn new(config: GameConfig, pacing: Pacing, presenter: P) -> Self {
        Self::with_rng(config, pacing, presenter, StdRng::from_entropy())
    }

    /// Same as [`Game::new`] but the opponent's random choices repeat for a given seed.
    pub fn with_seed(config: GameConfig, pacing: Pacing, presenter: P, seed: u64) -> Self {
        Self::with_rng(config, pacing, presenter, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, pacing: Pacing, presenter: P, rng: StdRng) -> Self {
        Game {
            session: GameSession::new(config),
            pacing,
            policy: config.difficulty.policy(),
            presenter,
            rng,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }
    pub fn board(&self) -> &Board {
        self.session.board()
    }
    pub fn status(&self) -> GameStatus {
        self.session.status()
    }
    pub fn phase(&self) -> Phase {
        self.session.phase()
    }
    pub fn config(&self) -> GameConfig {
        self.session.config()
    }
    pub fn pacing(&self) -> Pacing {
        self.pacing
    }
    pub fn presenter(&self) -> &P {
        &self.presenter
    }
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Clears the board and starts a round. Any ticket issued before this
    /// call becomes stale. Returns the opening ticket when the computer
    /// plays the first mark.
    pub fn start_game(&mut self, config: GameConfig) -> Option<Ticket> {
        self.session.reset(config);
        self.policy = config.difficulty.policy();
        info!(
            generation = self.session.generation(),
            mode = %config.mode,
            difficulty = %config.difficulty,
            human = %config.human,
            "round started"
        );
        self.emit(Event::BoardChanged {
            board: *self.session.board(),
        });
        self.emit_turn();
        match self.session.phase() {
            Phase::AwaitingOpponent(_) => Some(self.ticket(Deferred::OpponentMove, self.pacing.opening_delay)),
            _ => None,
        }
    }

    pub fn restart(&mut self) -> Option<Ticket> {
        self.start_game(self.session.config())
    }

    /// Switches mode, difficulty or human side. Always begins a new round.
    pub fn reconfigure(&mut self, config: GameConfig) -> Option<Ticket> {
        if config != self.session.config() {
            debug!(from = ?self.session.config(), to = ?config, "settings changed");
        }
        self.start_game(config)
    }

    /// A human move for `side`.
    pub fn submit_move(&mut self, index: usize, side: Side) -> GameResult<Option<Ticket>> {
        self.session.check_turn(side, Role::Human)?;
        self.play(index, side)
    }

    /// Runs a deferred task. Stale tickets are dropped without effect.
    pub fn fire(&mut self, ticket: Ticket) -> GameResult<Option<Ticket>> {
        if ticket.generation != self.session.generation() {
            debug!(
                ticket = ticket.generation,
                current = self.session.generation(),
                task = ?ticket.task,
                "dropping stale ticket"
            );
            return Ok(None);
        }
        match ticket.task {
            Deferred::OpponentMove => self.opponent_move(),
            Deferred::Restart => Ok(self.restart()),
        }
    }

    fn opponent_move(&mut self) -> GameResult<Option<Ticket>> {
        let side = self.session.to_move();
        self.session.check_turn(side, Role::Opponent)?;
        let index = self
            .policy
            .choose(self.session.board(), side, side.other(), &mut self.rng)?;
        debug!(policy = self.policy.name(), side = %side, index, "opponent chose a cell");
        self.play(index, side)
    }

    fn play(&mut self, index: usize, side: Side) -> GameResult<Option<Ticket>> {
        let status = self.session.apply(index, side)?;
        self.emit(Event::BoardChanged {
            board: *self.session.board(),
        });
        match status.outcome() {
            Some(outcome) => {
                let winner_role = match outcome {
                    Outcome::Won { side, .. } => Some(self.session.role_of(side)),
                    Outcome::Drawn => None,
                };
                info!(?outcome, ?winner_role, "round over");
                self.emit(Event::RoundEnded { outcome, winner_role });
                Ok(Some(self.ticket(Deferred::Restart, self.pacing.settle_delay)))
            }
            None => {
                self.emit_turn();
                match self.session.phase() {
                    Phase::AwaitingOpponent(_) => Ok(Some(self.ticket(Deferred::OpponentMove, self.pacing.opponent_delay))),
                    _ => Ok(None),
                }
            }
        }
    }

    fn ticket(&self, task: Deferred, delay: Duration) -> Ticket {
        Ticket {
            generation: self.session.generation(),
            task,
            delay,
        }
    }

    fn emit_turn(&mut self) {
        let side = self.session.to_move();
        let role = self.session.role_of(side);
        self.emit(Event::TurnChanged { side, role });
    }

    fn emit(&mut self, event: Event) {
        self.presenter.present(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(config: GameConfig) -> Game<Vec<Event>> {
        Game::with_seed(config, Pacing::immediate(), Vec::new(), 3)
    }

    #[test]
    fn start_announces_board_and_turn() {
        let mut game = game(GameConfig::multi());
        assert_eq!(game.start_game(GameConfig::multi()), None);
        assert_eq!(
            game.presenter().as_slice(),
            &[
                Event::BoardChanged { board: Board::new() },
                Event::TurnChanged {
                    side: Side::A,
                    role: Role::Human
                },
            ]
        );
    }

    #[test]
    fn opponent_answers_through_a_ticket() {
        let config = GameConfig::single(Difficulty::Hard, Side::A);
        let mut game = Game::with_seed(config, Pacing::default(), Vec::new(), 3);
        game.start_game(config);
        let ticket = game.submit_move(0, Side::A).unwrap().unwrap();
        assert_eq!(ticket.task, Deferred::OpponentMove);
        assert_eq!(ticket.delay, Pacing::default().opponent_delay);
        assert_eq!(game.phase(), Phase::AwaitingOpponent(Side::B));
        assert_eq!(game.fire(ticket), Ok(None));
        // Hard takes the centre when nothing is threatened.
        assert_eq!(game.board()[4], board::Cell::Mark(Side::B));
        assert_eq!(game.phase(), Phase::AwaitingHuman(Side::A));
    }

    #[test]
    fn out_of_turn_move_emits_nothing() {
        let config = GameConfig::single(Difficulty::Random, Side::A);
        let mut game = game(config);
        game.start_game(config);
        game.submit_move(4, Side::A).unwrap();
        let before = game.presenter().len();
        assert!(matches!(game.submit_move(0, Side::A), Err(GameError::IllegalMove { .. })));
        assert!(matches!(game.submit_move(0, Side::B), Err(GameError::IllegalMove { .. })));
        assert_eq!(game.presenter().len(), before);
        assert_eq!(game.board().empty_cells().len(), 8);
    }

    #[test]
    fn double_fired_opponent_ticket_is_rejected() {
        let config = GameConfig::single(Difficulty::Medium, Side::A);
        let mut game = game(config);
        game.start_game(config);
        let ticket = game.submit_move(4, Side::A).unwrap().unwrap();
        game.fire(ticket).unwrap();
        assert!(matches!(game.fire(ticket), Err(GameError::IllegalMove { .. })));
        assert_eq!(game.board().empty_cells().len(), 7);
    }
}
