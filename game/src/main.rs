use anyhow::{bail, Context, Result};
use clap::Parser;
use game_core::board::Outcome;
use game_core::config::{GameConfig, Pacing};
use game_core::players::{Role, Side};
use game_core::session::Phase;
use game_core::{Deferred, Difficulty, Event, Game, Mode, Presenter};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::thread;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod input;

use input::Command;

/// Tic-tac-toe against the computer or a friend on the same terminal.
#[derive(Parser, Debug)]
#[command(name = "game", version)]
struct Cli {
    /// single or multi
    #[arg(long)]
    mode: Option<Mode>,

    /// random (easy), medium, hard or optimal
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Side the human plays in single-player mode: a (moves first) or b
    #[arg(long)]
    human: Option<Side>,

    /// JSON file with mode, difficulty and human; flags win over it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the computer's random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many finished rounds
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// No pauses between moves
    #[arg(long)]
    fast: bool,

    /// Print events as JSON lines instead of drawing the board
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("reading game settings from {}", path.display()))?
            }
            None => GameConfig::default(),
        };
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(human) = self.human {
            config.human = human;
        }
        Ok(config)
    }
}

struct Terminal {
    mode: Mode,
    json: bool,
}

impl Terminal {
    fn say(&self, event: &Event) -> String {
        match event {
            Event::BoardChanged { board } => format!("\n{}\n", board.render()),
            Event::TurnChanged { role: Role::Opponent, .. } => "Computer is thinking...".to_owned(),
            Event::TurnChanged { side, .. } => match self.mode {
                Mode::Single => "Your turn!".to_owned(),
                Mode::Multi => format!("Player {} turn", side.as_char()),
            },
            Event::RoundEnded {
                outcome: Outcome::Drawn,
                ..
            } => "DRAW".to_owned(),
            Event::RoundEnded {
                outcome: Outcome::Won { side, .. },
                winner_role,
            } => match (self.mode, winner_role) {
                (Mode::Single, Some(Role::Human)) => "YOU WIN!".to_owned(),
                (Mode::Single, _) => "YOU LOSE!".to_owned(),
                (Mode::Multi, _) => format!("Player {} wins!", side.as_char()),
            },
        }
    }
}

impl Presenter for Terminal {
    fn present(&mut self, event: &Event) {
        if !self.json {
            println!("{}", self.say(event));
            return;
        }
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(err) => warn!(%err, "could not encode event"),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.game_config()?;
    let pacing = if cli.fast { Pacing::immediate() } else { Pacing::default() };
    let terminal = Terminal {
        mode: config.mode,
        json: cli.json,
    };
    let mut game = match cli.seed {
        Some(seed) => Game::with_seed(config, pacing, terminal, seed),
        None => Game::new(config, pacing, terminal),
    };

    let mut pending = game.start_game(config);
    let mut finished = 0;
    let mut lines = io::stdin().lock().lines();
    loop {
        while let Some(ticket) = pending.take() {
            if ticket.task == Deferred::Restart {
                finished += 1;
                if finished >= cli.rounds {
                    info!(rounds = finished, "done");
                    return Ok(());
                }
            }
            thread::sleep(ticket.delay);
            pending = game.fire(ticket)?;
        }

        let side = match game.phase() {
            Phase::AwaitingHuman(side) => side,
            other => bail!("no move to wait for in phase {other:?}"),
        };
        if !cli.json {
            println!("{} to move (1-9, 'row col', r, q):", side.as_char());
        }
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line.context("reading a move from stdin")?;
        match input::parse(&line) {
            Ok(Command::Quit) => return Ok(()),
            Ok(Command::Restart) => pending = game.restart(),
            Ok(Command::Cell(index)) => match game.submit_move(index, side) {
                Ok(ticket) => pending = ticket,
                Err(err) => println!("{err}, please, try again."),
            },
            Err(err) => println!("{err}"),
        }
    }
}
