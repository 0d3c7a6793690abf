use crate::errors::GameError;
use crate::players::Side;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

/// Pause before the opponent opens a round it starts.
pub const OPENING_DELAY: Duration = Duration::from_millis(300);
/// Pause before the opponent answers a human move.
pub const OPPONENT_DELAY: Duration = Duration::from_millis(250);
/// How long a finished round stays on screen before the next one starts.
pub const SETTLE_DELAY: Duration = Duration::from_millis(3000);

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Single,
    Multi,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[serde(alias = "easy")]
    Random,
    #[default]
    Medium,
    Hard,
    Optimal,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mode::Single => write!(f, "single"),
            Mode::Multi => write!(f, "multi"),
        }
    }
}

impl FromStr for Mode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Mode::Single),
            "multi" => Ok(Mode::Multi),
            other => Err(GameError::UnknownMode(other.to_owned())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Difficulty::Random => "random",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Optimal => "optimal",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "easy" => Ok(Difficulty::Random),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "optimal" => Ok(Difficulty::Optimal),
            other => Err(GameError::UnknownDifficulty(other.to_owned())),
        }
    }
}

/// Settings chosen by the player before a round. `difficulty` and `human`
/// only matter in single-player mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub human: Side,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            mode: Mode::Single,
            difficulty: Difficulty::Medium,
            human: Side::A,
        }
    }
}

impl GameConfig {
    pub fn single(difficulty: Difficulty, human: Side) -> Self {
        GameConfig {
            mode: Mode::Single,
            difficulty,
            human,
        }
    }

    pub fn multi() -> Self {
        GameConfig {
            mode: Mode::Multi,
            ..GameConfig::default()
        }
    }

    /// The side the computer plays, if any.
    pub fn opponent(&self) -> Option<Side> {
        match self.mode {
            Mode::Single => Some(self.human.other()),
            Mode::Multi => None,
        }
    }
}

/// Delays attached to deferred tasks. They only pace the game for a viewer;
/// game results do not depend on them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pacing {
    pub opening_delay: Duration,
    pub opponent_delay: Duration,
    pub settle_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing {
            opening_delay: OPENING_DELAY,
            opponent_delay: OPPONENT_DELAY,
            settle_delay: SETTLE_DELAY,
        }
    }
}

impl Pacing {
    pub fn immediate() -> Self {
        Pacing {
            opening_delay: Duration::ZERO,
            opponent_delay: Duration::ZERO,
            settle_delay: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_text_round_trips() {
        for difficulty in [Difficulty::Random, Difficulty::Medium, Difficulty::Hard, Difficulty::Optimal] {
            assert_eq!(difficulty.to_string().parse::<Difficulty>(), Ok(difficulty));
        }
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Random));
        assert_eq!(
            "brutal".parse::<Difficulty>(),
            Err(GameError::UnknownDifficulty("brutal".to_owned()))
        );
    }

    #[test]
    fn mode_text_round_trips() {
        assert_eq!(Mode::Single.to_string().parse::<Mode>(), Ok(Mode::Single));
        assert_eq!(" MULTI ".parse::<Mode>(), Ok(Mode::Multi));
        assert!("network".parse::<Mode>().is_err());
    }

    #[test]
    fn config_reads_partial_json() {
        let config: GameConfig = serde_json::from_str(r#"{"difficulty": "easy", "human": "B"}"#).unwrap();
        assert_eq!(config, GameConfig::single(Difficulty::Random, Side::B));
        let config: GameConfig = serde_json::from_str(r#"{"mode": "multi"}"#).unwrap();
        assert_eq!(config.opponent(), None);
    }

    #[test]
    fn opponent_is_the_other_side() {
        assert_eq!(GameConfig::single(Difficulty::Hard, Side::A).opponent(), Some(Side::B));
        assert_eq!(Pacing::immediate().settle_delay, Duration::ZERO);
        assert_eq!(Pacing::default().opponent_delay, OPPONENT_DELAY);
    }
}
