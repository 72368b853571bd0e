//! Initial game configuration and solver limits.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, game::GameState};

/// Role counts at the start of a game.
///
/// Counts are signed so that malformed input (negative values from a file or
/// the command line) can be represented and rejected by [`GameConfig::validate`].
///
/// # Examples
///
/// ```
/// use mafia_odds::config::GameConfig;
///
/// let config = GameConfig::new(6, 3).with_sheriff(true);
/// let state = config.initial_state().unwrap();
/// assert_eq!(state.population(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub unrevealed_town: i64,
    pub revealed_town: i64,
    pub unrevealed_mafia: i64,
    pub revealed_mafia: i64,
    pub has_sheriff: bool,
}

impl GameConfig {
    /// Town and mafia counts with nobody revealed and no sheriff.
    pub fn new(unrevealed_town: i64, unrevealed_mafia: i64) -> Self {
        Self {
            unrevealed_town,
            revealed_town: 0,
            unrevealed_mafia,
            revealed_mafia: 0,
            has_sheriff: false,
        }
    }

    pub fn with_revealed_town(mut self, count: i64) -> Self {
        self.revealed_town = count;
        self
    }

    pub fn with_revealed_mafia(mut self, count: i64) -> Self {
        self.revealed_mafia = count;
        self
    }

    pub fn with_sheriff(mut self, has_sheriff: bool) -> Self {
        self.has_sheriff = has_sheriff;
        self
    }

    /// Reject negative counts and tables where town is already outnumbered.
    ///
    /// Every rule preserves "town headcount exceeds mafia headcount" until a
    /// win condition fires, so a configuration starting below parity describes
    /// states the game can never reach.
    pub fn validate(&self) -> Result<()> {
        self.initial_state().map(|_| ())
    }

    /// The Check-phase starting state described by this configuration.
    pub fn initial_state(&self) -> Result<GameState> {
        let unrevealed_town = count("unrevealed_town", self.unrevealed_town)?;
        let revealed_town = count("revealed_town", self.revealed_town)?;
        let unrevealed_mafia = count("unrevealed_mafia", self.unrevealed_mafia)?;
        let revealed_mafia = count("revealed_mafia", self.revealed_mafia)?;

        let state = GameState::initial(
            unrevealed_town,
            revealed_town,
            unrevealed_mafia,
            revealed_mafia,
            self.has_sheriff,
        );

        if state.town_headcount() < state.mafia_headcount() {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "town headcount {} is below mafia headcount {}",
                    state.town_headcount(),
                    state.mafia_headcount()
                ),
            });
        }

        Ok(state)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open configuration {}", path.display()),
            source,
        })?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    pub fn save_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create configuration {}", path.display()),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

impl Default for GameConfig {
    /// Six town, three mafia, one sheriff.
    fn default() -> Self {
        Self::new(6, 3).with_sheriff(true)
    }
}

fn count(field: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::InvalidConfiguration {
        message: if value < 0 {
            format!("{field} must be non-negative, got {value}")
        } else {
            format!("{field} is too large: {value}")
        },
    })
}

/// Safety limits for a solver run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Abort once this many distinct states have been memoized.
    pub max_states: Option<usize>,
}

impl SolverConfig {
    pub fn with_max_states(mut self, limit: usize) -> Self {
        self.max_states = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Phase;

    #[test]
    fn default_is_six_town_three_mafia_with_sheriff() {
        let state = GameConfig::default().initial_state().unwrap();
        assert_eq!(state, GameState::new(6, 0, 3, 0, true, false, Phase::Check));
    }

    #[test]
    fn negative_counts_are_rejected() {
        let err = GameConfig::new(-1, 1).initial_state().unwrap_err();
        assert!(
            matches!(&err, Error::InvalidConfiguration { message } if message.contains("unrevealed_town"))
        );

        let err = GameConfig::new(3, 1)
            .with_revealed_mafia(-2)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn town_minority_is_rejected() {
        let err = GameConfig::new(0, 1).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn parity_and_empty_tables_are_accepted() {
        assert!(GameConfig::new(0, 0).validate().is_ok());
        assert!(GameConfig::new(1, 1).validate().is_ok());
        assert!(GameConfig::new(0, 1).with_sheriff(true).validate().is_ok());
    }

    #[test]
    fn missing_json_fields_fall_back_to_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"unrevealed_town": 4}"#).unwrap();
        assert_eq!(config.unrevealed_town, 4);
        assert_eq!(config.unrevealed_mafia, 3);
        assert!(config.has_sheriff);
    }

    #[test]
    fn solver_config_builder() {
        assert_eq!(SolverConfig::default().max_states, None);
        assert_eq!(SolverConfig::default().with_max_states(10).max_states, Some(10));
    }
}
