//! Shared argument groups for CLI commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::{GameConfig, SolverConfig};

/// Initial table, from a JSON file and/or individual overrides.
///
/// Flags override values read from `--config`; anything unset falls back to
/// the default table of six town, three mafia and a sheriff.
#[derive(Args, Debug, Clone, Default)]
pub struct GameArgs {
    /// JSON file with the initial configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Unrevealed ordinary town members (sheriff not included)
    #[arg(long, short = 't', allow_negative_numbers = true)]
    pub town: Option<i64>,

    /// Town members already known to be town
    #[arg(long, allow_negative_numbers = true)]
    pub revealed_town: Option<i64>,

    /// Unrevealed mafia members
    #[arg(long, short = 'm', allow_negative_numbers = true)]
    pub mafia: Option<i64>,

    /// Mafia members already exposed
    #[arg(long, allow_negative_numbers = true)]
    pub revealed_mafia: Option<i64>,

    /// Whether a sheriff is in play (true or false)
    #[arg(long)]
    pub sheriff: Option<bool>,
}

impl GameArgs {
    pub fn resolve(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)
                .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
            None => GameConfig::default(),
        };

        if let Some(town) = self.town {
            config.unrevealed_town = town;
        }
        if let Some(revealed) = self.revealed_town {
            config.revealed_town = revealed;
        }
        if let Some(mafia) = self.mafia {
            config.unrevealed_mafia = mafia;
        }
        if let Some(revealed) = self.revealed_mafia {
            config.revealed_mafia = revealed;
        }
        if let Some(sheriff) = self.sheriff {
            config.has_sheriff = sheriff;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Solver safety limits.
#[derive(Args, Debug, Clone, Default)]
pub struct SolverArgs {
    /// Abort after this many distinct states
    #[arg(long)]
    pub max_states: Option<usize>,
}

impl SolverArgs {
    pub fn solver_config(&self) -> SolverConfig {
        match self.max_states {
            Some(limit) => SolverConfig::default().with_max_states(limit),
            None => SolverConfig::default(),
        }
    }
}
