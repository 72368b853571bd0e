//! Monte Carlo playouts.
//!
//! Plays sampled games with the same transition rules the exact solver uses.
//! The empirical win rate is an independent sanity check on the exact value,
//! never a replacement for it.

use indicatif::ProgressBar;
use rand::{
    Rng, SeedableRng,
    distr::{Distribution, weighted::WeightedIndex},
    random,
    rngs::StdRng,
};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

use crate::{
    Error, Result,
    game::{Event, Faction, GameState, TerminalStatus, next_transitions},
    types::Probability,
};

/// Settings for a batch of playouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub games: usize,
    pub seed: Option<u64>,
    /// Two-sided confidence level for the reported interval
    pub confidence: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            games: 10_000,
            seed: None,
            confidence: 0.95,
        }
    }
}

impl SimulationConfig {
    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.games == 0 {
            return Err(Error::InvalidConfiguration {
                message: "simulation needs at least one game".to_string(),
            });
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "confidence level must be strictly between 0 and 1, got {}",
                    self.confidence
                ),
            });
        }
        Ok(())
    }
}

/// One sampled game from start to finish.
#[derive(Debug, Clone)]
pub struct PlayedGame {
    pub winner: Faction,
    pub events: Vec<Event>,
    pub final_state: GameState,
}

/// Aggregate outcome of a batch of playouts.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub games: usize,
    pub town_wins: usize,
    pub win_rate: f64,
    pub confidence: f64,
    pub confidence_low: f64,
    pub confidence_high: f64,
    pub mean_events: f64,
}

impl SimulationReport {
    /// Whether `exact` falls inside the confidence interval.
    pub fn covers(&self, exact: &Probability) -> bool {
        let value = exact.to_f64();
        self.confidence_low <= value && value <= self.confidence_high
    }
}

/// Play one game from `initial`, drawing each transition with its exact
/// probability.
pub fn play_game<R: Rng>(initial: &GameState, rng: &mut R) -> Result<PlayedGame> {
    let mut state = *initial;
    let mut events = Vec::new();

    loop {
        if let TerminalStatus::Over(winner) = state.terminal_status() {
            return Ok(PlayedGame {
                winner,
                events,
                final_state: state,
            });
        }

        let transitions = next_transitions(&state)?;
        let weights = WeightedIndex::new(transitions.iter().map(|t| t.probability.to_f64()))
            .map_err(|e| Error::UnreachableState {
                state: state.to_string(),
                reason: format!("cannot sample successors: {e}"),
            })?;

        let transition = &transitions[weights.sample(rng)];
        events.push(transition.event);
        state = transition.next;
    }
}

/// Seeded driver for batches of playouts.
pub struct Simulator {
    config: SimulationConfig,
    rng: StdRng,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(random()),
        };
        Ok(Self { config, rng })
    }

    pub fn run(&mut self, initial: &GameState) -> Result<SimulationReport> {
        self.run_with_progress(initial, None)
    }

    pub fn run_with_progress(
        &mut self,
        initial: &GameState,
        progress: Option<&ProgressBar>,
    ) -> Result<SimulationReport> {
        let games = self.config.games;
        let mut town_wins = 0usize;
        let mut total_events = 0usize;

        for _ in 0..games {
            let game = play_game(initial, &mut self.rng)?;
            if game.winner == Faction::Town {
                town_wins += 1;
            }
            total_events += game.events.len();
            if let Some(bar) = progress {
                bar.inc(1);
            }
        }

        let n = games as f64;
        let win_rate = town_wins as f64 / n;
        let z = normal_quantile(0.5 + self.config.confidence / 2.0)?;
        let half_width = z * (win_rate * (1.0 - win_rate) / n).sqrt();

        let report = SimulationReport {
            games,
            town_wins,
            win_rate,
            confidence: self.config.confidence,
            confidence_low: (win_rate - half_width).max(0.0),
            confidence_high: (win_rate + half_width).min(1.0),
            mean_events: total_events as f64 / n,
        };
        debug!(
            %initial,
            games,
            win_rate = report.win_rate,
            "simulation finished"
        );
        Ok(report)
    }
}

fn normal_quantile(p: f64) -> Result<f64> {
    let standard = Normal::new(0.0, 1.0).map_err(|e| Error::InvalidConfiguration {
        message: format!("standard normal distribution: {e}"),
    })?;
    Ok(standard.inverse_cdf(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::win_probability;

    #[test]
    fn played_games_end_in_terminal_states() {
        let mut rng = StdRng::seed_from_u64(3);
        let initial = GameState::initial(6, 0, 3, 0, true);
        for _ in 0..50 {
            let game = play_game(&initial, &mut rng).unwrap();
            assert!(game.final_state.is_terminal());
            assert_eq!(game.final_state.winner(), Some(game.winner));
            assert!(!game.events.is_empty());
        }
    }

    #[test]
    fn terminal_start_plays_no_events() {
        let mut rng = StdRng::seed_from_u64(3);
        let game = play_game(&GameState::initial(2, 0, 0, 0, false), &mut rng).unwrap();
        assert_eq!(game.winner, Faction::Town);
        assert!(game.events.is_empty());
    }

    #[test]
    fn certain_transitions_are_always_taken() {
        // (2,0,1,0) without sheriff has a single path to a mafia win.
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let game = play_game(&GameState::initial(2, 0, 1, 0, false), &mut rng).unwrap();
            assert_eq!(game.winner, Faction::Mafia);
            assert_eq!(
                game.events,
                vec![Event::CheckSkipped, Event::MafiaShootsTown]
            );
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let initial = GameState::initial(5, 0, 2, 0, true);
        let config = SimulationConfig::default().with_games(200).with_seed(11);
        let a = Simulator::new(config.clone()).unwrap().run(&initial).unwrap();
        let b = Simulator::new(config).unwrap().run(&initial).unwrap();
        assert_eq!(a.town_wins, b.town_wins);
    }

    #[test]
    fn estimate_agrees_with_exact_value() {
        let initial = GameState::initial(6, 0, 3, 0, true);
        let exact = win_probability(&initial).unwrap();
        let config = SimulationConfig::default()
            .with_games(20_000)
            .with_seed(2024)
            .with_confidence(0.999);
        let report = Simulator::new(config).unwrap().run(&initial).unwrap();
        assert!(
            report.covers(&exact),
            "exact {} outside [{}, {}]",
            exact.to_decimal(4),
            report.confidence_low,
            report.confidence_high
        );
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert!(Simulator::new(SimulationConfig::default().with_games(0)).is_err());
        assert!(Simulator::new(SimulationConfig::default().with_confidence(1.0)).is_err());
    }
}
