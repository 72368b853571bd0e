//! Exact town win probabilities for Mafia games.
//!
//! This crate provides:
//! - The game model: role counts, phases, win conditions and transition rules
//! - A memoized exact solver over the DAG of reachable states
//! - State graph construction with DOT, GraphML, JSON and CSV export
//! - Monte Carlo playouts and consistency checks to cross-validate results

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod game;
pub mod simulation;
pub mod solver;
pub mod types;
pub mod verification;

pub use config::{GameConfig, SolverConfig};
pub use error::{Error, Result};
pub use game::{Event, Faction, GameState, Phase, StateGraph, TerminalStatus, Transition};
pub use solver::{WinProbabilitySolver, win_probability, win_probability_naive};
pub use types::Probability;
