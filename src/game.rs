//! Mafia game model: state, win conditions, and phase transition rules

pub mod graph;
pub mod phase;
pub mod state;
pub mod terminal;
pub mod transitions;

pub use graph::{GraphStats, StateEdge, StateGraph, StateNode};
pub use phase::Phase;
pub use state::GameState;
pub use terminal::{Faction, TerminalStatus, evaluate_terminal};
pub use transitions::{Event, FORCED_REVEAL_POPULATION, Transition, next_transitions};
