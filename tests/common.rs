//! Shared helpers for the mafia-odds integration tests.

#![allow(dead_code)]

use mafia_odds::{GameState, Probability, WinProbabilitySolver};

/// Exact rational from a `"n/d"` literal.
pub fn p(text: &str) -> Probability {
    text.parse()
        .unwrap_or_else(|e| panic!("bad probability literal {text}: {e}"))
}

/// Check-phase table with nobody revealed.
pub fn table(town: u32, mafia: u32, sheriff: bool) -> GameState {
    GameState::initial(town, 0, mafia, 0, sheriff)
}

pub fn solve(state: GameState) -> Probability {
    WinProbabilitySolver::default()
        .win_probability(&state)
        .unwrap_or_else(|e| panic!("solving {state} failed: {e}"))
}
