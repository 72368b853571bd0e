//! Game state representation

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    Phase,
    terminal::{self, Faction, TerminalStatus},
    transitions::{self, Transition},
};

/// A snapshot of game progress.
///
/// States are plain values: every rule produces a new state and never edits
/// an existing one, so the full tuple doubles as the memoization key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameState {
    /// Town members whose faction mafia does not know yet
    pub unrevealed_town: u32,
    /// Town members known to be town (checked by the sheriff) but still alive
    pub revealed_town: u32,
    /// Mafia members not yet exposed
    pub unrevealed_mafia: u32,
    /// Exposed mafia members still in play
    pub revealed_mafia: u32,
    /// A living sheriff exists among the town
    pub has_sheriff: bool,
    /// Mafia knows who the sheriff is (or was)
    pub sheriff_revealed: bool,
    pub phase: Phase,
}

impl GameState {
    pub fn new(
        unrevealed_town: u32,
        revealed_town: u32,
        unrevealed_mafia: u32,
        revealed_mafia: u32,
        has_sheriff: bool,
        sheriff_revealed: bool,
        phase: Phase,
    ) -> Self {
        Self {
            unrevealed_town,
            revealed_town,
            unrevealed_mafia,
            revealed_mafia,
            has_sheriff,
            sheriff_revealed,
            phase,
        }
    }

    /// Starting position: Check phase, sheriff identity hidden.
    pub fn initial(
        unrevealed_town: u32,
        revealed_town: u32,
        unrevealed_mafia: u32,
        revealed_mafia: u32,
        has_sheriff: bool,
    ) -> Self {
        Self::new(
            unrevealed_town,
            revealed_town,
            unrevealed_mafia,
            revealed_mafia,
            has_sheriff,
            false,
            Phase::Check,
        )
    }

    /// Living non-mafia players, the sheriff counted once while alive.
    pub fn town_headcount(&self) -> u32 {
        self.unrevealed_town + self.revealed_town + u32::from(self.has_sheriff)
    }

    pub fn mafia_headcount(&self) -> u32 {
        self.unrevealed_mafia + self.revealed_mafia
    }

    /// Every living player.
    pub fn population(&self) -> u32 {
        self.town_headcount() + self.mafia_headcount()
    }

    /// Players the sheriff has not checked yet.
    pub fn unrevealed_count(&self) -> u32 {
        self.unrevealed_town + self.unrevealed_mafia
    }

    pub fn with_phase(self, phase: Phase) -> Self {
        Self { phase, ..self }
    }

    pub fn terminal_status(&self) -> TerminalStatus {
        terminal::evaluate_terminal(self)
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal_status().is_over()
    }

    pub fn winner(&self) -> Option<Faction> {
        self.terminal_status().winner()
    }

    /// Outgoing transitions; empty for terminal states.
    pub fn next_transitions(&self) -> crate::Result<Vec<Transition>> {
        transitions::next_transitions(self)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GameState({}, {}, {}, {}, {}, {}, {})",
            self.unrevealed_town,
            self.revealed_town,
            self.unrevealed_mafia,
            self.revealed_mafia,
            self.has_sheriff,
            self.sheriff_revealed,
            self.phase
        )
    }
}
