//! The three-step day cycle

use std::fmt;

use serde::{Deserialize, Serialize};

/// Game phase. The cycle is `Check -> Night -> Vote -> Check -> ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// The sheriff investigates one unrevealed player.
    Check,
    /// Mafia eliminates one non-mafia player.
    Night,
    /// Town votes one player out.
    Vote,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Check, Phase::Night, Phase::Vote];

    /// The phase that follows this one in the regular cycle.
    pub fn next(self) -> Phase {
        match self {
            Phase::Check => Phase::Night,
            Phase::Night => Phase::Vote,
            Phase::Vote => Phase::Check,
        }
    }

    /// Position in [`Phase::ALL`].
    pub fn index(self) -> usize {
        match self {
            Phase::Check => 0,
            Phase::Night => 1,
            Phase::Vote => 2,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Check => "check",
            Phase::Night => "night",
            Phase::Vote => "vote",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_returns_to_start_after_three_steps() {
        for phase in Phase::ALL {
            assert_eq!(phase.next().next().next(), phase);
            assert_ne!(phase.next(), phase);
        }
    }

    #[test]
    fn index_matches_all_order() {
        for (i, phase) in Phase::ALL.iter().enumerate() {
            assert_eq!(phase.index(), i);
        }
    }
}
