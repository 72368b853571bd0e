//! Phase transition rules.
//!
//! Every rule assumes uniformly random targets wherever the choice is not
//! forced. Each non-terminal state fans out into transitions whose exact
//! probabilities sum to one; a set that does not is reported as
//! [`crate::Error::ProbabilityLeak`] rather than normalized.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{GameState, Phase};
use crate::{Error, Result, types::Probability};

/// At or below this many living players a surviving sheriff is exposed.
pub const FORCED_REVEAL_POPULATION: u32 = 7;

/// What happened on a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Event {
    SheriffChecksTown,
    SheriffChecksMafia,
    CheckSkipped,
    MafiaShootsSheriff,
    MafiaShootsCheckedTown,
    MafiaShootsTown,
    VoteCheckedMafia,
    VoteMafia,
    VoteTown,
    VoteSheriffOrCheckedTown,
}

impl Event {
    pub fn label(self) -> &'static str {
        match self {
            Event::SheriffChecksTown => "Sheriff checks a town member",
            Event::SheriffChecksMafia => "Sheriff checks a mafia member",
            Event::CheckSkipped => "Check phase skipped",
            Event::MafiaShootsSheriff => "Mafia shoots the sheriff",
            Event::MafiaShootsCheckedTown => "Mafia shoots a checked town member",
            Event::MafiaShootsTown => "Mafia shoots a town member",
            Event::VoteCheckedMafia => "Vote: checked mafia",
            Event::VoteMafia => "Vote: mafia",
            Event::VoteTown => "Vote: town member",
            Event::VoteSheriffOrCheckedTown => "Vote: sheriff or checked town member",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One outgoing edge of a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub next: GameState,
    pub probability: Probability,
    pub event: Event,
}

/// Accumulates the transitions of a single state.
struct TransitionSet {
    origin: GameState,
    transitions: Vec<Transition>,
}

impl TransitionSet {
    fn new(origin: GameState) -> Self {
        Self {
            origin,
            transitions: Vec::with_capacity(4),
        }
    }

    fn certain(&mut self, next: GameState, event: Event) {
        self.transitions.push(Transition {
            next,
            probability: Probability::one(),
            event,
        });
    }

    fn weighted(&mut self, next: GameState, count: u32, total: u32, event: Event) -> Result<()> {
        let probability = Probability::ratio(count, total)
            .ok_or_else(|| unreachable(&self.origin, "empty pool for a weighted pick"))?;
        self.transitions.push(Transition {
            next,
            probability,
            event,
        });
        Ok(())
    }

    fn finish(self) -> Result<Vec<Transition>> {
        let total: Probability = self.transitions.iter().map(|t| &t.probability).sum();
        if !total.is_one() {
            return Err(Error::ProbabilityLeak {
                state: self.origin.to_string(),
                total: total.to_string(),
            });
        }
        Ok(self.transitions)
    }
}

fn unreachable(state: &GameState, reason: &str) -> Error {
    Error::UnreachableState {
        state: state.to_string(),
        reason: reason.to_string(),
    }
}

/// Apply the late-game rule: a surviving sheriff is exposed once the table
/// shrinks to [`FORCED_REVEAL_POPULATION`] players.
pub fn apply_forced_reveal(state: &GameState) -> GameState {
    if state.has_sheriff && state.population() <= FORCED_REVEAL_POPULATION {
        GameState {
            sheriff_revealed: true,
            ..*state
        }
    } else {
        *state
    }
}

/// Enumerate every successor of `state` with its exact probability.
///
/// Terminal states have no successors. Branches whose pool is empty are
/// omitted, so every returned probability is positive.
pub fn next_transitions(state: &GameState) -> Result<Vec<Transition>> {
    if state.is_terminal() {
        return Ok(Vec::new());
    }

    let current = apply_forced_reveal(state);
    let mut set = TransitionSet::new(*state);

    match current.phase {
        Phase::Check => check_phase(&current, &mut set)?,
        Phase::Night => night_phase(&current, &mut set)?,
        Phase::Vote => vote_phase(&current, &mut set)?,
    }

    let transitions = set.finish()?;
    trace!(%state, count = transitions.len(), "generated transitions");
    Ok(transitions)
}

fn check_phase(s: &GameState, set: &mut TransitionSet) -> Result<()> {
    let pool = s.unrevealed_count();
    if !s.has_sheriff || pool == 0 {
        set.certain(s.with_phase(Phase::Night), Event::CheckSkipped);
        return Ok(());
    }

    if s.unrevealed_town > 0 {
        let next = GameState {
            unrevealed_town: s.unrevealed_town - 1,
            revealed_town: s.revealed_town + 1,
            phase: Phase::Night,
            ..*s
        };
        set.weighted(next, s.unrevealed_town, pool, Event::SheriffChecksTown)?;
    }
    if s.unrevealed_mafia > 0 {
        let next = GameState {
            unrevealed_mafia: s.unrevealed_mafia - 1,
            revealed_mafia: s.revealed_mafia + 1,
            phase: Phase::Night,
            ..*s
        };
        set.weighted(next, s.unrevealed_mafia, pool, Event::SheriffChecksMafia)?;
    }
    Ok(())
}

fn night_phase(s: &GameState, set: &mut TransitionSet) -> Result<()> {
    if s.sheriff_revealed {
        // Known targets first: the sheriff, then checked town.
        let (next, event) = if s.has_sheriff {
            (
                GameState {
                    has_sheriff: false,
                    phase: Phase::Vote,
                    ..*s
                },
                Event::MafiaShootsSheriff,
            )
        } else if s.revealed_town > 0 {
            (
                GameState {
                    revealed_town: s.revealed_town - 1,
                    phase: Phase::Vote,
                    ..*s
                },
                Event::MafiaShootsCheckedTown,
            )
        } else if s.unrevealed_town > 0 {
            (
                GameState {
                    unrevealed_town: s.unrevealed_town - 1,
                    phase: Phase::Vote,
                    ..*s
                },
                Event::MafiaShootsTown,
            )
        } else {
            return Err(unreachable(s, "no town member left to shoot"));
        };
        set.certain(next, event);
        return Ok(());
    }

    let targets = s.town_headcount();
    if targets == 0 {
        return Err(unreachable(s, "no town member left to shoot"));
    }

    if s.has_sheriff {
        // The shot exposes the sheriff as it kills.
        let next = GameState {
            has_sheriff: false,
            sheriff_revealed: true,
            phase: Phase::Vote,
            ..*s
        };
        set.weighted(next, 1, targets, Event::MafiaShootsSheriff)?;
    }
    if s.unrevealed_town > 0 {
        let next = GameState {
            unrevealed_town: s.unrevealed_town - 1,
            phase: Phase::Vote,
            ..*s
        };
        set.weighted(next, s.unrevealed_town, targets, Event::MafiaShootsTown)?;
    }
    if s.revealed_town > 0 {
        let next = GameState {
            revealed_town: s.revealed_town - 1,
            phase: Phase::Vote,
            ..*s
        };
        set.weighted(next, s.revealed_town, targets, Event::MafiaShootsCheckedTown)?;
    }
    Ok(())
}

fn vote_phase(s: &GameState, set: &mut TransitionSet) -> Result<()> {
    if s.sheriff_revealed {
        if s.revealed_mafia > 0 {
            let next = GameState {
                revealed_mafia: s.revealed_mafia - 1,
                phase: Phase::Check,
                ..*s
            };
            set.certain(next, Event::VoteCheckedMafia);
            return Ok(());
        }

        let pool = s.unrevealed_count();
        if pool == 0 {
            return Err(unreachable(s, "no unrevealed player left to vote out"));
        }
        if s.unrevealed_mafia > 0 {
            let next = GameState {
                unrevealed_mafia: s.unrevealed_mafia - 1,
                phase: Phase::Check,
                ..*s
            };
            set.weighted(next, s.unrevealed_mafia, pool, Event::VoteMafia)?;
        }
        if s.unrevealed_town > 0 {
            let next = GameState {
                unrevealed_town: s.unrevealed_town - 1,
                phase: Phase::Check,
                ..*s
            };
            set.weighted(next, s.unrevealed_town, pool, Event::VoteTown)?;
        }
        return Ok(());
    }

    let population = s.population();
    if population == 0 {
        return Err(unreachable(s, "nobody left to vote out"));
    }

    if s.unrevealed_mafia > 0 {
        let next = GameState {
            unrevealed_mafia: s.unrevealed_mafia - 1,
            phase: Phase::Check,
            ..*s
        };
        set.weighted(next, s.unrevealed_mafia, population, Event::VoteMafia)?;
    }
    if s.revealed_mafia > 0 {
        let next = GameState {
            revealed_mafia: s.revealed_mafia - 1,
            phase: Phase::Check,
            ..*s
        };
        set.weighted(next, s.revealed_mafia, population, Event::VoteCheckedMafia)?;
    }
    if s.unrevealed_town > 0 {
        let next = GameState {
            unrevealed_town: s.unrevealed_town - 1,
            phase: Phase::Check,
            ..*s
        };
        set.weighted(next, s.unrevealed_town, population, Event::VoteTown)?;
    }

    // A vote landing on the sheriff or a checked town member exposes the
    // sheriff instead of eliminating anyone; the vote is then recast.
    let exposed = s.revealed_town + u32::from(s.has_sheriff);
    if exposed > 0 {
        let next = GameState {
            sheriff_revealed: true,
            phase: Phase::Vote,
            ..*s
        };
        set.weighted(next, exposed, population, Event::VoteSheriffOrCheckedTown)?;
    }
    Ok(())
}
