//! Exact town-win probabilities.
//!
//! [`WinProbabilitySolver`] memoizes on the full state tuple, which turns the
//! exponential recursion tree into a walk over the DAG of distinct states.
//! [`win_probability_naive`] recomputes every subtree and exists to
//! cross-check the memoized result on small tables.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::{
    Error, Result,
    config::SolverConfig,
    game::{Faction, GameState, TerminalStatus, next_transitions},
    types::Probability,
};

fn terminal_value(faction: Faction) -> Probability {
    match faction {
        Faction::Town => Probability::one(),
        Faction::Mafia => Probability::zero(),
    }
}

/// Memoizing evaluator. The cache is private to one solver; share the solver
/// (or its memo table) to reuse work across queries.
#[derive(Debug, Default)]
pub struct WinProbabilitySolver {
    config: SolverConfig,
    memo: HashMap<GameState, Probability>,
    in_progress: HashSet<GameState>,
}

impl WinProbabilitySolver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            memo: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Probability that town wins from `state`.
    ///
    /// # Errors
    ///
    /// Propagates rule-set defects ([`Error::ProbabilityLeak`],
    /// [`Error::UnreachableState`], [`Error::CycleDetected`]) and
    /// [`Error::StateLimitExceeded`] when the configured bound is hit.
    pub fn win_probability(&mut self, state: &GameState) -> Result<Probability> {
        let result = self.solve(state);
        // A failed run may leave partial bookkeeping behind.
        self.in_progress.clear();
        if let Ok(probability) = &result {
            debug!(
                %state,
                %probability,
                distinct_states = self.memo.len(),
                "solved"
            );
        }
        result
    }

    fn solve(&mut self, state: &GameState) -> Result<Probability> {
        if let Some(cached) = self.memo.get(state) {
            return Ok(cached.clone());
        }

        let value = match state.terminal_status() {
            TerminalStatus::Over(faction) => terminal_value(faction),
            TerminalStatus::Ongoing => {
                if !self.in_progress.insert(*state) {
                    return Err(Error::CycleDetected {
                        state: state.to_string(),
                    });
                }

                let mut total = Probability::zero();
                for transition in next_transitions(state)? {
                    if transition.probability.is_zero() {
                        continue;
                    }
                    let child = self.solve(&transition.next)?;
                    total = total + &transition.probability * &child;
                }

                self.in_progress.remove(state);
                total
            }
        };

        if let Some(limit) = self.config.max_states {
            if self.memo.len() >= limit {
                return Err(Error::StateLimitExceeded { limit });
            }
        }

        trace!(%state, probability = %value, "memoized");
        self.memo.insert(*state, value.clone());
        Ok(value)
    }

    /// Previously computed probability, without computing anything new.
    pub fn cached(&self, state: &GameState) -> Option<&Probability> {
        self.memo.get(state)
    }

    /// Every state evaluated so far with its probability.
    pub fn memo(&self) -> &HashMap<GameState, Probability> {
        &self.memo
    }

    pub fn distinct_states(&self) -> usize {
        self.memo.len()
    }

    pub fn into_memo(self) -> HashMap<GameState, Probability> {
        self.memo
    }
}

/// One-shot memoized evaluation with default limits.
pub fn win_probability(state: &GameState) -> Result<Probability> {
    WinProbabilitySolver::default().win_probability(state)
}

/// Unmemoized recursion. Exponential in the table size.
pub fn win_probability_naive(state: &GameState) -> Result<Probability> {
    if let TerminalStatus::Over(faction) = state.terminal_status() {
        return Ok(terminal_value(faction));
    }

    let mut total = Probability::zero();
    for transition in next_transitions(state)? {
        if transition.probability.is_zero() {
            continue;
        }
        let child = win_probability_naive(&transition.next)?;
        total = total + &transition.probability * &child;
    }
    Ok(total)
}
