//! Consistency checks over a solved state graph.
//!
//! For every reachable state this checks that outgoing probabilities sum to
//! exactly one, that win probabilities stay inside [0, 1], that each value is
//! the probability-weighted sum of its children, and optionally that the
//! memoized value equals an unmemoized recomputation.

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    Result,
    game::{StateGraph, TerminalStatus},
    solver::win_probability_naive,
    types::Probability,
};

/// Outcome of [`verify_graph`]. Each failure list holds human-readable lines.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationReport {
    pub states_checked: usize,
    pub conservation_failures: Vec<String>,
    pub bound_failures: Vec<String>,
    pub consistency_failures: Vec<String>,
    pub naive_checked: usize,
    pub naive_mismatches: Vec<String>,
}

impl VerificationReport {
    pub fn is_clean(&self) -> bool {
        self.conservation_failures.is_empty()
            && self.bound_failures.is_empty()
            && self.consistency_failures.is_empty()
            && self.naive_mismatches.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.conservation_failures.len()
            + self.bound_failures.len()
            + self.consistency_failures.len()
            + self.naive_mismatches.len()
    }
}

/// Check every node of `graph`.
///
/// States with at most `naive_population_limit` living players are also
/// recomputed without memoization; `None` skips that check.
pub fn verify_graph(
    graph: &StateGraph,
    naive_population_limit: Option<u32>,
) -> Result<VerificationReport> {
    let mut report = VerificationReport::default();

    for node in graph.nodes() {
        report.states_checked += 1;

        if !node.win_probability.is_valid() {
            report
                .bound_failures
                .push(format!("{}: {}", node.state, node.win_probability));
        }

        if node.status == TerminalStatus::Ongoing {
            let mut total = Probability::zero();
            let mut expected = Probability::zero();
            for edge in graph.outgoing(node.id) {
                total = total + &edge.probability;
                let child = &graph.nodes()[edge.to];
                expected = expected + &edge.probability * &child.win_probability;
            }

            if !total.is_one() {
                report
                    .conservation_failures
                    .push(format!("{}: outgoing sum {}", node.state, total));
            }
            if expected != node.win_probability {
                report.consistency_failures.push(format!(
                    "{}: stored {} but children give {}",
                    node.state, node.win_probability, expected
                ));
            }
        }

        if let Some(limit) = naive_population_limit {
            if node.state.population() <= limit {
                report.naive_checked += 1;
                let naive = win_probability_naive(&node.state)?;
                if naive != node.win_probability {
                    report.naive_mismatches.push(format!(
                        "{}: memoized {} but naive {}",
                        node.state, node.win_probability, naive
                    ));
                }
            }
        }
    }

    if report.is_clean() {
        debug!(
            states = report.states_checked,
            naive = report.naive_checked,
            "verification passed"
        );
    } else {
        warn!(failures = report.failure_count(), "verification failed");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{game::GameState, solver::WinProbabilitySolver};

    #[test]
    fn default_game_verifies_cleanly() {
        let graph = StateGraph::build(
            GameState::initial(6, 0, 3, 0, true),
            &mut WinProbabilitySolver::default(),
        )
        .unwrap();
        let report = verify_graph(&graph, Some(7)).unwrap();
        assert!(report.is_clean(), "{report:?}");
        assert_eq!(report.states_checked, graph.nodes().len());
        assert!(report.naive_checked > 0);
    }

    #[test]
    fn naive_check_can_be_skipped() {
        let graph = StateGraph::build(
            GameState::initial(4, 0, 1, 0, false),
            &mut WinProbabilitySolver::default(),
        )
        .unwrap();
        let report = verify_graph(&graph, None).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.naive_checked, 0);
        assert_eq!(report.failure_count(), 0);
    }
}
