//! Reachable state graph construction and statistics

use std::collections::{HashMap, VecDeque};

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::Serialize;
use tracing::debug;

use super::{Event, Faction, GameState, Phase, TerminalStatus, next_transitions};
use crate::{Result, solver::WinProbabilitySolver, types::Probability};

/// A distinct reachable state.
#[derive(Debug, Clone, Serialize)]
pub struct StateNode {
    pub id: usize,
    pub state: GameState,
    pub status: TerminalStatus,
    pub win_probability: Probability,
}

/// A transition between two nodes.
#[derive(Debug, Clone, Serialize)]
pub struct StateEdge {
    pub from: usize,
    pub to: usize,
    pub probability: Probability,
    pub event: Event,
}

/// The DAG of every state reachable from a root, one node per distinct state.
///
/// Node ids follow breadth-first discovery order, so the root is always `0`.
#[derive(Debug, Clone)]
pub struct StateGraph {
    nodes: Vec<StateNode>,
    edges: Vec<StateEdge>,
    outgoing: Vec<Vec<usize>>,
    index: HashMap<GameState, usize>,
}

/// Summary counts for a [`StateGraph`].
#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub town_wins: usize,
    pub mafia_wins: usize,
    /// Non-terminal nodes per phase, in [`Phase::ALL`] order
    pub ongoing_by_phase: [usize; 3],
    /// Number of root-to-terminal paths, i.e. the size of the unshared tree
    #[serde(serialize_with = "serialize_display")]
    pub paths: BigUint,
    /// Longest root-to-terminal path, in transitions
    pub max_depth: usize,
}

impl StateGraph {
    /// Explore every state reachable from `root`.
    ///
    /// Win probabilities are taken from `solver`'s memo table; the root is
    /// solved first so every reachable state is already cached.
    pub fn build(root: GameState, solver: &mut WinProbabilitySolver) -> Result<Self> {
        solver.win_probability(&root)?;

        let mut graph = StateGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            index: HashMap::new(),
        };

        let mut queue = VecDeque::new();
        graph.add_node(root, solver)?;
        queue.push_back(root);

        while let Some(state) = queue.pop_front() {
            let from = graph.index[&state];
            for transition in next_transitions(&state)? {
                if transition.probability.is_zero() {
                    continue;
                }
                let existing = graph.index.get(&transition.next).copied();
                let to = match existing {
                    Some(id) => id,
                    None => {
                        queue.push_back(transition.next);
                        graph.add_node(transition.next, solver)?
                    }
                };
                graph.outgoing[from].push(graph.edges.len());
                graph.edges.push(StateEdge {
                    from,
                    to,
                    probability: transition.probability,
                    event: transition.event,
                });
            }
        }

        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "built state graph"
        );
        Ok(graph)
    }

    fn add_node(&mut self, state: GameState, solver: &mut WinProbabilitySolver) -> Result<usize> {
        let win_probability = match solver.cached(&state) {
            Some(probability) => probability.clone(),
            None => solver.win_probability(&state)?,
        };
        let id = self.nodes.len();
        self.nodes.push(StateNode {
            id,
            state,
            status: state.terminal_status(),
            win_probability,
        });
        self.outgoing.push(Vec::new());
        self.index.insert(state, id);
        Ok(id)
    }

    pub fn root(&self) -> &StateNode {
        &self.nodes[0]
    }

    pub fn nodes(&self) -> &[StateNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[StateEdge] {
        &self.edges
    }

    pub fn node(&self, id: usize) -> Option<&StateNode> {
        self.nodes.get(id)
    }

    pub fn node_for(&self, state: &GameState) -> Option<&StateNode> {
        self.index.get(state).map(|&id| &self.nodes[id])
    }

    /// Outgoing edges of node `id`, in rule order.
    pub fn outgoing(&self, id: usize) -> impl Iterator<Item = &StateEdge> {
        self.outgoing
            .get(id)
            .into_iter()
            .flatten()
            .map(|&edge| &self.edges[edge])
    }

    pub fn stats(&self) -> GraphStats {
        let mut town_wins = 0;
        let mut mafia_wins = 0;
        let mut ongoing_by_phase = [0usize; 3];

        for node in &self.nodes {
            match node.status {
                TerminalStatus::Over(Faction::Town) => town_wins += 1,
                TerminalStatus::Over(Faction::Mafia) => mafia_wins += 1,
                TerminalStatus::Ongoing => ongoing_by_phase[node.state.phase.index()] += 1,
            }
        }

        let mut paths: HashMap<usize, BigUint> = HashMap::new();
        let mut depths: HashMap<usize, usize> = HashMap::new();

        GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            town_wins,
            mafia_wins,
            ongoing_by_phase,
            paths: self.count_paths(0, &mut paths),
            max_depth: self.longest_path(0, &mut depths),
        }
    }

    fn count_paths(&self, id: usize, memo: &mut HashMap<usize, BigUint>) -> BigUint {
        if let Some(count) = memo.get(&id) {
            return count.clone();
        }
        let children: Vec<usize> = self.outgoing(id).map(|edge| edge.to).collect();
        let count = if children.is_empty() {
            BigUint::one()
        } else {
            children.into_iter().fold(BigUint::zero(), |acc, child| {
                acc + self.count_paths(child, memo)
            })
        };
        memo.insert(id, count.clone());
        count
    }

    fn longest_path(&self, id: usize, memo: &mut HashMap<usize, usize>) -> usize {
        if let Some(&depth) = memo.get(&id) {
            return depth;
        }
        let children: Vec<usize> = self.outgoing(id).map(|edge| edge.to).collect();
        let depth = children
            .into_iter()
            .map(|child| self.longest_path(child, memo) + 1)
            .max()
            .unwrap_or(0);
        memo.insert(id, depth);
        depth
    }
}

fn serialize_display<S, T>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: std::fmt::Display,
{
    serializer.collect_str(value)
}

impl GraphStats {
    pub fn ongoing_in(&self, phase: Phase) -> usize {
        self.ongoing_by_phase[phase.index()]
    }

    pub fn terminals(&self) -> usize {
        self.town_wins + self.mafia_wins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(root: GameState) -> StateGraph {
        let mut solver = WinProbabilitySolver::default();
        StateGraph::build(root, &mut solver).unwrap()
    }

    #[test]
    fn terminal_root_is_a_single_node() {
        let graph = build(GameState::initial(2, 0, 0, 0, false));
        assert_eq!(graph.nodes().len(), 1);
        assert!(graph.edges().is_empty());
        assert!(graph.root().win_probability.is_one());
        let stats = graph.stats();
        assert_eq!(stats.town_wins, 1);
        assert_eq!(stats.paths, BigUint::one());
        assert_eq!(stats.max_depth, 0);
    }

    #[test]
    fn small_game_graph_shape() {
        // check skipped -> night kill -> vote splits into win and loss
        let graph = build(GameState::initial(3, 0, 1, 0, false));
        let stats = graph.stats();
        assert_eq!(stats.nodes, 5);
        assert_eq!(stats.edges, 4);
        assert_eq!(stats.town_wins, 1);
        assert_eq!(stats.mafia_wins, 1);
        assert_eq!(stats.ongoing_in(Phase::Check), 1);
        assert_eq!(stats.ongoing_in(Phase::Night), 1);
        assert_eq!(stats.ongoing_in(Phase::Vote), 1);
        assert_eq!(stats.paths, BigUint::from(2u8));
        assert_eq!(stats.max_depth, 3);
        assert_eq!(graph.root().win_probability.to_string(), "1/3");
    }

    #[test]
    fn shared_states_are_deduplicated() {
        let graph = build(GameState::initial(6, 0, 3, 0, true));
        let stats = graph.stats();
        assert!(stats.paths > BigUint::from(stats.nodes));

        let mut seen = std::collections::HashSet::new();
        for node in graph.nodes() {
            assert!(seen.insert(node.state), "duplicate node {}", node.state);
            assert_eq!(graph.node_for(&node.state).map(|n| n.id), Some(node.id));
        }
    }

    #[test]
    fn node_probabilities_match_terminal_status() {
        let graph = build(GameState::initial(5, 0, 2, 0, true));
        for node in graph.nodes() {
            match node.status {
                TerminalStatus::Over(Faction::Town) => assert!(node.win_probability.is_one()),
                TerminalStatus::Over(Faction::Mafia) => assert!(node.win_probability.is_zero()),
                TerminalStatus::Ongoing => assert!(graph.outgoing(node.id).next().is_some()),
            }
        }
    }
}
