mod common;

use common::{p, solve, table};
use mafia_odds::{
    GameState, Probability, StateGraph, WinProbabilitySolver, game::next_transitions,
    win_probability_naive,
};

fn reachable(initial: GameState) -> StateGraph {
    StateGraph::build(initial, &mut WinProbabilitySolver::default()).unwrap()
}

#[test]
fn transitions_conserve_probability_everywhere() {
    for (town, mafia, sheriff) in [(6, 3, true), (7, 2, false), (5, 1, true), (8, 3, false)] {
        let graph = reachable(table(town, mafia, sheriff));
        for node in graph.nodes() {
            let transitions = next_transitions(&node.state).unwrap();
            if node.state.is_terminal() {
                assert!(transitions.is_empty());
                continue;
            }
            let total: Probability = transitions.iter().map(|t| &t.probability).sum();
            assert!(total.is_one(), "{} sums to {total}", node.state);
            assert!(transitions.iter().all(|t| !t.probability.is_zero()));
        }
    }
}

#[test]
fn win_probabilities_stay_in_unit_interval() {
    let graph = reachable(table(9, 3, true));
    assert!(graph.nodes().iter().all(|node| node.win_probability.is_valid()));
}

#[test]
fn memoized_and_naive_solvers_agree() {
    for mafia in 1..=2 {
        for town in mafia..=mafia + 4 {
            for sheriff in [false, true] {
                let state = table(town, mafia, sheriff);
                assert_eq!(
                    solve(state),
                    win_probability_naive(&state).unwrap(),
                    "{state}"
                );
            }
        }
    }
}

#[test]
fn adding_two_town_members_never_hurts_town() {
    for mafia in 1..=3 {
        for town in (mafia + 1)..=11 {
            let smaller = solve(table(town, mafia, false));
            let larger = solve(table(town + 2, mafia, false));
            assert!(
                larger >= smaller,
                "mafia={mafia}: town {town} gives {smaller}, town {} gives {larger}",
                town + 2
            );
        }
    }
}

#[test]
fn adding_one_town_member_can_hurt_town() {
    // Parity of the table decides who gets the last vote.
    assert_eq!(solve(table(3, 1, false)), p("1/3"));
    assert_eq!(solve(table(4, 1, false)), p("1/4"));
    assert!(solve(table(4, 1, false)) < solve(table(3, 1, false)));
}

#[test]
fn shared_solver_matches_fresh_solvers() {
    let mut shared = WinProbabilitySolver::default();
    for town in 2..=9 {
        let state = table(town, 2, true);
        assert_eq!(shared.win_probability(&state).unwrap(), solve(state));
    }
}
