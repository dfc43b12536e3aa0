//! Generic state-space search
//!
//! A problem describes its state space through the [`Problem`] trait. The
//! uninformed and informed graph searches all run through [`graph_search`] and
//! differ only in the [`Frontier`] that orders pending nodes: a FIFO queue
//! gives breadth-first search, a stack gives depth-first search and a priority
//! queue on `cost + estimate` gives A*.
//!
//! Tree-shaped problems can also be searched with [`backtrack`], which keeps
//! only the current path in memory, and any problem with a meaningful
//! heuristic can be handed to [`hill_climb`].

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::hash::Hash;

/// A search problem over a space of hashable states
pub trait Problem {
    type State: Clone + Eq + Hash;

    /// The state the search starts from
    fn initial(&self) -> Self::State;

    /// All states reachable in a single step, in the order they should be tried
    fn successors(&self, state: &Self::State) -> Vec<Self::State>;

    fn is_goal(&self, state: &Self::State) -> bool;

    /// Estimated remaining cost to a goal, also the objective minimised by
    /// [`hill_climb`]
    fn heuristic(&self, _state: &Self::State) -> u32 {
        0
    }

    /// The cost of stepping from `from` to its successor `to`
    fn step_cost(&self, _from: &Self::State, _to: &Self::State) -> u32 {
        1
    }
}

/// A pending node in the frontier
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Index of the node in the search arena
    pub node: usize,
    /// Path cost from the initial state
    pub cost: u32,
    pub depth: u32,
    /// Heuristic estimate of the remaining cost
    pub estimate: u32,
}

impl Entry {
    fn priority(&self) -> u32 {
        self.cost.saturating_add(self.estimate)
    }
}

/// The strategy that decides which pending node is expanded next
pub trait Frontier {
    fn push(&mut self, entry: Entry);
    fn pop(&mut self) -> Option<Entry>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First in, first out: breadth-first order
#[derive(Default)]
pub struct Fifo(VecDeque<Entry>);

impl Frontier for Fifo {
    fn push(&mut self, entry: Entry) {
        self.0.push_back(entry);
    }
    fn pop(&mut self) -> Option<Entry> {
        self.0.pop_front()
    }
    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Last in, first out: depth-first order
#[derive(Default)]
pub struct Lifo(Vec<Entry>);

impl Frontier for Lifo {
    fn push(&mut self, entry: Entry) {
        self.0.push(entry);
    }
    fn pop(&mut self) -> Option<Entry> {
        self.0.pop()
    }
    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Lowest `cost + estimate` first, deeper nodes first on ties, then oldest
#[derive(Default)]
pub struct BestFirst(BinaryHeap<Ranked>);

struct Ranked(Entry);

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the greatest element, so the comparisons are reversed
        other
            .0
            .priority()
            .cmp(&self.0.priority())
            .then(self.0.depth.cmp(&other.0.depth))
            .then(other.0.node.cmp(&self.0.node))
    }
}
impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Ranked {}

impl Frontier for BestFirst {
    fn push(&mut self, entry: Entry) {
        self.0.push(Ranked(entry));
    }
    fn pop(&mut self) -> Option<Entry> {
        self.0.pop().map(|ranked| ranked.0)
    }
    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Resource caps for a graph search
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    /// The search gives up once more distinct states than this have been seen
    pub max_states: usize,
}

impl Limits {
    pub const UNBOUNDED: Limits = Limits {
        max_states: usize::MAX,
    };

    pub const fn states(max_states: usize) -> Self {
        Self { max_states }
    }
}

/// The result of a graph search
#[derive(Clone, Debug)]
pub struct Outcome<S> {
    /// The states from the initial state to the goal, if one was reached
    pub path: Option<Vec<S>>,
    /// Number of nodes taken off the frontier
    pub expanded: usize,
    /// Number of distinct states seen
    pub generated: usize,
    /// Whether the search stopped because it hit its state cap
    pub exhausted: bool,
}

impl<S> Outcome<S> {
    pub fn found(&self) -> bool {
        self.path.is_some()
    }

    pub fn goal(&self) -> Option<&S> {
        self.path.as_ref().and_then(|path| path.last())
    }
}

/// Performs a graph search using the given frontier
///
/// Goals are tested when a node is taken off the frontier. A successor is
/// only queued when its state has not been seen before or has now been
/// reached more cheaply, so stale frontier entries are skipped on removal.
pub fn graph_search<P, F>(problem: &P, mut frontier: F, limits: Limits) -> Outcome<P::State>
where
    P: Problem,
    F: Frontier,
{
    let root = problem.initial();
    let mut best: HashMap<P::State, u32> = HashMap::new();
    best.insert(root.clone(), 0);
    frontier.push(Entry {
        node: 0,
        cost: 0,
        depth: 0,
        estimate: problem.heuristic(&root),
    });

    // every state ever queued, with the index of its parent
    let mut arena: Vec<(P::State, Option<usize>)> = vec![(root, None)];
    let mut expanded = 0;

    while let Some(entry) = frontier.pop() {
        let children: Vec<(P::State, u32)> = {
            let state = &arena[entry.node].0;
            if best.get(state).map_or(false, |&known| known < entry.cost) {
                continue;
            }
            expanded += 1;

            if problem.is_goal(state) {
                log::debug!(
                    "goal reached at depth {} after {} expansions",
                    entry.depth,
                    expanded
                );
                return Outcome {
                    path: Some(trace(&arena, entry.node)),
                    expanded,
                    generated: best.len(),
                    exhausted: false,
                };
            }

            problem
                .successors(state)
                .into_iter()
                .map(|next| {
                    let cost = entry.cost.saturating_add(problem.step_cost(state, &next));
                    (next, cost)
                })
                .collect()
        };

        for (next, cost) in children {
            let improved = match best.get(&next) {
                Some(&known) => cost < known,
                None => true,
            };
            if improved {
                best.insert(next.clone(), cost);
                frontier.push(Entry {
                    node: arena.len(),
                    cost,
                    depth: entry.depth + 1,
                    estimate: problem.heuristic(&next),
                });
                arena.push((next, Some(entry.node)));
            }
        }

        if best.len() > limits.max_states {
            log::warn!(
                "search abandoned after {} states ({} expanded, {} pending)",
                best.len(),
                expanded,
                frontier.len()
            );
            return Outcome {
                path: None,
                expanded,
                generated: best.len(),
                exhausted: true,
            };
        }
    }

    Outcome {
        path: None,
        expanded,
        generated: best.len(),
        exhausted: false,
    }
}

/// Rebuilds the path to `node` by following parent links
fn trace<S: Clone>(arena: &[(S, Option<usize>)], mut node: usize) -> Vec<S> {
    let mut path = vec![arena[node].0.clone()];
    while let Some(parent) = arena[node].1 {
        path.push(arena[parent].0.clone());
        node = parent;
    }
    path.reverse();
    path
}

pub fn breadth_first<P: Problem>(problem: &P, limits: Limits) -> Outcome<P::State> {
    graph_search(problem, Fifo::default(), limits)
}

pub fn depth_first<P: Problem>(problem: &P, limits: Limits) -> Outcome<P::State> {
    graph_search(problem, Lifo::default(), limits)
}

pub fn a_star<P: Problem>(problem: &P, limits: Limits) -> Outcome<P::State> {
    graph_search(problem, BestFirst::default(), limits)
}

/// Whether a backtracking search stops at the first goal or enumerates all of them
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    First,
    All,
}

/// The result of a backtracking search
#[derive(Clone, Debug)]
pub struct Backtrack<S> {
    /// The path to the first goal found, cleared if the budget ran out
    pub first: Option<Vec<S>>,
    pub solutions: usize,
    /// Number of nodes visited, including the initial state
    pub nodes: usize,
    /// Whether the node budget ran out before the search completed
    pub exhausted: bool,
}

impl<S> Backtrack<S> {
    pub fn found(&self) -> bool {
        self.first.is_some()
    }
}

/// Performs a recursive depth-first tree search
///
/// No record of visited states is kept, so this is only suitable for problems
/// whose successors never lead back to an earlier state. The search gives up
/// after visiting `max_nodes` nodes.
pub fn backtrack<P: Problem>(problem: &P, mode: Mode, max_nodes: usize) -> Backtrack<P::State> {
    let mut search = Backtracker {
        problem,
        mode,
        max_nodes,
        path: vec![problem.initial()],
        result: Backtrack {
            first: None,
            solutions: 0,
            nodes: 0,
            exhausted: false,
        },
    };
    search.descend();
    if search.result.exhausted {
        log::warn!("backtracking abandoned after {} nodes", max_nodes);
        // an incomplete search reports nothing found, whatever it saw first
        search.result.first = None;
    }
    search.result
}

struct Backtracker<'a, P: Problem> {
    problem: &'a P,
    mode: Mode,
    max_nodes: usize,
    path: Vec<P::State>,
    result: Backtrack<P::State>,
}

impl<'a, P: Problem> Backtracker<'a, P> {
    /// Returns true when the whole search should stop
    fn descend(&mut self) -> bool {
        self.result.nodes += 1;
        if self.result.nodes > self.max_nodes {
            self.result.exhausted = true;
            return true;
        }

        let successors = match self.path.last() {
            Some(state) if self.problem.is_goal(state) => {
                self.result.solutions += 1;
                if self.result.first.is_none() {
                    self.result.first = Some(self.path.clone());
                }
                return self.mode == Mode::First;
            }
            Some(state) => self.problem.successors(state),
            None => return true,
        };

        for next in successors {
            self.path.push(next);
            let stop = self.descend();
            self.path.pop();
            if stop {
                return true;
            }
        }
        false
    }
}

/// The result of a hill climb
#[derive(Clone, Debug)]
pub struct Climb<S> {
    /// The state the climb ended in
    pub state: S,
    /// The heuristic value of the final state
    pub score: u32,
    pub iterations: usize,
    pub found: bool,
}

/// Performs steepest-descent local search on the problem's heuristic
///
/// Each iteration moves to the first successor with the lowest heuristic, but
/// only if that strictly improves on the current state. The climb ends at a
/// goal, a local minimum or plateau, a dead end, or after `max_iterations`.
pub fn hill_climb<P: Problem>(problem: &P, max_iterations: usize) -> Climb<P::State> {
    let mut current = problem.initial();
    let mut score = problem.heuristic(&current);
    let mut iterations = 0;

    while !problem.is_goal(&current) && iterations < max_iterations {
        iterations += 1;

        let best = problem
            .successors(&current)
            .into_iter()
            .map(|next| (problem.heuristic(&next), next))
            .min_by_key(|(h, _)| *h);

        match best {
            Some((h, next)) if h < score => {
                current = next;
                score = h;
            }
            _ => {
                log::debug!("hill climb stalled at score {} after {} iterations", score, iterations);
                break;
            }
        }
    }

    let found = problem.is_goal(&current);
    Climb {
        state: current,
        score,
        iterations,
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walk along a line of integers towards a target, stepping by one or two
    struct Line {
        target: u32,
    }

    impl Problem for Line {
        type State = u32;

        fn initial(&self) -> u32 {
            0
        }
        fn successors(&self, state: &u32) -> Vec<u32> {
            if *state >= self.target {
                vec![]
            } else {
                vec![state + 1, state + 2]
            }
        }
        fn is_goal(&self, state: &u32) -> bool {
            *state == self.target
        }
        fn heuristic(&self, state: &u32) -> u32 {
            self.target.saturating_sub(*state)
        }
    }

    #[test]
    fn best_first_orders_by_priority_then_depth() {
        let mut frontier = BestFirst::default();
        frontier.push(Entry { node: 0, cost: 2, depth: 2, estimate: 3 });
        frontier.push(Entry { node: 1, cost: 1, depth: 1, estimate: 3 });
        frontier.push(Entry { node: 2, cost: 4, depth: 4, estimate: 0 });
        frontier.push(Entry { node: 3, cost: 3, depth: 3, estimate: 3 });

        let order: Vec<usize> = std::iter::from_fn(|| frontier.pop()).map(|e| e.node).collect();
        assert_eq!(order, vec![2, 1, 0, 3]);
    }

    /// 0 -> 1 costs 5, but 0 -> 2 -> 1 costs 2; the goal 3 hangs off 1
    struct Diamond;

    impl Problem for Diamond {
        type State = u8;

        fn initial(&self) -> u8 {
            0
        }
        fn successors(&self, state: &u8) -> Vec<u8> {
            match state {
                0 => vec![1, 2],
                1 => vec![3],
                2 => vec![1],
                _ => vec![],
            }
        }
        fn is_goal(&self, state: &u8) -> bool {
            *state == 3
        }
        fn step_cost(&self, from: &u8, to: &u8) -> u32 {
            match (from, to) {
                (0, 1) => 5,
                (1, 3) => 10,
                _ => 1,
            }
        }
    }

    #[test]
    fn lifo_pops_newest_first() {
        let mut frontier = Lifo::default();
        for node in 0..3 {
            frontier.push(Entry { node, cost: 0, depth: 0, estimate: 0 });
        }
        assert_eq!(frontier.len(), 3);

        let order: Vec<usize> = std::iter::from_fn(|| frontier.pop()).map(|e| e.node).collect();
        assert_eq!(order, vec![2, 1, 0]);
        assert!(frontier.is_empty());
    }

    #[test]
    fn cheaper_route_replaces_stale_entry() {
        let outcome = a_star(&Diamond, Limits::UNBOUNDED);
        assert_eq!(outcome.path, Some(vec![0, 2, 1, 3]));
        // 0, 2, 1 at cost 2 and 3; the entry for 1 at cost 5 is skipped
        assert_eq!(outcome.expanded, 4);
        assert_eq!(outcome.generated, 4);
    }

    #[test]
    fn breadth_first_finds_shortest_path() {
        let outcome = breadth_first(&Line { target: 7 }, Limits::UNBOUNDED);
        // 2 + 2 + 2 + 1
        assert_eq!(outcome.path.map(|p| p.len() - 1), Some(4));
    }

    #[test]
    fn state_cap_abandons_search() {
        let outcome = breadth_first(&Line { target: 1000 }, Limits::states(10));
        assert!(!outcome.found());
        assert!(outcome.exhausted);
    }

    #[test]
    fn backtracking_counts_every_route() {
        // compositions of 5 into ones and twos: fib(6)
        let result = backtrack(&Line { target: 5 }, Mode::All, usize::MAX);
        assert_eq!(result.solutions, 8);
        assert_eq!(result.first, Some(vec![0, 1, 2, 3, 4, 5]));
    }

    #[test]
    fn hill_climb_descends_to_goal() {
        let climb = hill_climb(&Line { target: 9 }, 100);
        assert!(climb.found);
        assert_eq!(climb.iterations, 5);
    }
}
