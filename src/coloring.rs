//! Graph colouring with a fixed palette
//!
//! A colouring is a vector with one entry per vertex, 0 meaning uncoloured and
//! 1..=colors the palette. Path searches colour vertices in index order; the
//! local search recolours single vertices of a complete colouring.

use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::report::Comparison;
use crate::search::{a_star, backtrack, breadth_first, hill_climb, Limits, Mode, Problem};
use crate::SEED;

/// Palette size of the demonstration instance
pub const COLORS: u8 = 3;

/// Adjacency matrix of the demonstration instance, the cycle on eight vertices
pub const CYCLE_8: [[u8; 8]; 8] = [
    [0, 1, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 0],
    [0, 1, 0, 1, 0, 0, 0, 0],
    [0, 0, 1, 0, 1, 0, 0, 0],
    [0, 0, 0, 1, 0, 1, 0, 0],
    [0, 0, 0, 0, 1, 0, 1, 0],
    [0, 0, 0, 0, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 1, 0],
];

pub const STATE_CAP: usize = 50_000;
pub const CLIMB_CAP: usize = 10_000;

/// An undirected graph
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<Vec<bool>>,
}

impl Graph {
    /// Builds a graph from a symmetric 0/1 adjacency matrix
    pub fn from_matrix<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let n = rows.len();
        let mut adjacency = vec![vec![false; n]; n];
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n {
                return Err(anyhow!(
                    "adjacency row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                ));
            }
            for (j, &edge) in row.iter().enumerate() {
                adjacency[i][j] = edge != 0;
            }
        }
        for i in 0..n {
            if adjacency[i][i] {
                return Err(anyhow!("vertex {} is adjacent to itself", i));
            }
            for j in i + 1..n {
                if adjacency[i][j] != adjacency[j][i] {
                    return Err(anyhow!("adjacency matrix is not symmetric at ({}, {})", i, j));
                }
            }
        }
        Ok(Self { adjacency })
    }

    pub fn cycle(n: usize) -> Self {
        let mut adjacency = vec![vec![false; n]; n];
        if n > 1 {
            for i in 0..n {
                let j = (i + 1) % n;
                adjacency[i][j] = true;
                adjacency[j][i] = true;
            }
        }
        Self { adjacency }
    }

    pub fn vertices(&self) -> usize {
        self.adjacency.len()
    }

    pub fn adjacent(&self, a: usize, b: usize) -> bool {
        self.adjacency[a][b]
    }

    /// Whether `vertex` can take `color` without clashing with a coloured neighbour
    pub fn is_safe(&self, vertex: usize, color: u8, colors: &[u8]) -> bool {
        (0..self.vertices()).all(|other| !self.adjacency[vertex][other] || colors[other] != color)
    }

    /// Number of edges whose coloured endpoints share a colour
    pub fn conflicts(&self, colors: &[u8]) -> u32 {
        let mut count = 0;
        for i in 0..self.vertices() {
            if colors[i] == 0 {
                continue;
            }
            for j in i + 1..self.vertices() {
                if self.adjacency[i][j] && colors[i] == colors[j] {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn is_proper(&self, colors: &[u8]) -> bool {
        colors.len() == self.vertices()
            && colors.iter().all(|&c| c != 0)
            && self.conflicts(colors) == 0
    }
}

/// Colours vertices in index order, trying every palette colour
#[derive(Clone, Debug)]
pub struct GraphColoring {
    graph: Graph,
    colors: u8,
}

impl GraphColoring {
    pub fn new(graph: Graph, colors: u8) -> Result<Self> {
        if colors == 0 && graph.vertices() > 0 {
            return Err(anyhow!("cannot colour a non-empty graph with no colours"));
        }
        Ok(Self { graph, colors })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn colors(&self) -> u8 {
        self.colors
    }

    fn extend(&self, colors: &[u8], palette: u8) -> Vec<Vec<u8>> {
        match colors.iter().position(|&c| c == 0) {
            Some(vertex) => (1..=palette)
                .filter(|&color| self.graph.is_safe(vertex, color, colors))
                .map(|color| {
                    let mut next = colors.to_vec();
                    next[vertex] = color;
                    next
                })
                .collect(),
            None => Vec::new(),
        }
    }
}

impl Problem for GraphColoring {
    type State = Vec<u8>;

    fn initial(&self) -> Vec<u8> {
        vec![0; self.graph.vertices()]
    }

    fn successors(&self, colors: &Vec<u8>) -> Vec<Vec<u8>> {
        self.extend(colors, self.colors)
    }

    fn is_goal(&self, colors: &Vec<u8>) -> bool {
        colors.iter().all(|&c| c != 0)
    }
}

/// Uniform-cost formulation paying for each colour introduced
///
/// Colours are interchangeable, so a vertex may only take a colour already in
/// use or the next unused one.
pub struct FewestColors<'a>(pub &'a GraphColoring);

impl<'a> Problem for FewestColors<'a> {
    type State = Vec<u8>;

    fn initial(&self) -> Vec<u8> {
        self.0.initial()
    }

    fn successors(&self, colors: &Vec<u8>) -> Vec<Vec<u8>> {
        let used = colors.iter().copied().max().unwrap_or(0);
        self.0.extend(colors, self.0.colors.min(used.saturating_add(1)))
    }

    fn is_goal(&self, colors: &Vec<u8>) -> bool {
        self.0.is_goal(colors)
    }

    fn step_cost(&self, from: &Vec<u8>, to: &Vec<u8>) -> u32 {
        let before = from.iter().copied().max().unwrap_or(0);
        let after = to.iter().copied().max().unwrap_or(0);
        if after > before {
            1
        } else {
            0
        }
    }
}

/// Recolours single vertices of a random complete colouring
#[derive(Clone, Debug)]
pub struct ColoringClimb<'a> {
    graph: &'a Graph,
    colors: u8,
    start: Vec<u8>,
}

impl<'a> ColoringClimb<'a> {
    pub fn seeded(puzzle: &'a GraphColoring, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let start = (0..puzzle.graph.vertices())
            .map(|_| rng.random_range(1..=puzzle.colors))
            .collect();
        Self {
            graph: &puzzle.graph,
            colors: puzzle.colors,
            start,
        }
    }
}

impl<'a> Problem for ColoringClimb<'a> {
    type State = Vec<u8>;

    fn initial(&self) -> Vec<u8> {
        self.start.clone()
    }

    fn successors(&self, colors: &Vec<u8>) -> Vec<Vec<u8>> {
        let mut next = Vec::new();
        for vertex in 0..colors.len() {
            for color in 1..=self.colors {
                if color != colors[vertex] {
                    let mut recolored = colors.clone();
                    recolored[vertex] = color;
                    next.push(recolored);
                }
            }
        }
        next
    }

    fn is_goal(&self, colors: &Vec<u8>) -> bool {
        self.graph.conflicts(colors) == 0
    }

    fn heuristic(&self, colors: &Vec<u8>) -> u32 {
        self.graph.conflicts(colors)
    }
}

/// Runs every algorithm over a graph
pub fn compare(puzzle: &GraphColoring) -> Comparison {
    let mut comparison = Comparison::new(
        format!(
            "Graph Coloring (V={}, M={})",
            puzzle.graph().vertices(),
            puzzle.colors()
        ),
        "Nodes/Steps",
    );

    comparison.measure("Backtracking (first solution)", || {
        let result = backtrack(puzzle, Mode::First, usize::MAX);
        (result.found(), result.nodes as u64)
    });
    comparison.measure("BFS (state space)", || {
        let outcome = breadth_first(puzzle, Limits::states(STATE_CAP));
        (outcome.found(), outcome.generated as u64)
    });
    comparison.measure("A* (uniform cost on colours)", || {
        let outcome = a_star(&FewestColors(puzzle), Limits::states(STATE_CAP));
        (outcome.found(), outcome.expanded as u64)
    });

    let climber = ColoringClimb::seeded(puzzle, SEED);
    comparison.measure("Hill Climbing (local search)", || {
        let climb = hill_climb(&climber, CLIMB_CAP);
        (climb.found, climb.iterations as u64)
    });

    comparison
}

pub fn demo() -> Result<()> {
    let graph = Graph::from_matrix(&CYCLE_8)?;
    log::info!("colouring {} vertices with {} colours", graph.vertices(), COLORS);
    let puzzle = GraphColoring::new(graph, COLORS)?;
    compare(&puzzle).print()
}
