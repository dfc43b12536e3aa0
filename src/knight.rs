//! The Knight's Tour
//!
//! A knight must visit every square of an N×N board exactly once. The visited
//! squares are kept as a bitboard, so boards are limited to 8×8.

use anyhow::{anyhow, Result};
use static_assertions::const_assert;

use crate::report::{Comparison, Run};
use crate::search::{a_star, backtrack, breadth_first, hill_climb, Limits, Mode, Problem};

use std::time::Duration;

/// Largest supported board side
pub const MAX_SIZE: usize = 8;

// the visited squares must fit in a u64 bitboard
const_assert!(MAX_SIZE * MAX_SIZE <= 64);

/// Knight jumps as (row, column) offsets, in the order they are tried
pub const MOVES: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

/// Board sides of the demonstration instances
pub const DEMO_SIZES: [usize; 2] = [6, 8];
/// Starting square of the demonstration instances
pub const START: (usize, usize) = (0, 0);

/// Breadth-first search runs out of memory beyond this side
pub const BFS_MAX_SIZE: usize = 6;
pub const BFS_STATE_CAP: usize = 100_000;
pub const A_STAR_STATE_CAP: usize = 2_000_000;
pub const BACKTRACK_NODE_BUDGET: usize = 20_000_000;

/// A partial tour: the knight's square and every square visited so far
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tour {
    square: u8,
    visited: u64,
}

impl Tour {
    pub fn square(&self) -> u8 {
        self.square
    }

    pub fn visited(&self) -> u64 {
        self.visited
    }

    pub fn length(&self) -> u32 {
        self.visited.count_ones()
    }
}

#[derive(Clone, Debug)]
pub struct KnightsTour {
    size: usize,
    start: u8,
    full: u64,
}

impl KnightsTour {
    pub fn new(size: usize, start: (usize, usize)) -> Result<Self> {
        if size == 0 || size > MAX_SIZE {
            return Err(anyhow!(
                "board size {} out of range, must be between 1 and {}",
                size,
                MAX_SIZE
            ));
        }
        if start.0 >= size || start.1 >= size {
            return Err(anyhow!(
                "start square ({}, {}) is off the {}x{} board",
                start.0,
                start.1,
                size,
                size
            ));
        }
        let squares = size * size;
        let full = if squares == 64 {
            u64::MAX
        } else {
            (1 << squares) - 1
        };
        Ok(Self {
            size,
            start: (start.0 * size + start.1) as u8,
            full,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Converts a square index to (row, column)
    pub fn coordinates(&self, square: u8) -> (usize, usize) {
        (square as usize / self.size, square as usize % self.size)
    }

    /// Squares a knight can jump to from `square`, in move order
    fn jumps(&self, square: u8) -> impl Iterator<Item = u8> + '_ {
        let (row, column) = self.coordinates(square);
        MOVES.iter().filter_map(move |&(dr, dc)| {
            let r = row as i32 + dr as i32;
            let c = column as i32 + dc as i32;
            if r >= 0 && r < self.size as i32 && c >= 0 && c < self.size as i32 {
                Some((r as usize * self.size + c as usize) as u8)
            } else {
                None
            }
        })
    }

    /// Number of unvisited squares reachable from `square`
    pub fn onward_moves(&self, square: u8, visited: u64) -> u32 {
        self.jumps(square)
            .filter(|&next| visited & (1 << next) == 0)
            .count() as u32
    }

    /// Checks that `squares` is a complete tour by knight moves from the start
    pub fn is_valid_tour(&self, squares: &[u8]) -> bool {
        if squares.len() != self.size * self.size || squares.first() != Some(&self.start) {
            return false;
        }
        let mut visited = 0u64;
        for (i, &square) in squares.iter().enumerate() {
            if visited & (1 << square) != 0 {
                return false;
            }
            if i > 0 && !self.jumps(squares[i - 1]).any(|next| next == square) {
                return false;
            }
            visited |= 1 << square;
        }
        visited == self.full
    }
}

impl Problem for KnightsTour {
    type State = Tour;

    fn initial(&self) -> Tour {
        Tour {
            square: self.start,
            visited: 1 << self.start,
        }
    }

    fn successors(&self, tour: &Tour) -> Vec<Tour> {
        self.jumps(tour.square)
            .filter(|&next| tour.visited & (1 << next) == 0)
            .map(|next| Tour {
                square: next,
                visited: tour.visited | (1 << next),
            })
            .collect()
    }

    fn is_goal(&self, tour: &Tour) -> bool {
        tour.visited == self.full
    }

    /// Squares left to visit, then Warnsdorff's rule: fewest onward moves first
    ///
    /// Onward moves never exceed eight, so every jump strictly lowers the value.
    fn heuristic(&self, tour: &Tour) -> u32 {
        let remaining = (self.size * self.size) as u32 - tour.length();
        remaining * 9 + self.onward_moves(tour.square, tour.visited)
    }

    fn step_cost(&self, _from: &Tour, _to: &Tour) -> u32 {
        0
    }
}

/// The squares of a search path, in order
pub fn squares(path: &[Tour]) -> Vec<u8> {
    path.iter().map(Tour::square).collect()
}

/// Runs every algorithm over a board
pub fn compare(puzzle: &KnightsTour) -> Comparison {
    let size = puzzle.size();
    let mut comparison = Comparison::new(format!("Knight's Tour (N={})", size), "Nodes/Steps");

    comparison.measure("Backtracking / DFS", || {
        let result = backtrack(puzzle, Mode::First, BACKTRACK_NODE_BUDGET);
        (result.found(), result.nodes as u64)
    });

    if size <= BFS_MAX_SIZE {
        comparison.measure("BFS (state space)", || {
            let outcome = breadth_first(puzzle, Limits::states(BFS_STATE_CAP));
            (outcome.found(), outcome.expanded as u64)
        });
    } else {
        log::info!("skipping breadth-first search on a {}x{} board", size, size);
        comparison.push(Run {
            name: format!("BFS (infeasible for N > {})", BFS_MAX_SIZE),
            elapsed: Duration::default(),
            found: false,
            metric: 0,
        });
    }

    comparison.measure("A* (Warnsdorff)", || {
        let outcome = a_star(puzzle, Limits::states(A_STAR_STATE_CAP));
        (outcome.found(), outcome.expanded as u64)
    });
    comparison.measure("Hill Climbing (Warnsdorff)", || {
        let climb = hill_climb(puzzle, size * size);
        (climb.found, climb.state.length() as u64)
    });

    comparison
}

pub fn demo() -> Result<()> {
    for &size in DEMO_SIZES.iter() {
        log::info!(
            "touring a {}x{} board from ({}, {})",
            size,
            size,
            START.0,
            START.1
        );
        let puzzle = KnightsTour::new(size, START)?;
        compare(&puzzle).print()?;
    }
    Ok(())
}
