//! The N-Queens puzzle
//!
//! Queens are placed one row at a time, a state being the column of the queen
//! in each filled row. The local search variant instead starts from a full
//! board with one queen per row and column and moves queens within their rows.

use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use rayon::prelude::*;

use crate::report::Comparison;
use crate::search::{a_star, backtrack, breadth_first, hill_climb, Limits, Mode, Problem};
use crate::SEED;

/// Board size of the demonstration instance
pub const SIZE: usize = 4;
/// Largest board accepted, columns are stored as bytes
pub const MAX_SIZE: usize = 32;

pub const STATE_CAP: usize = 500_000;
pub const CLIMB_CAP: usize = 10_000;

/// Checks whether a queen can go in `column` of the row after `placed`
pub fn is_safe(placed: &[u8], column: u8) -> bool {
    let row = placed.len();
    placed.iter().enumerate().all(|(r, &c)| {
        c != column && (c as i32 - column as i32).abs() != (row - r) as i32
    })
}

/// Number of pairs of queens attacking each other, one queen per row
pub fn conflicts(queens: &[u8]) -> u32 {
    let mut count = 0;
    for i in 0..queens.len() {
        for j in i + 1..queens.len() {
            if queens[i] == queens[j]
                || (queens[i] as i32 - queens[j] as i32).abs() == (j - i) as i32
            {
                count += 1;
            }
        }
    }
    count
}

/// Incremental placement, one row at a time
#[derive(Clone, Debug)]
pub struct Queens {
    size: usize,
    prefix: Vec<u8>,
}

impl Queens {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || size > MAX_SIZE {
            return Err(anyhow!(
                "board size {} out of range, must be between 1 and {}",
                size,
                MAX_SIZE
            ));
        }
        Ok(Self {
            size,
            prefix: Vec::new(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The same puzzle with the first row's queen already placed
    fn rooted_at(&self, column: u8) -> Self {
        Self {
            size: self.size,
            prefix: vec![column],
        }
    }

    /// Counts every solution with a single backtracking search
    pub fn count_solutions(&self) -> usize {
        backtrack(self, Mode::All, usize::MAX).solutions
    }

    /// Counts every solution, searching each first-row column in parallel
    pub fn count_solutions_parallel(&self) -> usize {
        (0..self.size as u8)
            .into_par_iter()
            .map(|column| backtrack(&self.rooted_at(column), Mode::All, usize::MAX).solutions)
            .sum()
    }
}

impl Problem for Queens {
    type State = Vec<u8>;

    fn initial(&self) -> Vec<u8> {
        self.prefix.clone()
    }

    fn successors(&self, placed: &Vec<u8>) -> Vec<Vec<u8>> {
        if placed.len() >= self.size {
            return Vec::new();
        }
        (0..self.size as u8)
            .filter(|&column| is_safe(placed, column))
            .map(|column| {
                let mut next = placed.clone();
                next.push(column);
                next
            })
            .collect()
    }

    fn is_goal(&self, placed: &Vec<u8>) -> bool {
        placed.len() == self.size
    }
}

/// Complete-board formulation for local search
#[derive(Clone, Debug)]
pub struct QueensClimb {
    start: Vec<u8>,
}

impl QueensClimb {
    /// Starts from a random permutation, so no two queens share a column
    pub fn seeded(size: usize, seed: u64) -> Result<Self> {
        if size == 0 || size > MAX_SIZE {
            return Err(anyhow!(
                "board size {} out of range, must be between 1 and {}",
                size,
                MAX_SIZE
            ));
        }
        let mut start: Vec<u8> = (0..size as u8).collect();
        start.shuffle(&mut SmallRng::seed_from_u64(seed));
        Ok(Self { start })
    }

    pub fn start(&self) -> &[u8] {
        &self.start
    }
}

impl Problem for QueensClimb {
    type State = Vec<u8>;

    fn initial(&self) -> Vec<u8> {
        self.start.clone()
    }

    fn successors(&self, queens: &Vec<u8>) -> Vec<Vec<u8>> {
        let size = queens.len() as u8;
        let mut next = Vec::new();
        for row in 0..queens.len() {
            for column in 0..size {
                if column != queens[row] {
                    let mut moved = queens.clone();
                    moved[row] = column;
                    next.push(moved);
                }
            }
        }
        next
    }

    fn is_goal(&self, queens: &Vec<u8>) -> bool {
        conflicts(queens) == 0
    }

    fn heuristic(&self, queens: &Vec<u8>) -> u32 {
        conflicts(queens)
    }
}

/// Runs every algorithm over a board
pub fn compare(puzzle: &Queens) -> Result<Comparison> {
    let mut comparison = Comparison::new(format!("N-Queens (N={})", puzzle.size()), "Solutions/Nodes");

    comparison.measure("Backtracking (all solutions)", || {
        let count = puzzle.count_solutions();
        (count > 0, count as u64)
    });
    comparison.measure("Backtracking (parallel count)", || {
        let count = puzzle.count_solutions_parallel();
        (count > 0, count as u64)
    });
    comparison.measure("DFS (first solution)", || {
        let result = backtrack(puzzle, Mode::First, usize::MAX);
        (result.found(), result.nodes as u64)
    });
    comparison.measure("BFS (first solution)", || {
        let outcome = breadth_first(puzzle, Limits::states(STATE_CAP));
        (outcome.found(), outcome.expanded as u64)
    });
    comparison.measure("A* (h=0)", || {
        let outcome = a_star(puzzle, Limits::states(STATE_CAP));
        (outcome.found(), outcome.expanded as u64)
    });

    let climber = QueensClimb::seeded(puzzle.size(), SEED)?;
    comparison.measure("Hill Climbing (local search)", || {
        let climb = hill_climb(&climber, CLIMB_CAP);
        (climb.found, climb.iterations as u64)
    });

    Ok(comparison)
}

pub fn demo() -> Result<()> {
    log::info!("placing {} queens", SIZE);
    let puzzle = Queens::new(SIZE)?;
    compare(&puzzle)?.print()
}
