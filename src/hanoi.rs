//! Towers of Hanoi with any number of pegs
//!
//! Disks start stacked on the first peg and must all end up on the last one,
//! never placing a disk on a smaller one.

use anyhow::{anyhow, Result};

use crate::report::Comparison;
use crate::search::{a_star, breadth_first, hill_climb, Limits, Problem};

/// Number of pegs in the demonstration instance
pub const PEGS: usize = 4;
/// Number of disks in the demonstration instance
pub const DISKS: usize = 9;

pub const STATE_CAP: usize = 500_000;
pub const CLIMB_CAP: usize = 50_000;

/// A single disk move between pegs
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

/// The disks on each peg, bottom to top, with 1 the smallest disk
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Towers {
    pegs: Vec<Vec<u8>>,
}

impl Towers {
    pub fn pegs(&self) -> &[Vec<u8>] {
        &self.pegs
    }

    /// The smallest disk on a peg
    pub fn top(&self, peg: usize) -> Option<u8> {
        self.pegs.get(peg).and_then(|disks| disks.last().copied())
    }

    pub fn can_move(&self, from: usize, to: usize) -> bool {
        if from == to || to >= self.pegs.len() {
            return false;
        }
        match (self.top(from), self.top(to)) {
            (Some(disk), Some(target)) => disk < target,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Plays a move, rejecting illegal ones
    pub fn apply(&mut self, step: Move) -> Result<()> {
        if !self.can_move(step.from, step.to) {
            return Err(anyhow!(
                "illegal move from peg {} to peg {}",
                step.from + 1,
                step.to + 1
            ));
        }
        if let Some(disk) = self.pegs[step.from].pop() {
            self.pegs[step.to].push(disk);
        }
        Ok(())
    }
}

/// An instance of the puzzle
#[derive(Clone, Debug)]
pub struct Hanoi {
    pegs: usize,
    disks: usize,
    plan: Plan,
}

impl Hanoi {
    pub fn new(pegs: usize, disks: usize) -> Result<Self> {
        if pegs == 0 {
            return Err(anyhow!("the puzzle needs at least one peg"));
        }
        if disks > u8::MAX as usize {
            return Err(anyhow!(
                "{} disks requested, at most {} are supported",
                disks,
                u8::MAX
            ));
        }
        Ok(Self {
            pegs,
            disks,
            plan: Plan::new(pegs, disks),
        })
    }

    pub fn pegs(&self) -> usize {
        self.pegs
    }

    pub fn disks(&self) -> usize {
        self.disks
    }

    /// All disks on the first peg
    pub fn start(&self) -> Towers {
        let mut pegs = vec![Vec::new(); self.pegs];
        pegs[0] = (1..=self.disks as u8).rev().collect();
        Towers { pegs }
    }

    pub fn is_solved(&self, towers: &Towers) -> bool {
        towers.pegs[self.pegs - 1].len() == self.disks
    }

    /// Number of disks not yet on the last peg
    pub fn misplaced(&self, towers: &Towers) -> u32 {
        (self.disks - towers.pegs[self.pegs - 1].len()) as u32
    }

    /// The Frame-Stewart move count, optimal for three and four pegs
    ///
    /// Returns `None` when the puzzle cannot be solved at all.
    pub fn minimum_moves(&self) -> Option<u64> {
        if self.pegs == 1 {
            return Some(0);
        }
        self.plan.moves[self.pegs][self.disks]
    }

    /// Solves the puzzle recursively
    ///
    /// With three pegs this is the classic recursion. With more, the top disks
    /// are parked on a spare peg using every peg, the rest are moved with one
    /// peg fewer, and the parked disks follow, splitting at the point that
    /// minimises the total number of moves.
    pub fn recursive(&self) -> Option<Vec<Move>> {
        self.minimum_moves()?;
        let mut solution = Vec::new();
        if self.pegs > 1 {
            let spare: Vec<usize> = (1..self.pegs - 1).collect();
            self.plan
                .emit(self.disks, 0, self.pegs - 1, &spare, &mut solution);
        }
        Some(solution)
    }
}

/// Frame-Stewart move counts and the optimal split for each peg and disk count
#[derive(Clone, Debug)]
struct Plan {
    // indexed by [pegs][disks], None where no solution exists
    moves: Vec<Vec<Option<u64>>>,
    split: Vec<Vec<usize>>,
}

impl Plan {
    fn new(pegs: usize, disks: usize) -> Self {
        let mut moves: Vec<Vec<Option<u64>>> = vec![vec![None; disks + 1]; pegs + 1];
        let mut split = vec![vec![0; disks + 1]; pegs + 1];

        for p in 2..=pegs {
            moves[p][0] = Some(0);
            if disks >= 1 {
                moves[p][1] = Some(1);
            }
            for n in 2..=disks {
                for k in 1..n {
                    if let (Some(parked), Some(rest)) = (moves[p][k], moves[p - 1][n - k]) {
                        let total = parked.saturating_mul(2).saturating_add(rest);
                        if moves[p][n].map_or(true, |best| total < best) {
                            moves[p][n] = Some(total);
                            split[p][n] = k;
                        }
                    }
                }
            }
        }
        Self { moves, split }
    }

    fn emit(&self, n: usize, from: usize, to: usize, spare: &[usize], out: &mut Vec<Move>) {
        if n == 0 {
            return;
        }
        if n == 1 {
            out.push(Move { from, to });
            return;
        }
        let (&park, rest) = match spare.split_first() {
            Some(split) => split,
            // unreachable for solvable instances
            None => return,
        };
        let k = self.split[spare.len() + 2][n];

        let mut around_park: Vec<usize> = rest.to_vec();
        around_park.push(to);
        self.emit(k, from, park, &around_park, out);

        self.emit(n - k, from, to, rest, out);

        let mut from_park: Vec<usize> = rest.to_vec();
        from_park.push(from);
        self.emit(k, park, to, &from_park, out);
    }
}

impl Problem for Hanoi {
    type State = Towers;

    fn initial(&self) -> Towers {
        self.start()
    }

    fn successors(&self, towers: &Towers) -> Vec<Towers> {
        let mut next = Vec::new();
        for from in 0..self.pegs {
            for to in 0..self.pegs {
                if towers.can_move(from, to) {
                    let mut moved = towers.clone();
                    if moved.apply(Move { from, to }).is_ok() {
                        next.push(moved);
                    }
                }
            }
        }
        next
    }

    fn is_goal(&self, towers: &Towers) -> bool {
        self.is_solved(towers)
    }

    fn heuristic(&self, towers: &Towers) -> u32 {
        self.misplaced(towers)
    }
}

/// Runs every algorithm over the puzzle
pub fn compare(puzzle: &Hanoi) -> Comparison {
    let mut comparison = Comparison::new(
        format!(
            "Towers of Hanoi (N={}, M={})",
            puzzle.pegs(),
            puzzle.disks()
        ),
        "Nodes/Moves",
    );

    comparison.measure("Recursive / DFS (Frame-Stewart)", || {
        match puzzle.recursive() {
            Some(moves) => (true, moves.len() as u64),
            None => (false, 0),
        }
    });
    comparison.measure("BFS (state space)", || {
        let outcome = breadth_first(puzzle, Limits::states(STATE_CAP));
        (outcome.found(), outcome.generated as u64)
    });
    comparison.measure("A* (misplaced disks)", || {
        let outcome = a_star(puzzle, Limits::states(STATE_CAP));
        (outcome.found(), outcome.expanded as u64)
    });
    comparison.measure("Hill Climbing (local search)", || {
        let climb = hill_climb(puzzle, CLIMB_CAP);
        (climb.found, climb.iterations as u64)
    });

    comparison
}

pub fn demo() -> Result<()> {
    log::info!("solving Towers of Hanoi with {} pegs and {} disks", PEGS, DISKS);
    let puzzle = Hanoi::new(PEGS, DISKS)?;
    compare(&puzzle).print()
}
