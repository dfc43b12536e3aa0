//! Classical search and game-theory algorithms on small puzzles
//!
//! Every puzzle implements the [`search::Problem`] trait, so the same
//! breadth-first, depth-first, A*, backtracking and hill-climbing routines
//! run over all of them. Each puzzle module also has a `demo` that times its
//! algorithms against a fixed instance and prints a comparison table.
//!
//! # Basic Usage
//!
//! ```
//! use search_demos::{hanoi::Hanoi, search::{breadth_first, Limits}};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let puzzle = Hanoi::new(4, 4)?;
//! let outcome = breadth_first(&puzzle, Limits::states(100_000));
//!
//! assert_eq!(outcome.path.map(|path| path.len() - 1), Some(9));
//!# Ok(())
//!# }
//! ```

pub use anyhow;

pub mod search;

pub mod report;

pub mod csp;

pub mod puzzles;

pub mod queens;

pub mod knight;

pub mod hanoi;

pub mod coloring;

pub mod nash;

mod test;

/// Seed for the random starting states of local search
pub const SEED: u64 = 42;
