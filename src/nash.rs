//! Equilibria of two-player normal-form games
//!
//! Player 1 picks a row, player 2 a column, and each cell holds the pair of
//! payoffs. A cell is a pure Nash equilibrium when neither player can do
//! strictly better by deviating alone.

use anyhow::{anyhow, Result};
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use crate::report::Comparison;

use std::io::{stdout, Write};

/// A pure strategy profile, the row and column chosen
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Profile {
    pub row: usize,
    pub col: usize,
}

/// A fully mixed equilibrium of a 2×2 game
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mixed {
    /// Probability that player 1 plays the first row
    pub row: f64,
    /// Probability that player 2 plays the first column
    pub col: f64,
}

/// How an analysis result is reported
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Notation {
    /// Strategy names, `(U, L)`
    Labels,
    /// Payoff pairs, `(2,2)`
    Payoffs,
    /// Only whether a pure equilibrium exists
    Existence,
}

#[derive(Clone, Debug)]
pub struct Game {
    name: String,
    rows: Vec<String>,
    cols: Vec<String>,
    payoffs: Vec<Vec<(i32, i32)>>,
}

impl Game {
    pub fn new(
        name: &str,
        rows: &[&str],
        cols: &[&str],
        payoffs: Vec<Vec<(i32, i32)>>,
    ) -> Result<Self> {
        if rows.is_empty() || cols.is_empty() {
            return Err(anyhow!("game '{}' needs at least one strategy per player", name));
        }
        if payoffs.len() != rows.len() {
            return Err(anyhow!(
                "game '{}' has {} payoff rows for {} strategies",
                name,
                payoffs.len(),
                rows.len()
            ));
        }
        if let Some(r) = payoffs.iter().position(|row| row.len() != cols.len()) {
            return Err(anyhow!(
                "payoff row {} of game '{}' has {} cells, expected {}",
                r,
                name,
                payoffs[r].len(),
                cols.len()
            ));
        }
        Ok(Self {
            name: name.to_string(),
            rows: rows.iter().map(|s| s.to_string()).collect(),
            cols: cols.iter().map(|s| s.to_string()).collect(),
            payoffs,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payoff(&self, profile: Profile) -> (i32, i32) {
        self.payoffs[profile.row][profile.col]
    }

    pub fn is_equilibrium(&self, profile: Profile) -> bool {
        let (p1, p2) = self.payoff(profile);
        let row_best = (0..self.rows.len()).all(|r| self.payoffs[r][profile.col].0 <= p1);
        let col_best = (0..self.cols.len()).all(|c| self.payoffs[profile.row][c].1 <= p2);
        row_best && col_best
    }

    /// Every pure equilibrium, in row-major order
    pub fn pure_equilibria(&self) -> Vec<Profile> {
        let mut found = Vec::new();
        for row in 0..self.rows.len() {
            for col in 0..self.cols.len() {
                let profile = Profile { row, col };
                if self.is_equilibrium(profile) {
                    found.push(profile);
                }
            }
        }
        found
    }

    /// Solves the indifference conditions of a 2×2 game
    ///
    /// Returns `None` for other shapes, and when no equilibrium has both
    /// players strictly mixing.
    pub fn mixed_equilibrium_2x2(&self) -> Option<Mixed> {
        if self.rows.len() != 2 || self.cols.len() != 2 {
            return None;
        }
        let a = |r: usize, c: usize| self.payoffs[r][c].0 as f64;
        let b = |r: usize, c: usize| self.payoffs[r][c].1 as f64;

        // player 1's mix makes player 2 indifferent, and vice versa
        let row_den = b(0, 0) - b(1, 0) - b(0, 1) + b(1, 1);
        let col_den = a(0, 0) - a(0, 1) - a(1, 0) + a(1, 1);
        if row_den == 0.0 || col_den == 0.0 {
            return None;
        }
        let row = (b(1, 1) - b(1, 0)) / row_den;
        let col = (a(1, 1) - a(0, 1)) / col_den;

        let strict = |p: f64| p > 0.0 && p < 1.0;
        if strict(row) && strict(col) {
            Some(Mixed { row, col })
        } else {
            None
        }
    }

    /// Iterated elimination of strictly dominated pure strategies
    ///
    /// Returns the surviving rows and columns.
    pub fn eliminate_dominated(&self) -> (Vec<usize>, Vec<usize>) {
        let mut rows: Vec<usize> = (0..self.rows.len()).collect();
        let mut cols: Vec<usize> = (0..self.cols.len()).collect();

        loop {
            let dominated_row = rows.iter().position(|&r| {
                rows.iter().any(|&other| {
                    other != r
                        && cols
                            .iter()
                            .all(|&c| self.payoffs[other][c].0 > self.payoffs[r][c].0)
                })
            });
            if let Some(i) = dominated_row {
                rows.remove(i);
                continue;
            }

            let dominated_col = cols.iter().position(|&c| {
                cols.iter().any(|&other| {
                    other != c
                        && rows
                            .iter()
                            .all(|&r| self.payoffs[r][other].1 > self.payoffs[r][c].1)
                })
            });
            match dominated_col {
                Some(i) => {
                    cols.remove(i);
                }
                None => break,
            }
        }

        (rows, cols)
    }

    /// Formats a profile as its strategy names, `(U, L)`
    pub fn label(&self, profile: Profile) -> String {
        format!("({}, {})", self.rows[profile.row], self.cols[profile.col])
    }

    /// Reports a set of equilibria in the given notation
    pub fn summary(&self, equilibria: &[Profile], notation: Notation) -> String {
        if notation == Notation::Existence {
            return String::from(if equilibria.is_empty() { "No" } else { "Yes" });
        }
        if equilibria.is_empty() {
            return String::from("None");
        }
        equilibria
            .iter()
            .map(|&profile| match notation {
                Notation::Payoffs => {
                    let (p1, p2) = self.payoff(profile);
                    format!("({},{})", p1, p2)
                }
                _ => self.label(profile),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The demonstration games and how each reports its answer
pub fn showcase() -> Result<Vec<(Game, Notation)>> {
    Ok(vec![
        (
            Game::new(
                "Battle of the Sexes",
                &["U", "D"],
                &["L", "R"],
                vec![vec![(2, 1), (0, 0)], vec![(0, 0), (1, 2)]],
            )?,
            Notation::Labels,
        ),
        (
            Game::new(
                "3x3 Game",
                &["T", "M", "B"],
                &["L", "C", "R"],
                vec![
                    vec![(3, 3), (0, 4), (1, 0)],
                    vec![(4, 0), (2, 2), (0, 0)],
                    vec![(0, 1), (0, 0), (5, 5)],
                ],
            )?,
            Notation::Payoffs,
        ),
        (
            Game::new(
                "Stag Hunt",
                &["Stag", "Hare"],
                &["Stag", "Hare"],
                vec![vec![(4, 4), (0, 2)], vec![(2, 0), (2, 2)]],
            )?,
            Notation::Labels,
        ),
        (
            Game::new(
                "Prisoner's Dilemma",
                &["Coop", "Betray"],
                &["Coop", "Betray"],
                vec![vec![(3, 3), (0, 5)], vec![(5, 0), (1, 1)]],
            )?,
            Notation::Labels,
        ),
        (
            Game::new(
                "Matching Pennies",
                &["Heads", "Tails"],
                &["Heads", "Tails"],
                vec![vec![(1, -1), (-1, 1)], vec![(-1, 1), (1, -1)]],
            )?,
            Notation::Existence,
        ),
    ])
}

/// Times the analyses of one game and prints its equilibria
pub fn analyse(game: &Game, notation: Notation) -> Result<()> {
    let mut comparison = Comparison::new(format!("Nash: {}", game.name()), "Profiles");
    let mut equilibria = Vec::new();

    comparison.measure("Exhaustive payoff scan", || {
        equilibria = game.pure_equilibria();
        (!equilibria.is_empty(), equilibria.len() as u64)
    });
    comparison.measure("Iterated strict dominance", || {
        let (rows, cols) = game.eliminate_dominated();
        (rows.len() == 1 && cols.len() == 1, (rows.len() * cols.len()) as u64)
    });
    comparison.print()?;

    let mut stdout = stdout();
    stdout.queue(PrintStyledContent(
        style("Pure equilibria:\n").attribute(Attribute::Bold).with(Color::Cyan),
    ))?;
    writeln!(stdout, "   > Result: {}", game.summary(&equilibria, notation))?;
    if let Some(mixed) = game.mixed_equilibrium_2x2() {
        writeln!(
            stdout,
            "   > Mixed: row plays first with p = {:.4}, column with q = {:.4}",
            mixed.row, mixed.col
        )?;
    }
    stdout.flush()?;
    Ok(())
}

pub fn demo() -> Result<()> {
    for (game, notation) in showcase()? {
        log::info!("analysing {}", game.name());
        analyse(&game, notation)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(name: &str) -> Result<(Game, Notation)> {
        showcase()?
            .into_iter()
            .find(|(game, _)| game.name() == name)
            .ok_or_else(|| anyhow!("no game named {}", name))
    }

    #[test]
    fn showcase_results() -> Result<()> {
        let expected = [
            ("Battle of the Sexes", "(U, L), (D, R)"),
            ("3x3 Game", "(2,2), (5,5)"),
            ("Stag Hunt", "(Stag, Stag), (Hare, Hare)"),
            ("Prisoner's Dilemma", "(Betray, Betray)"),
            ("Matching Pennies", "No"),
        ];
        for &(name, result) in expected.iter() {
            let (game, notation) = find(name)?;
            assert_eq!(game.summary(&game.pure_equilibria(), notation), result);
        }
        Ok(())
    }

    #[test]
    fn mixed_strategies() -> Result<()> {
        let (sexes, _) = find("Battle of the Sexes")?;
        let mixed = sexes
            .mixed_equilibrium_2x2()
            .ok_or_else(|| anyhow!("expected a mixed equilibrium"))?;
        assert!((mixed.row - 2.0 / 3.0).abs() < 1e-9);
        assert!((mixed.col - 1.0 / 3.0).abs() < 1e-9);

        let (pennies, _) = find("Matching Pennies")?;
        assert_eq!(
            pennies.mixed_equilibrium_2x2(),
            Some(Mixed { row: 0.5, col: 0.5 })
        );

        let (dilemma, _) = find("Prisoner's Dilemma")?;
        assert_eq!(dilemma.mixed_equilibrium_2x2(), None);
        Ok(())
    }

    #[test]
    fn dominance() -> Result<()> {
        let (dilemma, _) = find("Prisoner's Dilemma")?;
        assert_eq!(dilemma.eliminate_dominated(), (vec![1], vec![1]));

        let (stag, _) = find("Stag Hunt")?;
        assert_eq!(stag.eliminate_dominated(), (vec![0, 1], vec![0, 1]));
        Ok(())
    }

    #[test]
    fn ragged_payoffs() {
        assert!(Game::new("ragged", &["A", "B"], &["X", "Y"], vec![vec![(0, 0), (1, 1)], vec![(0, 0)]]).is_err());
        assert!(Game::new("empty", &[], &["X"], vec![]).is_err());
    }
}
