//! A binary constraint-satisfaction solver
//!
//! Variables have finite, ordered domains and are linked by binary
//! constraints. The solver is a chronological backtracking search whose
//! variable ordering and inference can be chosen per call, with optional
//! AC-3 preprocessing.

use anyhow::{anyhow, Result};

use std::collections::VecDeque;
use std::fmt::Display;
use std::rc::Rc;

/// A predicate over the values of a constraint's two variables, in scope order
pub type Predicate<V> = Rc<dyn Fn(&V, &V) -> bool>;

#[derive(Clone)]
struct Constraint<V> {
    scope: (usize, usize),
    holds: Predicate<V>,
}

impl<V> Constraint<V> {
    fn involves(&self, var: usize) -> Option<usize> {
        if self.scope.0 == var {
            Some(self.scope.1)
        } else if self.scope.1 == var {
            Some(self.scope.0)
        } else {
            None
        }
    }

    /// Checks the constraint with `var` taking `value` and its partner `other`
    fn admits(&self, var: usize, value: &V, other: &V) -> bool {
        if self.scope.0 == var {
            (self.holds)(value, other)
        } else {
            (self.holds)(other, value)
        }
    }
}

/// Which unassigned variable to branch on next
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VarOrder {
    /// Declaration order
    Static,
    /// Minimum remaining values, ties broken by declaration order
    Mrv,
}

/// What to do with the remaining domains after an assignment
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Inference {
    None,
    /// Prune neighbouring domains, failing as soon as one empties
    ForwardChecking,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Strategy {
    pub order: VarOrder,
    pub inference: Inference,
    /// Enforce arc consistency before searching
    pub arc_consistency: bool,
}

impl Strategy {
    pub const BACKTRACKING: Strategy = Strategy {
        order: VarOrder::Static,
        inference: Inference::None,
        arc_consistency: false,
    };
    pub const FORWARD_CHECKING: Strategy = Strategy {
        order: VarOrder::Static,
        inference: Inference::ForwardChecking,
        arc_consistency: false,
    };
    pub const MRV: Strategy = Strategy {
        order: VarOrder::Mrv,
        inference: Inference::ForwardChecking,
        arc_consistency: false,
    };
    pub const AC3: Strategy = Strategy {
        order: VarOrder::Mrv,
        inference: Inference::ForwardChecking,
        arc_consistency: true,
    };

    /// Every preset, from plainest to most informed
    pub const ALL: [Strategy; 4] = [
        Strategy::BACKTRACKING,
        Strategy::FORWARD_CHECKING,
        Strategy::MRV,
        Strategy::AC3,
    ];

    pub fn label(&self) -> String {
        let mut label = String::from(match self.order {
            VarOrder::Static => "Backtracking",
            VarOrder::Mrv => "MRV",
        });
        if self.inference == Inference::ForwardChecking {
            label.push_str(" + FC");
        }
        if self.arc_consistency {
            label.push_str(" + AC-3");
        }
        label
    }
}

/// The result of a solver run
#[derive(Clone, Debug)]
pub struct Solution<V> {
    /// A value for every variable, in declaration order
    pub assignment: Option<Vec<V>>,
    /// Number of values tried
    pub nodes: usize,
}

#[derive(Clone)]
pub struct Csp<V> {
    names: Vec<String>,
    domains: Vec<Vec<V>>,
    fixed: Vec<Option<V>>,
    constraints: Vec<Constraint<V>>,
}

impl<V: Clone + PartialEq> Csp<V> {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            domains: Vec::new(),
            fixed: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Declares a variable, returning its index
    pub fn variable(&mut self, name: &str, domain: Vec<V>) -> usize {
        self.names.push(name.to_string());
        self.domains.push(domain);
        self.fixed.push(None);
        self.names.len() - 1
    }

    fn len(&self) -> usize {
        self.names.len()
    }

    /// The declared domains, ignoring pre-assignments
    pub fn domains(&self) -> &[Vec<V>] {
        &self.domains
    }

    pub fn index(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| anyhow!("unknown variable '{}'", name))
    }

    /// Adds a constraint `holds(a, b)` between two distinct variables
    pub fn constrain<F>(&mut self, a: &str, b: &str, holds: F) -> Result<()>
    where
        F: Fn(&V, &V) -> bool + 'static,
    {
        let scope = (self.index(a)?, self.index(b)?);
        if scope.0 == scope.1 {
            return Err(anyhow!("constraint on '{}' must involve two variables", a));
        }
        self.constraints.push(Constraint {
            scope,
            holds: Rc::new(holds),
        });
        Ok(())
    }

    /// Fixes a variable to a value of its domain before solving
    pub fn assign(&mut self, name: &str, value: V) -> Result<()> {
        let var = self.index(name)?;
        if !self.domains[var].contains(&value) {
            return Err(anyhow!("value is not in the domain of '{}'", name));
        }
        self.fixed[var] = Some(value);
        Ok(())
    }

    /// Whether `var = value` agrees with every assigned neighbour
    fn consistent(&self, var: usize, value: &V, assignment: &[Option<V>]) -> bool {
        self.constraints.iter().all(|c| match c.involves(var) {
            Some(other) => match &assignment[other] {
                Some(other_value) => c.admits(var, value, other_value),
                None => true,
            },
            None => true,
        })
    }

    /// Removes neighbour values that conflict with `var = value`
    fn forward_check(
        &self,
        var: usize,
        value: &V,
        assignment: &[Option<V>],
        domains: &mut [Vec<V>],
    ) -> bool {
        for c in self.constraints.iter() {
            if let Some(other) = c.involves(var) {
                if assignment[other].is_none() {
                    domains[other].retain(|candidate| c.admits(var, value, candidate));
                    if domains[other].is_empty() {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Enforces arc consistency on `domains`, returning false on a wipe-out
    pub fn ac3(&self, domains: &mut [Vec<V>]) -> bool {
        // an arc is a constraint and the end of it being revised
        let mut queue: VecDeque<(usize, bool)> = (0..self.constraints.len())
            .flat_map(|i| vec![(i, true), (i, false)])
            .collect();

        while let Some((ci, first)) = queue.pop_front() {
            if self.revise(ci, first, domains) {
                let c = &self.constraints[ci];
                let x = if first { c.scope.0 } else { c.scope.1 };
                if domains[x].is_empty() {
                    return false;
                }
                for (k, other) in self.constraints.iter().enumerate() {
                    if k == ci {
                        continue;
                    }
                    if other.scope.1 == x {
                        queue.push_back((k, true));
                    }
                    if other.scope.0 == x {
                        queue.push_back((k, false));
                    }
                }
            }
        }
        true
    }

    /// Drops values of one end of a constraint that have no support at the other
    fn revise(&self, ci: usize, first: bool, domains: &mut [Vec<V>]) -> bool {
        let c = &self.constraints[ci];
        let (x, y) = if first {
            c.scope
        } else {
            (c.scope.1, c.scope.0)
        };
        let support = domains[y].clone();
        let before = domains[x].len();
        domains[x].retain(|value| support.iter().any(|other| c.admits(x, value, other)));
        domains[x].len() != before
    }

    fn select(&self, assignment: &[Option<V>], domains: &[Vec<V>], order: VarOrder) -> Option<usize> {
        let mut unassigned = (0..self.len()).filter(|&var| assignment[var].is_none());
        match order {
            VarOrder::Static => unassigned.next(),
            VarOrder::Mrv => unassigned.min_by_key(|&var| domains[var].len()),
        }
    }

    fn extend(
        &self,
        assignment: &mut Vec<Option<V>>,
        domains: &[Vec<V>],
        strategy: Strategy,
        nodes: &mut usize,
    ) -> bool {
        let var = match self.select(assignment, domains, strategy.order) {
            Some(var) => var,
            None => return true,
        };

        for value in domains[var].iter() {
            *nodes += 1;
            if !self.consistent(var, value, assignment) {
                continue;
            }
            assignment[var] = Some(value.clone());

            let mut pruned = domains.to_vec();
            let viable = match strategy.inference {
                Inference::None => true,
                Inference::ForwardChecking => {
                    self.forward_check(var, value, assignment, &mut pruned)
                }
            };
            if viable && self.extend(assignment, &pruned, strategy, nodes) {
                return true;
            }
            assignment[var] = None;
        }
        false
    }

    /// Searches for the first complete, consistent assignment
    pub fn solve(&self, strategy: Strategy) -> Solution<V> {
        let mut domains = self.domains.clone();
        let mut assignment: Vec<Option<V>> = vec![None; self.len()];
        let mut nodes = 0;

        let unsolvable = Solution {
            assignment: None,
            nodes: 0,
        };

        // pre-assigned variables go first and must agree with each other
        for (var, fixed) in self.fixed.iter().enumerate() {
            if let Some(value) = fixed {
                if !self.consistent(var, value, &assignment) {
                    log::debug!("partial assignment of '{}' is inconsistent", self.names[var]);
                    return unsolvable;
                }
                assignment[var] = Some(value.clone());
                domains[var] = vec![value.clone()];
                if strategy.inference == Inference::ForwardChecking
                    && !self.forward_check(var, value, &assignment, &mut domains)
                {
                    return unsolvable;
                }
            }
        }

        if strategy.arc_consistency && !self.ac3(&mut domains) {
            log::debug!("arc consistency emptied a domain");
            return unsolvable;
        }

        if self.extend(&mut assignment, &domains, strategy, &mut nodes) {
            Solution {
                assignment: assignment.into_iter().collect(),
                nodes,
            }
        } else {
            Solution {
                assignment: None,
                nodes,
            }
        }
    }
}

impl<V: Clone + PartialEq + Display> Csp<V> {
    /// Formats the chosen variables as `A=1, B=2`
    pub fn describe(&self, assignment: &[V], names: &[&str]) -> Result<String> {
        let parts = names
            .iter()
            .map(|&name| -> Result<String> {
                let var = self.index(name)?;
                let value = assignment
                    .get(var)
                    .ok_or_else(|| anyhow!("assignment has no value for '{}'", name))?;
                Ok(format!("{}={}", name, value))
            })
            .collect::<Result<Vec<String>>>()?;
        Ok(parts.join(", "))
    }
}

impl<V: Clone + PartialEq> Default for Csp<V> {
    fn default() -> Self {
        Self::new()
    }
}
