//! The hardcoded constraint-satisfaction puzzles

use anyhow::Result;

use crate::csp::{Csp, Strategy};
use crate::report::Comparison;

use std::io::{stdout, Write};

/// X < Y < Z over {1, 2, 3}
pub fn inequalities() -> Result<Csp<i32>> {
    let mut csp: Csp<i32> = Csp::new();
    for name in ["X", "Y", "Z"].iter() {
        csp.variable(name, vec![1, 2, 3]);
    }
    csp.constrain("X", "Y", |x, y| x < y)?;
    csp.constrain("Y", "Z", |y, z| y < z)?;
    Ok(csp)
}

/// Four tasks placed in hours 1 to 4, with task D already booked at hour 2
pub fn scheduling() -> Result<Csp<i32>> {
    let mut csp: Csp<i32> = Csp::new();
    for name in ["A", "B", "C", "D"].iter() {
        csp.variable(name, vec![1, 2, 3, 4]);
    }
    csp.constrain("A", "B", |a, b| a != b)?;
    csp.constrain("B", "A", |b, a| b > a)?;
    csp.constrain("C", "B", |c, b| c > b)?;
    csp.constrain("D", "C", |d, c| d != c)?;
    csp.assign("D", 2)?;
    Ok(csp)
}

/// The mainland states and territories of Australia in three colours, with
/// Western Australia already red
pub fn australia() -> Result<Csp<&'static str>> {
    let mut csp: Csp<&'static str> = Csp::new();
    for name in ["WA", "NT", "Q", "SA", "NSW", "V", "T"].iter() {
        csp.variable(name, vec!["Red", "Green", "Blue"]);
    }
    let borders = [
        ("WA", "NT"),
        ("WA", "SA"),
        ("NT", "Q"),
        ("NT", "SA"),
        ("Q", "SA"),
        ("Q", "NSW"),
        ("SA", "NSW"),
        ("SA", "V"),
        ("NSW", "V"),
    ];
    for &(a, b) in borders.iter() {
        csp.constrain(a, b, |x, y| x != y)?;
    }
    csp.assign("WA", "Red")?;
    Ok(csp)
}

/// Four queens, one per row, with the first row's queen in column 1
pub fn four_queens() -> Result<Csp<i32>> {
    let size: i32 = 4;
    let mut csp: Csp<i32> = Csp::new();
    let names: Vec<String> = (0..size).map(|row| format!("Q{}", row)).collect();
    for name in names.iter() {
        csp.variable(name, (0..size).collect());
    }
    for i in 0..size {
        for j in i + 1..size {
            let distance = j - i;
            csp.constrain(&names[i as usize], &names[j as usize], move |a, b| {
                a != b && (a - b).abs() != distance
            })?;
        }
    }
    csp.assign("Q0", 1)?;
    Ok(csp)
}

/// Solves the puzzle with every strategy, returning the table and the solution
pub fn compare<V: Clone + PartialEq>(title: &str, csp: &Csp<V>) -> (Comparison, Option<Vec<V>>) {
    let mut comparison = Comparison::new(title, "Assignments");
    let mut solution = None;

    for strategy in Strategy::ALL.iter() {
        comparison.measure(&strategy.label(), || {
            let result = csp.solve(*strategy);
            let found = result.assignment.is_some();
            if solution.is_none() {
                solution = result.assignment;
            }
            (found, result.nodes as u64)
        });
    }

    (comparison, solution)
}

fn print_solution(text: &str) -> Result<()> {
    let mut stdout = stdout();
    writeln!(stdout, "   > Solution: {}", text)?;
    stdout.flush()?;
    Ok(())
}

pub fn demo() -> Result<()> {
    log::info!("solving constraint-satisfaction puzzles");

    let csp = inequalities()?;
    let (comparison, solution) = compare("CSP: Numeric Inequalities (X < Y < Z)", &csp);
    comparison.print()?;
    match solution {
        Some(values) => print_solution(&csp.describe(&values, &["X", "Y", "Z"])?)?,
        None => print_solution("No Solution")?,
    }

    let csp = scheduling()?;
    let (comparison, solution) = compare("CSP: Scheduling Logic (D=2)", &csp);
    comparison.print()?;
    match solution {
        Some(values) => print_solution(&csp.describe(&values, &["A", "B", "C"])?)?,
        None => print_solution("No Solution")?,
    }

    let csp = australia()?;
    let (comparison, solution) = compare("CSP: Map Coloring of Australia (WA=Red)", &csp);
    comparison.print()?;
    match solution {
        Some(values) => print_solution(&csp.describe(&values, &["SA", "NT", "Q"])?)?,
        None => print_solution("No Solution")?,
    }

    let csp = four_queens()?;
    let (comparison, solution) = compare("CSP: 4-Queens (Q0=1)", &csp);
    comparison.print()?;
    match solution {
        Some(values) => print_solution(&format!("{:?}", values))?,
        None => print_solution("No Solution")?,
    }

    Ok(())
}
