//! Timing and tabulation of algorithm runs

use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};
use indicatif::{ProgressBar, ProgressStyle};

use std::io::{stdout, Write};
use std::time::{Duration, Instant};

const RULE: &str =
    "--------------------------------------------------------------------------------";

/// A single timed algorithm run
#[derive(Clone, Debug)]
pub struct Run {
    pub name: String,
    pub elapsed: Duration,
    pub found: bool,
    /// Algorithm-specific count, such as nodes expanded or moves made
    pub metric: u64,
}

impl Run {
    pub fn millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// A table of runs over the same problem instance
pub struct Comparison {
    title: String,
    metric_label: &'static str,
    runs: Vec<Run>,
}

impl Comparison {
    pub fn new<S: Into<String>>(title: S, metric_label: &'static str) -> Self {
        Self {
            title: title.into(),
            metric_label,
            runs: Vec::new(),
        }
    }

    /// Times `search`, which reports whether it found a solution and its metric
    pub fn measure<F>(&mut self, name: &str, search: F) -> &Run
    where
        F: FnOnce() -> (bool, u64),
    {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}"));
        spinner.set_message(&format!("running {}", name));
        spinner.enable_steady_tick(100);

        let start = Instant::now();
        let (found, metric) = search();
        let elapsed = start.elapsed();

        spinner.finish_and_clear();
        log::debug!(
            "{}: found={} metric={} in {:.4}ms",
            name,
            found,
            metric,
            elapsed.as_secs_f64() * 1000.0
        );

        self.push(Run {
            name: name.to_string(),
            elapsed,
            found,
            metric,
        })
    }

    /// Records a run that was not timed here, e.g. one skipped as infeasible
    pub fn push(&mut self, run: Run) -> &Run {
        self.runs.push(run);
        &self.runs[self.runs.len() - 1]
    }

    /// The fastest run that found a solution
    pub fn winner(&self) -> Option<&Run> {
        self.runs
            .iter()
            .filter(|run| run.found)
            .fold(None, |best: Option<&Run>, run| match best {
                Some(fastest) if fastest.elapsed <= run.elapsed => Some(fastest),
                _ => Some(run),
            })
    }

    /// The plain-text results table
    pub fn render(&self) -> String {
        let mut table = format!("\n--- {} ---\n{}\n", self.title, RULE);
        table.push_str(&format!(
            "| {:<32} | {:>11} | {:>10} | {:>14} |\n",
            "Algorithm", "Time (ms)", "Found", self.metric_label
        ));
        table.push_str(RULE);
        table.push('\n');
        for run in self.runs.iter() {
            table.push_str(&format!(
                "| {:<32} | {:>11.4} | {:>10} | {:>14} |\n",
                run.name,
                run.millis(),
                if run.found { "Yes" } else { "No" },
                run.metric
            ));
        }
        table.push_str(RULE);
        table.push('\n');
        table
    }

    /// Prints the table followed by the winning algorithm
    pub fn print(&self) -> Result<()> {
        let mut stdout = stdout();
        write!(stdout, "{}", self.render())?;

        match self.winner() {
            Some(run) => {
                stdout.queue(PrintStyledContent(
                    style(format!("\nFastest algorithm for {}:\n", self.title))
                        .attribute(Attribute::Bold)
                        .with(Color::Green),
                ))?;
                writeln!(stdout, "   > Algorithm: {}", run.name)?;
                writeln!(stdout, "   > Time: {:.4} ms", run.millis())?;
            }
            None => {
                stdout.queue(PrintStyledContent(
                    style(format!("\nNo algorithm solved {}\n", self.title))
                        .attribute(Attribute::Bold)
                        .with(Color::Red),
                ))?;
            }
        }
        stdout.flush()?;
        Ok(())
    }
}
