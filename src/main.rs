use anyhow::Result;
use clap::{Parser, Subcommand};

use search_demos::*;

#[derive(Parser)]
#[command(author, version, about = "Timed comparisons of classical search algorithms", long_about = None)]
struct Cli {
    /// Demonstration to run, every one when omitted
    #[command(subcommand)]
    demo: Option<Demo>,
}

#[derive(Subcommand, Clone, Copy)]
enum Demo {
    #[command(about = "Constraint-satisfaction puzzles under each solver strategy")]
    Csp,
    #[command(about = "Place N queens on an N×N board", alias = "nq")]
    Queens,
    #[command(about = "Visit every square of the board with a knight", alias = "kt")]
    Knight,
    #[command(about = "Towers of Hanoi with more than three pegs")]
    Hanoi,
    #[command(about = "Colour a graph with a fixed palette", alias = "color")]
    Coloring,
    #[command(about = "Find equilibria of two-player games", alias = "ne")]
    Nash,
    #[command(about = "Run every demonstration in turn")]
    All,
}

fn run(demo: Demo) -> Result<()> {
    match demo {
        Demo::Csp => puzzles::demo(),
        Demo::Queens => queens::demo(),
        Demo::Knight => knight::demo(),
        Demo::Hanoi => hanoi::demo(),
        Demo::Coloring => coloring::demo(),
        Demo::Nash => nash::demo(),
        Demo::All => {
            for demo in [
                Demo::Csp,
                Demo::Queens,
                Demo::Knight,
                Demo::Hanoi,
                Demo::Coloring,
                Demo::Nash,
            ]
            .iter()
            {
                run(*demo)?;
            }
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run(cli.demo.unwrap_or(Demo::All))?;

    log::info!("done");
    Ok(())
}
