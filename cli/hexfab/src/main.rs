//! hexfab CLI — compile transformation puzzles into machine programs.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hexfab", version, about = "Hex-grid machine compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a puzzle file into a solution file
    Solve {
        /// Input .puzzle file
        input: PathBuf,
        /// Output path (default: input with .solution extension)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Solution name recorded in the file
        #[arg(long, default_value = "hexfab")]
        name: String,
    },
    /// Print layout analysis of a puzzle
    Inspect {
        /// Input .puzzle file
        input: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run conformance checks on a solution file
    Check {
        /// Input .solution file
        solution: PathBuf,
        /// Puzzle file the solution should target
        #[arg(long)]
        puzzle: Option<PathBuf>,
    },
    /// Solve every .puzzle file in a directory
    Batch {
        /// Directory to sweep
        dir: PathBuf,
        /// Solution name recorded in each file
        #[arg(long, default_value = "hexfab")]
        name: String,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Solve {
            input,
            output,
            name,
        } => commands::solve::run(&input, output.as_deref(), &name).map(|_| ()),
        Commands::Inspect { input, json } => commands::inspect::run(&input, json),
        Commands::Check { solution, puzzle } => {
            commands::check::run(&solution, puzzle.as_deref())
        }
        Commands::Batch { dir, name } => commands::batch::run(&dir, &name),
    }
}
