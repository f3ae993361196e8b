//! Skytile CLI - Command-line interface
//!
//! Fetches recent NASA GIBS satellite pictures for a coordinate, or wanders
//! from a start point collecting them into a grid.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::candidates::CandidatesArgs;
use commands::config::ConfigCommands;
use commands::fetch::FetchCommandArgs;
use commands::travel::TravelArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Debug, Parser)]
#[command(name = "skytile", version = skytile::VERSION)]
#[command(about = "Recent satellite pictures for any point on Earth")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch one recent picture of a coordinate
    Fetch(FetchCommandArgs),

    /// Show the tile and shuffled probe list for a coordinate without fetching
    Candidates(CandidatesArgs),

    /// Show the approximate position of this machine by IP address
    Locate,

    /// Periodically fetch pictures while wandering from a start point
    Travel(TravelArgs),

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Fetch(args) => commands::fetch::run(&CliRunner::new(cli.verbose)?, args),
        Commands::Candidates(args) => commands::candidates::run(args),
        Commands::Locate => commands::locate::run(&CliRunner::new(cli.verbose)?),
        Commands::Travel(args) => commands::travel::run(&CliRunner::new(cli.verbose)?, args),
        Commands::Config { command } => commands::config::run(command),
    }
}
