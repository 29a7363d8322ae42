//! Tricolor CLI - arbitrate games between sowing-game agents.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{ArgAction, Parser, Subcommand};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tricolor::{AgentCommand, SeriesConfig};

/// Tricolor - arbiter for the tri-colored seed sowing game
#[derive(Parser, Debug)]
#[command(name = "tricolor")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log more to stderr (-v info, -vv debug; default honours RUST_LOG)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one game between two agents
    Play {
        /// Command line of the first agent (plays J1)
        agent1: AgentCommand,

        /// Command line of the second agent (plays J2)
        agent2: AgentCommand,

        /// Time each agent has to answer, in milliseconds
        #[arg(long, default_value = "3000")]
        timeout_ms: u64,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::PlayFormat,

        /// Print the board after each move
        #[arg(long)]
        board: bool,

        /// Suppress per-move progress lines
        #[arg(short, long)]
        quiet: bool,

        /// Pass agent stderr through
        #[arg(long)]
        agent_stderr: bool,
    },

    /// Play many games between two agents and aggregate statistics
    Series {
        /// Command line of the first agent
        agent1: AgentCommand,

        /// Command line of the second agent
        agent2: AgentCommand,

        /// Number of games to run
        #[arg(short, long, default_value = "10")]
        games: u64,

        /// Parallel games (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Time each agent has to answer, in milliseconds
        #[arg(long, default_value = "3000")]
        timeout_ms: u64,

        /// Keep the first agent in the first seat for every game
        #[arg(long)]
        no_swap: bool,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::SeriesFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,

        /// Pass agent stderr through
        #[arg(long)]
        agent_stderr: bool,
    },

    /// Check that an agent answers START with a legal opening move
    Probe {
        /// Command line of the agent
        agent: AgentCommand,

        /// Time the agent has to answer, in milliseconds
        #[arg(long, default_value = "3000")]
        timeout_ms: u64,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Play {
            agent1,
            agent2,
            timeout_ms,
            format,
            board,
            quiet,
            agent_stderr,
        } => cli::play::execute(
            &[agent1, agent2],
            cli::arbiter_config(timeout_ms, agent_stderr),
            format,
            board,
            quiet,
        ),

        Commands::Series {
            agent1,
            agent2,
            games,
            threads,
            timeout_ms,
            no_swap,
            format,
            progress,
            agent_stderr,
        } => {
            let config = SeriesConfig {
                games,
                swap_seats: !no_swap,
                threads,
                arbiter: cli::arbiter_config(timeout_ms, agent_stderr),
            };
            cli::series::execute(&[agent1, agent2], &config, format, progress)
        }

        Commands::Probe { agent, timeout_ms } => {
            cli::probe::execute(&agent, Duration::from_millis(timeout_ms))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
