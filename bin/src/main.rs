//! Apogee CLI binary.
//!
//! Provides command-line interface for the apogee strategy backtester.

mod cmd;
mod data;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cmd::backtest::{BacktestArgs, run_backtest};
use cmd::signals::list_signals;
use cmd::strategies::list_strategies;

#[derive(Parser)]
#[command(name = "apogee")]
#[command(about = "Backtester for long/short equity strategies", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate strategies against market data
    Backtest(BacktestArgs),

    /// List available strategies
    Strategies,

    /// List available signals
    Signals {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(matches!(&cli.command, Commands::Backtest(args) if args.verbose));

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .ok();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Backtest(args) => run_backtest(&args)?,
        Commands::Strategies => list_strategies(),
        Commands::Signals { verbose } => list_signals(verbose),
    }

    Ok(())
}
