//! `wallbot`: runs the goal search against the simulated arena.

mod config_cmd;
mod config_file;
mod probe;
mod run;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "wallbot",
    version,
    about = "Wall-following goal search for a differential-drive robot"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: wallbot.yml in the current directory, if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a search in the simulated arena
    Run(run::RunArgs),

    /// Poll the sensors and print their readings
    Probe(probe::ProbeArgs),

    /// Inspect the effective configuration
    Config(config_cmd::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config_file::load(cli.config.as_deref())?;

    let code = match cli.command {
        Commands::Run(args) => run::execute(config, args).await?,
        Commands::Probe(args) => probe::execute(config, args).await?,
        Commands::Config(args) => config_cmd::execute(&config, &args)?,
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so `run --json` keeps stdout machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
