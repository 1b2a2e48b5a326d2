//! algo-sandbox: contract test harness CLI for a local Algorand sandbox
//!
//! ## Features
//!
//! - **decode-state**: Turn a raw state delta into readable JSON
//! - **inspect-dryrun**: Summarize a persisted `.dr` request
//! - **run**: Run the app-creation scenario against the sandbox
//!
//! ## Example Usage
//!
//! ```bash
//! # Decode the global delta of a saved dry-run response
//! algo-sandbox decode-state response.json
//!
//! # Look inside a dry-run file
//! algo-sandbox inspect-dryrun dryruns/app_create.dr
//!
//! # Create the sample app on the local sandbox
//! RUST_LOG=debug algo-sandbox run --approval approval.teal --clear clear.teal
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod sandbox_cli;

use sandbox_cli::{decode::DecodeStateCmd, inspect::InspectDryRunCmd, run::RunCmd};

#[derive(Parser)]
#[command(
    name = "algo-sandbox",
    author,
    version,
    about = "Contract test harness for a local Algorand sandbox"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a state delta as readable JSON
    DecodeState(DecodeStateCmd),

    /// Summarize a persisted dry-run request
    InspectDryrun(InspectDryRunCmd),

    /// Run the app-creation scenario
    Run(RunCmd),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let Cli {
        command,
        json,
        verbose,
    } = Cli::parse();
    init_tracing(verbose);

    let result = match command {
        Commands::DecodeState(cmd) => cmd.execute(),
        Commands::InspectDryrun(cmd) => cmd.execute(json),
        Commands::Run(cmd) => cmd.execute(json),
    };

    if let Err(err) = &result {
        eprint!("{}", sandbox_cli::output::format_error(err, json));
        std::process::exit(1);
    }
    result
}
