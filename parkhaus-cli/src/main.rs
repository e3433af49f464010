//! ## parkhaus-cli
//! **Command-line frontend for the parking lot**
//!
//! Loads layered configuration, installs logging and dispatches to the
//! engine's demo, replay and stress modes.

use clap::Parser;

mod commands;

use commands::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::run_command(cli).await
}
