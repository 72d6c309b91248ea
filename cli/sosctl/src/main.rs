//! sosctl - operator CLI for the SOS relief platform
//!
//! Bootstrap and maintenance tasks that talk to the database directly:
//! creating the first admin, changing roles, inspecting users.

use anyhow::Result;
use clap::Parser;

mod commands;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = cli.run().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
