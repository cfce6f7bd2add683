//! config-chain: inspect a layered configuration from the command line
//!
//! Builds the same chain a service would (environment, process properties,
//! optional files, bundled resources) and prints the resolved values.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
