mod cli;

use anyhow::Result;
use clap::Parser;

use cli::dispatch::dispatch;
use cli::types::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    stagechain::logging::init(cli.verbose);
    dispatch(cli.config, cli.command)
}
