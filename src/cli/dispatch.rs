use anyhow::Result;
use stagechain::commands::{check, list, resolve, show};
use std::path::PathBuf;

use super::types::Commands;

pub fn dispatch(config: Option<PathBuf>, command: Commands) -> Result<()> {
    let config = config.as_deref();
    match command {
        Commands::Check => check::execute(config),
        Commands::Show { pipeline, json } => show::execute(config, &pipeline, json),
        Commands::Resolve { chain, json } => resolve::execute(config, &chain, json),
        Commands::List { kind } => list::execute(config, kind),
    }
}
