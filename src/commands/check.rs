//! Validate configuration
//! Usage: stagechain check

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::stage::Session;

use super::common::{config_paths, open_session};

/// Summary line for a loaded session
pub fn render_summary(session: &Session) -> String {
    let registry = session.registry();
    format!(
        "{} Configuration OK: {} projects, {} stages, {} pipelines",
        "✓".green().bold(),
        registry.projects().count(),
        registry.stages().count(),
        registry.pipelines().count()
    )
}

/// Load every configuration file and build all pipelines
pub fn execute(config: Option<&Path>) -> Result<()> {
    let paths = config_paths(config)?;
    for path in &paths {
        println!("{} {}", "Loading".dimmed(), path.display());
    }

    let session = open_session(config)?;
    println!("{}", render_summary(&session));
    Ok(())
}
