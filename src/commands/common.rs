//! Configuration lookup shared by every command

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{discover, load_session, CONFIG_ENV, CONFIG_FILE_NAME};
use crate::stage::Session;

/// Files to load: the explicit `--config` file alone, or whatever discovery
/// finds from the current directory.
pub fn config_paths(explicit: Option<&Path>) -> Result<Vec<PathBuf>> {
    if let Some(path) = explicit {
        return Ok(vec![path.to_path_buf()]);
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let paths = discover(&cwd);
    if paths.is_empty() {
        bail!(
            "No configuration found. Create {CONFIG_FILE_NAME} or set {CONFIG_ENV}, \
             or pass --config"
        );
    }
    Ok(paths)
}

/// Load the session every command works against
pub fn open_session(explicit: Option<&Path>) -> Result<Session> {
    let paths = config_paths(explicit)?;
    debug!(files = ?paths, "loading configuration");
    load_session(&paths)
}
