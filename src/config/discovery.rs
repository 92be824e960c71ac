//! Locating configuration files
//!
//! Files are layered user-level first, then the project file, so project
//! entries override user entries of the same name.

use std::env;
use std::path::{Path, PathBuf};

/// Name of the project-level configuration file
pub const CONFIG_FILE_NAME: &str = "stagechain.yml";

/// Environment variable naming an explicit project configuration file
pub const CONFIG_ENV: &str = "STAGECHAIN_CONFIG";

/// Walk up from `start` looking for `stagechain.yml`
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// `<config dir>/stagechain/stagechain.yml`, if the platform has a config dir
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stagechain").join(CONFIG_FILE_NAME))
}

/// Configuration files to load, in layering order.
///
/// The project file comes from `STAGECHAIN_CONFIG` when set, else from the
/// nearest `stagechain.yml` above `start`. The user file is included only
/// when it exists.
pub fn discover(start: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(user) = user_config_path().filter(|p| p.is_file()) {
        paths.push(user);
    }

    let project = env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .or_else(|| find_project_config(start));

    if let Some(project) = project {
        if !paths.contains(&project) {
            paths.push(project);
        }
    }

    paths
}
