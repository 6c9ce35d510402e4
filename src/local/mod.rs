//! Readers for the data the Local desktop app keeps on disk.

pub mod sites;
pub mod ssh_entry;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

const LOCAL_DIR_NAME: &str = "Local";
const LEGACY_LOCAL_DIR_NAME: &str = "Local by Flywheel";
const SSH_ENTRY_DIR: &str = "ssh-entry";

/// Pick Local's data directory under `base`, falling back to the pre-rename name.
pub fn local_config_dir(base: &Path) -> PathBuf {
    let dir = base.join(LOCAL_DIR_NAME);
    if dir.exists() {
        return dir;
    }
    let legacy = base.join(LEGACY_LOCAL_DIR_NAME);
    if legacy.exists() {
        return legacy;
    }
    dir
}

/// Resolve the Local directory: explicit override, then preferences, then detection.
pub fn resolve_local_dir(explicit: Option<&Path>, preferred: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        debug!(dir = %dir.display(), "using Local directory from command line");
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = preferred {
        debug!(dir = %dir.display(), "using Local directory from preferences");
        return Ok(dir.to_path_buf());
    }
    let base = dirs::config_dir().context("determining the user config directory")?;
    let dir = local_config_dir(&base);
    debug!(dir = %dir.display(), "detected Local directory");
    Ok(dir)
}

pub fn ssh_entry_dir(local_dir: &Path) -> PathBuf {
    local_dir.join(SSH_ENTRY_DIR)
}
