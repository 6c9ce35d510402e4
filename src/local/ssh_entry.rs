use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use super::sites::Site;

const SCRIPT_EXTENSION: &str = ".sh";
const INTERACTIVE_EXEC: &str = "exec $SHELL";
const LAUNCH_BANNER: &str = "Launching shell";

/// Locate the SSH-entry script Local generated for `site`.
///
/// Scripts are scanned in file-name order. A script mentioning the site ID wins
/// over one that only mentions the last component of the site path.
pub fn find_script(ssh_dir: &Path, site: &Site) -> Result<PathBuf> {
    let scripts = read_scripts(ssh_dir)?;
    debug!(dir = %ssh_dir.display(), count = scripts.len(), "scanning ssh-entry scripts");

    if !site.id.is_empty() {
        if let Some((path, _)) = scripts.iter().find(|(_, body)| body.contains(&site.id)) {
            debug!(script = %path.display(), "matched script by site id");
            return Ok(path.clone());
        }
    }

    if let Some(base) = path_basename(&site.path) {
        if let Some((path, _)) = scripts.iter().find(|(_, body)| body.contains(base)) {
            debug!(script = %path.display(), "matched script by site path");
            return Ok(path.clone());
        }
    }

    bail!("no matching shell script found for site: {}", site.name)
}

fn read_scripts(ssh_dir: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(ssh_dir)
        .with_context(|| format!("reading ssh-entry directory {}", ssh_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(SCRIPT_EXTENSION))
        })
        .collect();
    paths.sort();

    let mut scripts = Vec::with_capacity(paths.len());
    for path in paths {
        // Matching is substring search, so invalid UTF-8 elsewhere in a script is fine.
        match fs::read(&path) {
            Ok(bytes) => {
                let body = String::from_utf8_lossy(&bytes).into_owned();
                scripts.push((path, body));
            }
            Err(e) => warn!(script = %path.display(), "skipping unreadable script: {e}"),
        }
    }
    Ok(scripts)
}

/// Last component of a site path as written in `sites.json` (may use `~` or `\`).
fn path_basename(raw: &str) -> Option<&str> {
    raw.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .filter(|base| !base.is_empty() && *base != "~")
}

/// Rewrite an SSH-entry script so it runs `command` and exits instead of
/// dropping into an interactive shell. An empty command keeps the script as is.
pub fn patch_script(content: &str, command: &str) -> String {
    if command.is_empty() {
        return content.to_string();
    }

    let kept: Vec<&str> = content
        .split('\n')
        .filter(|line| {
            let trimmed = line.trim();
            trimmed != INTERACTIVE_EXEC && !trimmed.contains(LAUNCH_BANNER)
        })
        .collect();

    format!("{}\nexec {command}\n", kept.join("\n"))
}
