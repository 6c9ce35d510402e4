use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::load_preferences;
use crate::local::sites::{Site, find_site, load_sites, render_site_list};
use crate::local::ssh_entry::{find_script, patch_script};
use crate::local::{resolve_local_dir, ssh_entry_dir};
use crate::tools::actions::Action;
use crate::tools::picker::{Selection, pick_site};
use crate::utils::shell;

/// Everything the command line asked for.
#[derive(Debug, Clone, Default)]
pub struct LaunchRequest {
    pub site: Option<String>,
    pub action: Option<String>,
    pub args: Vec<String>,
    pub local_dir: Option<PathBuf>,
    pub list_only: bool,
    pub dry_run: bool,
}

/// Run the whole pipeline and return the process exit code.
///
/// Local's entry scripts are host-side wrappers that set up the site's PHP,
/// MySQL and WP-CLI paths, so commands go through a patched copy of the script
/// rather than straight into the container.
pub fn launch(req: &LaunchRequest) -> Result<i32> {
    let prefs = load_preferences()?;
    let bash = prefs.bash();
    let will_execute = !req.list_only && !req.dry_run;
    if will_execute {
        shell::ensure_bash(bash)?;
    }

    let local_dir = resolve_local_dir(req.local_dir.as_deref(), prefs.local_dir.as_deref())?;
    let sites = load_sites(&local_dir)?;
    if sites.is_empty() {
        println!("No sites found.");
        return Ok(0);
    }

    if req.list_only {
        print!("{}", render_site_list(&sites));
        return Ok(0);
    }

    let action = Action::parse(req.action.as_deref().unwrap_or(prefs.default_action()));

    let site = match req.site.as_deref() {
        Some(query) => {
            let Some(site) = find_site(&sites, prefs.resolve_alias(query)) else {
                println!("Site '{query}' not found. Available sites:");
                print!("{}", render_site_list(&sites));
                return Ok(1);
            };
            println!("Found site: {} (Action: {})", site.name, action.label());
            site
        }
        None => {
            let mut input = io::stdin().lock();
            let mut output = io::stdout();
            match pick_site(&sites, &mut input, &mut output)? {
                Selection::Picked(site) => site,
                Selection::Cancelled => return Ok(0),
                Selection::Invalid => return Ok(1),
            }
        }
    };
    debug!(
        id = %site.id,
        name = %site.name,
        services = ?site.service_summary(),
        "selected site"
    );

    let script_path = find_script(&ssh_entry_dir(&local_dir), site)?;
    let command = action.build_command(site, &req.args)?;
    let script = prepare_script(&script_path, &command)?;

    if req.dry_run {
        print!("{script}");
        return Ok(0);
    }

    println!("{}", launch_message(site, &command));
    shell::run_script(bash, &script)
}

fn prepare_script(script_path: &Path, command: &str) -> Result<String> {
    let bytes = fs::read(script_path)
        .with_context(|| format!("reading script {}", script_path.display()))?;
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => {
            warn!(script = %script_path.display(), "script is not valid UTF-8, replacing invalid bytes");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    debug!(script = %script_path.display(), command, "patching entry script");
    Ok(patch_script(&content, command))
}

fn launch_message(site: &Site, command: &str) -> String {
    if command.is_empty() {
        format!("Opening shell for {}...", site.name)
    } else {
        format!("Running '{command}' on {}...", site.name)
    }
}
