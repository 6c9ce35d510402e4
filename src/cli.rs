use std::io::Write;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, fmt};

use crate::tools::launcher::{self, LaunchRequest};

const AFTER_HELP: &str = "\
ARGUMENTS:
    site_name    Name or ID of the site (fuzzy search supported)
    action       Action to perform (default: shell)
    args         Command to run instead of an interactive session

Options go before site_name; everything after the action is passed on as is.

ACTIONS:
    shell        Opens the container shell (zsh/bash)
    db           Opens MySQL console directly
    wp           Opens WP-CLI interactive shell

EXAMPLES:
    # Open interactive list
    local-cli

    # Jump directly to 'sg' site shell
    local-cli sg

    # Open database for 'updraftplus'
    local-cli updraftplus db

    # Open WP-CLI for site ID '5jc4NXQ8I'
    local-cli 5jc4NXQ8I wp

    # Run a one-off WP-CLI command
    local-cli sg wp plugin list --status=active";

/// Root CLI for local-cli
#[derive(Parser, Debug)]
#[command(name = "local-cli", version)]
#[command(about = "A fast CLI interface for Local by Flywheel/WP")]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// Site name or ID, then the action, then the command to run
    #[arg(
        value_name = "SITE [ACTION] [ARGS]",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub rest: Vec<String>,
    /// Local application data directory (holds sites.json and ssh-entry/)
    #[arg(long, env = "LOCAL_CLI_LOCAL_DIR", value_name = "DIR")]
    pub local_dir: Option<PathBuf>,
    /// List known sites and exit
    #[arg(long)]
    pub list: bool,
    /// Print the script that would run instead of running it
    #[arg(long)]
    pub dry_run: bool,
    /// Print debug diagnostics to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    fn into_request(self) -> LaunchRequest {
        let mut rest = self.rest.into_iter();
        // A blank site name means "no site": fall through to the picker.
        let site = rest.next().filter(|site| !site.trim().is_empty());
        let action = rest.next();
        LaunchRequest {
            site,
            action,
            args: rest.collect(),
            local_dir: self.local_dir,
            list_only: self.list,
            dry_run: self.dry_run,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("LOCAL_CLI_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

/// Dispatch after parse
pub fn run() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.rest.first().map(String::as_str) == Some("help") {
        if let Err(e) = Cli::command().print_long_help() {
            eprintln!("error (help): {e}");
            std::process::exit(1);
        }
        std::process::exit(0);
    }

    let code = match launcher::launch(&cli.into_request()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error (launch): {e:#}");
            1
        }
    };
    let _ = std::io::stdout().flush();
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    fn parse(args: &[&str]) -> Cli {
        let argv = std::iter::once("local-cli").chain(args.iter().copied());
        Cli::try_parse_from(argv).expect("parse")
    }

    #[test]
    fn trailing_args_keep_hyphenated_values() {
        let req = parse(&["blog", "wp", "plugin", "list", "--status=active"]).into_request();

        assert_eq!(req.site.as_deref(), Some("blog"));
        assert_eq!(req.action.as_deref(), Some("wp"));
        assert_eq!(req.args, vec!["plugin", "list", "--status=active"]);
    }

    #[test]
    fn own_flags_after_action_are_forwarded() {
        let cli = parse(&["blog", "php", "-v"]);
        assert!(!cli.verbose);
        assert_eq!(cli.into_request().args, vec!["-v"]);

        let cli = parse(&["blog", "shell", "--list"]);
        assert!(!cli.list);
        assert_eq!(cli.into_request().args, vec!["--list"]);

        let cli = parse(&["blog", "shell", "--dry-run", "--local-dir", "x"]);
        assert!(!cli.dry_run);
        assert_eq!(
            cli.into_request().args,
            vec!["--dry-run", "--local-dir", "x"]
        );
    }

    #[test]
    fn help_and_version_after_action_reach_the_command() {
        let req = parse(&["blog", "wp", "--help"]).into_request();
        assert_eq!(req.action.as_deref(), Some("wp"));
        assert_eq!(req.args, vec!["--help"]);

        let req = parse(&["blog", "wp", "--version"]).into_request();
        assert_eq!(req.args, vec!["--version"]);
    }

    #[test]
    fn flag_right_after_site_is_the_action() {
        let req = parse(&["blog", "-v"]).into_request();
        assert_eq!(req.action.as_deref(), Some("-v"));
        assert!(req.args.is_empty());
    }

    #[test]
    fn blank_site_falls_back_to_picker() {
        let req = parse(&["", "db"]).into_request();
        assert!(req.site.is_none());
        assert_eq!(req.action.as_deref(), Some("db"));

        let req = parse(&["   "]).into_request();
        assert!(req.site.is_none());
        assert!(req.action.is_none());
    }

    #[test]
    fn flags_before_site_are_options() {
        let cli = parse(&["--dry-run", "--local-dir", "/tmp/Local", "-v", "blog"]);

        assert!(cli.dry_run);
        assert!(cli.verbose);
        assert_eq!(cli.local_dir, Some(PathBuf::from("/tmp/Local")));
        let req = cli.into_request();
        assert_eq!(req.site.as_deref(), Some("blog"));
        assert!(req.action.is_none());
        assert!(req.args.is_empty());
    }
}
