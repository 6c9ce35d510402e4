use anyhow::{Result, bail};

use crate::local::sites::Site;
use crate::utils::shell::quote_arg;

/// What to run inside a site's environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Interactive shell, or the extra args as a raw command.
    Shell,
    /// MySQL console for the site database.
    Db,
    /// WP-CLI, interactive unless args are given.
    Wp,
    Custom(String),
}

impl Action {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "shell" => Action::Shell,
            "db" => Action::Db,
            "wp" => Action::Wp,
            _ => Action::Custom(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Action::Shell => "shell",
            Action::Db => "db",
            Action::Wp => "wp",
            Action::Custom(name) => name,
        }
    }

    /// Command line appended to the entry script. Empty means stay interactive.
    ///
    /// Extra args are joined without quoting so `&&` and pipes reach the shell.
    pub fn build_command(&self, site: &Site, args: &[String]) -> Result<String> {
        let command = match self {
            Action::Db => mysql_command(site)?,
            Action::Wp if args.is_empty() => String::new(),
            Action::Wp => format!("wp {}", args.join(" ")),
            Action::Shell | Action::Custom(_) => args.join(" "),
        };
        Ok(command)
    }
}

fn mysql_command(site: &Site) -> Result<String> {
    let mysql = &site.mysql;
    if mysql.database.is_empty() {
        bail!("No MySQL configuration found for this site.");
    }

    let mut parts = vec!["mysql".to_string(), format!("-u{}", quote_arg(&mysql.user))];
    if !mysql.password.is_empty() {
        parts.push(format!("-p{}", quote_arg(&mysql.password)));
    }
    parts.push(quote_arg(&mysql.database));
    Ok(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::sites::MySqlConfig;

    fn site_with_db(database: &str, user: &str, password: &str) -> Site {
        Site {
            id: "aB3xYz".to_string(),
            name: "blog".to_string(),
            mysql: MySqlConfig {
                database: database.to_string(),
                user: user.to_string(),
                password: password.to_string(),
            },
            ..Site::default()
        }
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_known_actions_case_insensitively() {
        assert_eq!(Action::parse("SHELL"), Action::Shell);
        assert_eq!(Action::parse("db"), Action::Db);
        assert_eq!(Action::parse(" Wp "), Action::Wp);
        assert_eq!(Action::parse("logs"), Action::Custom("logs".to_string()));
        assert_eq!(Action::parse("logs").label(), "logs");
    }

    #[test]
    fn db_builds_mysql_console_command() {
        let site = site_with_db("local", "root", "root");
        let cmd = Action::Db.build_command(&site, &[]).expect("command");
        assert_eq!(cmd, "mysql -uroot -proot local");
    }

    #[test]
    fn db_quotes_unsafe_credentials_and_skips_empty_password() {
        let site = site_with_db("local", "root", "p@ss word");
        let cmd = Action::Db.build_command(&site, &[]).expect("command");
        assert_eq!(cmd, "mysql -uroot -p'p@ss word' local");

        let site = site_with_db("local", "root", "");
        let cmd = Action::Db.build_command(&site, &[]).expect("command");
        assert_eq!(cmd, "mysql -uroot local");
    }

    #[test]
    fn db_without_database_is_an_error() {
        let site = site_with_db("", "root", "root");
        let err = Action::Db.build_command(&site, &[]).expect_err("must fail");
        assert_eq!(err.to_string(), "No MySQL configuration found for this site.");
    }

    #[test]
    fn wp_is_interactive_without_args() {
        let site = Site::default();
        assert_eq!(Action::Wp.build_command(&site, &[]).expect("command"), "");
        assert_eq!(
            Action::Wp
                .build_command(&site, &args(&["plugin", "list", "--status=active"]))
                .expect("command"),
            "wp plugin list --status=active"
        );
    }

    #[test]
    fn shell_and_custom_join_args_verbatim() {
        let site = Site::default();
        assert_eq!(Action::Shell.build_command(&site, &[]).expect("command"), "");
        assert_eq!(
            Action::Shell
                .build_command(&site, &args(&["ls", "-la", "&&", "pwd"]))
                .expect("command"),
            "ls -la && pwd"
        );
        assert_eq!(
            Action::Custom("run".to_string())
                .build_command(&site, &args(&["php", "-v"]))
                .expect("command"),
            "php -v"
        );
    }
}
