use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use tracing::debug;

/// Fail early when the configured bash cannot be spawned.
pub fn ensure_bash(bash: &str) -> Result<()> {
    if command_exists(bash) {
        return Ok(());
    }
    bail!(
        "'{bash}' command not found. On Windows, install Git Bash or WSL and ensure bash is in your PATH"
    )
}

/// Write `script` to a temporary `local-cli-*.sh` file and run it with bash,
/// attached to the current terminal. Returns the script's exit code.
pub fn run_script(bash: &str, script: &str) -> Result<i32> {
    let mut file = tempfile::Builder::new()
        .prefix("local-cli-")
        .suffix(".sh")
        .tempfile()
        .context("creating temporary script")?;
    file.write_all(script.as_bytes())
        .context("writing temporary script")?;
    file.flush().context("flushing temporary script")?;

    // The file is removed when `file` drops, after bash has exited.
    run_with_bash(bash, file.path())
}

fn run_with_bash(bash: &str, script: &Path) -> Result<i32> {
    debug!(bash, script = %script.display(), "spawning bash");
    let status = Command::new(bash)
        .arg(script)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("running {bash} {}", script.display()))?;

    debug!(?status, "bash finished");
    Ok(status.code().unwrap_or(1))
}

fn command_exists(executable: &str) -> bool {
    Command::new(executable)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Single-quote `input` for bash unless it only holds characters that never need it.
pub fn quote_arg(input: &str) -> String {
    if input.is_empty() {
        return "''".to_string();
    }
    let safe = input.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ':' | '@' | '%' | '+' | '=')
    });
    if safe {
        return input.to_string();
    }
    format!("'{}'", input.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_arg_leaves_plain_values() {
        assert_eq!(quote_arg("root"), "root");
        assert_eq!(quote_arg("local_db-1"), "local_db-1");
    }

    #[test]
    fn quote_arg_wraps_special_values() {
        assert_eq!(quote_arg(""), "''");
        assert_eq!(quote_arg("p@ss word"), "'p@ss word'");
        assert_eq!(quote_arg("it's"), r"'it'\''s'");
        assert_eq!(quote_arg("$HOME"), "'$HOME'");
    }

    #[test]
    fn missing_bash_reports_hint() {
        let err = ensure_bash("definitely-not-a-real-bash-binary").expect_err("must fail");
        assert!(err.to_string().contains("install Git Bash or WSL"));
    }

    #[cfg(unix)]
    #[test]
    fn run_script_returns_exit_code() {
        if ensure_bash("bash").is_err() {
            return;
        }
        assert_eq!(run_script("bash", "exit 0\n").expect("run"), 0);
        assert_eq!(run_script("bash", "exit 7\n").expect("run"), 7);
    }
}
