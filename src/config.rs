use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

const PREFS_CANDIDATES: &[(&str, PrefsFormat)] = &[
    ("local-cli.yml", PrefsFormat::Yaml),
    ("local-cli.yaml", PrefsFormat::Yaml),
    ("local-cli.toml", PrefsFormat::Toml),
];

pub const DEFAULT_ACTION: &str = "shell";
pub const DEFAULT_BASH: &str = "bash";

#[derive(Debug, Clone)]
pub enum PrefsFormat {
    Yaml,
    Toml,
}

#[derive(Debug, Clone)]
pub struct LoadedPreferences {
    pub path: PathBuf,
    pub data: Preferences,
}

/// User preferences read from `local-cli.{yml,yaml,toml}`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Preferences {
    #[serde(default)]
    pub local_dir: Option<PathBuf>,
    #[serde(default)]
    pub default_action: Option<String>,
    #[serde(default)]
    pub bash: Option<String>,
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl Preferences {
    pub fn default_action(&self) -> &str {
        non_empty(self.default_action.as_deref()).unwrap_or(DEFAULT_ACTION)
    }

    pub fn bash(&self) -> &str {
        non_empty(self.bash.as_deref()).unwrap_or(DEFAULT_BASH)
    }

    /// Expand `query` through the alias table, leaving it untouched when no alias matches.
    pub fn resolve_alias<'a>(&'a self, query: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(query))
            .map(|(_, target)| target.as_str())
            .unwrap_or(query)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Directory searched for preference files.
pub fn preferences_dir() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var("LOCAL_CLI_HOME") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::config_dir().map(|base| base.join("local-cli"))
}

pub fn load_preferences() -> Result<Preferences> {
    let Some(dir) = preferences_dir() else {
        debug!("no user config directory, using default preferences");
        return Ok(Preferences::default());
    };
    Ok(load_preferences_from_dir(&dir)?
        .map(|loaded| {
            debug!(path = %loaded.path.display(), "loaded preferences");
            loaded.data
        })
        .unwrap_or_default())
}

pub fn load_preferences_from_dir(base_dir: &Path) -> Result<Option<LoadedPreferences>> {
    for (file, format) in PREFS_CANDIDATES {
        let path = base_dir.join(file);
        if !path.exists() {
            continue;
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading preferences at {}", path.display()))?;
        let data = match format {
            PrefsFormat::Yaml => parse_yaml_str(&content)
                .with_context(|| format!("parsing YAML preferences at {}", path.display()))?,
            PrefsFormat::Toml => parse_toml_str(&content)
                .with_context(|| format!("parsing TOML preferences at {}", path.display()))?,
        };
        return Ok(Some(LoadedPreferences { path, data }));
    }
    Ok(None)
}

pub(crate) fn parse_yaml_str(content: &str) -> Result<Preferences> {
    // An empty YAML document deserializes to unit, not to a map.
    if content.trim().is_empty() {
        return Ok(Preferences::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

pub(crate) fn parse_toml_str(content: &str) -> Result<Preferences> {
    Ok(toml::from_str(content)?)
}
