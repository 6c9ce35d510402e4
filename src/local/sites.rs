use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use tracing::debug;

const SITES_FILE: &str = "sites.json";

/// One entry of Local's `sites.json`.
///
/// Missing keys and explicit `null`s both decode to the empty value.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Site {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mysql: MySqlConfig,
    #[serde(default, deserialize_with = "null_entries_as_default")]
    pub services: HashMap<String, Service>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct MySqlConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub database: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Service {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_entries_as_default")]
    pub ports: HashMap<String, Vec<i64>>,
}

impl Site {
    /// One line per service, e.g. `php 8.2.10 (lightning) HTTP:10003`, sorted.
    pub fn service_summary(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .services
            .iter()
            .map(|(key, service)| {
                let name = if service.name.is_empty() {
                    key.as_str()
                } else {
                    service.name.as_str()
                };
                let mut line = format!("{name} {}", service.version).trim_end().to_string();
                if !service.kind.is_empty() {
                    let _ = write!(line, " ({})", service.kind);
                }
                let mut ports: Vec<String> = service
                    .ports
                    .iter()
                    .flat_map(|(label, numbers)| {
                        numbers.iter().map(move |port| format!("{label}:{port}"))
                    })
                    .collect();
                ports.sort();
                if !ports.is_empty() {
                    let _ = write!(line, " {}", ports.join(","));
                }
                line
            })
            .collect();
        lines.sort();
        lines
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_entries_as_default<'de, D, V>(
    deserializer: D,
) -> std::result::Result<HashMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Default + Deserialize<'de>,
{
    let entries: Option<HashMap<String, Option<V>>> = Option::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, value.unwrap_or_default()))
        .collect())
}

/// Load every site with an ID, ordered by name then ID.
pub fn load_sites(local_dir: &Path) -> Result<Vec<Site>> {
    let path = local_dir.join(SITES_FILE);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("reading site registry at {}", path.display()))?;
    let sites = parse_sites_str(&content)
        .with_context(|| format!("failed to parse {SITES_FILE} at {}", path.display()))?;
    debug!(count = sites.len(), path = %path.display(), "loaded sites");
    Ok(sites)
}

pub(crate) fn parse_sites_str(content: &str) -> Result<Vec<Site>> {
    let by_id: HashMap<String, Option<Site>> = serde_json::from_str(content)?;
    let mut sites: Vec<Site> = by_id
        .into_values()
        .flatten()
        .filter(|site| !site.id.is_empty())
        .collect();
    sites.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(sites)
}

/// Case-insensitive lookup: exact ID, then exact name, then partial name.
/// A blank query matches nothing.
pub fn find_site<'a>(sites: &'a [Site], query: &str) -> Option<&'a Site> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let needle = query.to_lowercase();
    sites
        .iter()
        .find(|site| site.id.eq_ignore_ascii_case(query))
        .or_else(|| {
            sites
                .iter()
                .find(|site| site.name.to_lowercase() == needle)
        })
        .or_else(|| {
            sites
                .iter()
                .find(|site| site.name.to_lowercase().contains(&needle))
        })
}

/// Numbered table used by the picker and the not-found report.
pub fn render_site_list(sites: &[Site]) -> String {
    let mut out = String::from("--- Local Sites ---\n");
    for (idx, site) in sites.iter().enumerate() {
        let domain = if site.domain.is_empty() {
            "no domain"
        } else {
            site.domain.as_str()
        };
        let _ = writeln!(
            out,
            "{}. {:<30} {:<20} (ID: {})",
            idx + 1,
            site.name,
            domain,
            site.id
        );
    }
    out
}
