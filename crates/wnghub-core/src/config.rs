use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Fields reachable through `get_field` / `set_field`
pub const CONFIG_FIELDS: &[&str] = &[
    "auth_token",
    "api_url",
    "per_page",
    "show_num_results",
    "only_include_repos",
    "only_include_orgs",
    "only_include_reasons",
    "exclude_repos",
    "exclude_orgs",
    "exclude_reasons",
    "show_read_results",
    "only_include_participating",
    "only_include_since",
    "only_include_before",
    "include_issues",
    "include_prs",
];

/// Fields that have their own command instead of `config set`
const SET_ELSEWHERE: &[(&str, &str)] = &[("auth_token", "set-auth")];

/// User configuration: auth token plus default filter values
///
/// A plain value. Nothing here touches the disk unless `load`/`save` is
/// called, and the CLI only does that at process start and on explicit
/// config commands. Every field is optional; `None` means "use the
/// built-in default" when a request is reconciled.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// GitHub personal access token (needs the `notifications` scope)
    pub auth_token: Option<String>,

    /// API URL (for GitHub Enterprise)
    pub api_url: Option<String>,

    /// Page size used when paging through notifications, 1..=100
    pub per_page: Option<u32>,

    pub show_num_results: Option<usize>,
    pub only_include_repos: Option<Vec<String>>,
    pub only_include_orgs: Option<Vec<String>>,
    pub only_include_reasons: Option<Vec<String>>,
    pub exclude_repos: Option<Vec<String>>,
    pub exclude_orgs: Option<Vec<String>>,
    pub exclude_reasons: Option<Vec<String>>,
    pub show_read_results: Option<bool>,
    pub only_include_participating: Option<bool>,
    pub only_include_since: Option<DateTime<Utc>>,
    pub only_include_before: Option<DateTime<Utc>>,
    pub include_issues: Option<bool>,
    pub include_prs: Option<bool>,
}

impl Config {
    /// Load config from the default location, or defaults if there is none
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        // First run? Nothing on disk yet, so defaults it is
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the config file path
    /// Uses XDG on Linux, Library/Application Support on macOS, AppData on Windows
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::ConfigError("Could not find config directory".into()))?
            .join("wnghub");

        Ok(config_dir.join("config.toml"))
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn set_auth(&mut self, auth_token: Option<String>) {
        self.auth_token = auth_token;
    }

    /// Read a field by name, formatted the way `set_field` accepts it
    ///
    /// Unset fields come back as an empty string.
    pub fn get_field(&self, name: &str) -> Result<String> {
        verify_field(name)?;

        let value = match name {
            "auth_token" => self.auth_token.clone().map(|_| "<set>".to_string()),
            "api_url" => self.api_url.clone(),
            "per_page" => self.per_page.map(|v| v.to_string()),
            "show_num_results" => self.show_num_results.map(|v| v.to_string()),
            "only_include_repos" => self.only_include_repos.as_deref().map(join_list),
            "only_include_orgs" => self.only_include_orgs.as_deref().map(join_list),
            "only_include_reasons" => self.only_include_reasons.as_deref().map(join_list),
            "exclude_repos" => self.exclude_repos.as_deref().map(join_list),
            "exclude_orgs" => self.exclude_orgs.as_deref().map(join_list),
            "exclude_reasons" => self.exclude_reasons.as_deref().map(join_list),
            "show_read_results" => self.show_read_results.map(|v| v.to_string()),
            "only_include_participating" => {
                self.only_include_participating.map(|v| v.to_string())
            }
            "only_include_since" => self.only_include_since.map(|v| v.to_rfc3339()),
            "only_include_before" => self.only_include_before.map(|v| v.to_rfc3339()),
            "include_issues" => self.include_issues.map(|v| v.to_string()),
            "include_prs" => self.include_prs.map(|v| v.to_string()),
            _ => unreachable!("verify_field guards the field list"),
        };

        Ok(value.unwrap_or_default())
    }

    /// Set a field by name from its string form; an empty value clears it
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        verify_field(name)?;

        if let Some((_, command)) = SET_ELSEWHERE.iter().find(|(field, _)| *field == name) {
            return Err(Error::ConfigError(format!(
                "Field: {} is not allowed to be set directly. Please use {} instead.",
                name, command
            )));
        }

        let value = value.trim();
        let clear = value.is_empty();

        match name {
            "api_url" => self.api_url = (!clear).then(|| value.to_string()),
            "per_page" => self.per_page = parse_opt(name, value, parse_number)?,
            "show_num_results" => self.show_num_results = parse_opt(name, value, parse_number)?,
            "only_include_repos" => self.only_include_repos = (!clear).then(|| split_list(value)),
            "only_include_orgs" => self.only_include_orgs = (!clear).then(|| split_list(value)),
            "only_include_reasons" => {
                self.only_include_reasons = (!clear).then(|| split_list(value))
            }
            "exclude_repos" => self.exclude_repos = (!clear).then(|| split_list(value)),
            "exclude_orgs" => self.exclude_orgs = (!clear).then(|| split_list(value)),
            "exclude_reasons" => self.exclude_reasons = (!clear).then(|| split_list(value)),
            "show_read_results" => self.show_read_results = parse_opt(name, value, parse_bool)?,
            "only_include_participating" => {
                self.only_include_participating = parse_opt(name, value, parse_bool)?
            }
            "only_include_since" => {
                self.only_include_since = parse_opt(name, value, parse_timestamp)?
            }
            "only_include_before" => {
                self.only_include_before = parse_opt(name, value, parse_timestamp)?
            }
            "include_issues" => self.include_issues = parse_opt(name, value, parse_bool)?,
            "include_prs" => self.include_prs = parse_opt(name, value, parse_bool)?,
            _ => unreachable!("verify_field guards the field list"),
        }

        Ok(())
    }
}

fn verify_field(name: &str) -> Result<()> {
    if CONFIG_FIELDS.contains(&name) {
        Ok(())
    } else {
        Err(Error::ConfigError(format!(
            "Field: {} is not a valid config field",
            name
        )))
    }
}

fn join_list(values: &[String]) -> String {
    values.join(",")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_opt<T>(
    name: &str,
    value: &str,
    parse: fn(&str) -> std::result::Result<T, String>,
) -> Result<Option<T>> {
    if value.is_empty() {
        return Ok(None);
    }
    parse(value)
        .map(Some)
        .map_err(|e| Error::ConfigError(format!("Invalid value for {}: {}", name, e)))
}

fn parse_number<T: std::str::FromStr>(value: &str) -> std::result::Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("'{}' is not a non-negative integer", value))
}

fn parse_bool(value: &str) -> std::result::Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(format!("'{}' is not a boolean", value)),
    }
}

fn parse_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("'{}' is not an RFC 3339 timestamp ({})", value, e))
}
