//! Settings loading with ENV → TOML → default priority
//!
//! A missing config file never terminates the tool: defaults are used and a
//! warning is logged. Credentials deliberately get no up-front validation;
//! an absent token travels to the remote service as-is and surfaces as the
//! service's own authentication failure.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable holding the scrape service bearer token
pub const APIFY_TOKEN_ENV: &str = "APIFY_API_KEY";
/// Environment variable holding the catalog service bearer token
pub const SPOTIFY_TOKEN_ENV: &str = "SPOTIFY_API_TOKEN";

/// Raw TOML settings file schema; every field optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlSettings {
    pub apify_api_token: Option<String>,
    pub spotify_api_token: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub poll_budget_secs: Option<u64>,
    pub recency_window_weeks: Option<i64>,
}

impl TomlSettings {
    /// Parse a settings file. Errors only on unreadable/unparsable content,
    /// not on absence (callers decide what absence means).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid settings file {}: {}", path.display(), e)))
    }
}

/// Fully resolved settings used by the pipeline
#[derive(Debug, Clone)]
pub struct Settings {
    /// Bearer token for the scrape job service (may be empty)
    pub apify_api_token: String,
    /// Bearer token for the catalog lookup service (may be empty)
    pub spotify_api_token: String,
    /// Fixed dataset poll interval, seconds
    pub poll_interval_secs: u64,
    /// Total dataset poll budget, seconds
    pub poll_budget_secs: u64,
    /// Trailing recency window, weeks
    pub recency_window_weeks: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            apify_api_token: String::new(),
            spotify_api_token: String::new(),
            poll_interval_secs: 10,
            poll_budget_secs: 300,
            recency_window_weeks: 6,
        }
    }
}

impl Settings {
    /// Resolve settings with ENV → TOML → default priority.
    ///
    /// `config_path` overrides the platform default location
    /// (`<config dir>/tagscout/config.toml`). A missing file at either
    /// location falls through to defaults with a warning; an unreadable or
    /// malformed file is an error.
    pub fn resolve(config_path: Option<&Path>) -> Result<Self> {
        let toml = match config_path {
            Some(path) => {
                if path.exists() {
                    TomlSettings::load(path)?
                } else {
                    return Err(Error::Config(format!(
                        "settings file not found: {}",
                        path.display()
                    )));
                }
            }
            None => match default_config_path() {
                Some(path) if path.exists() => TomlSettings::load(&path)?,
                Some(path) => {
                    debug!("No settings file at {}, using defaults", path.display());
                    TomlSettings::default()
                }
                None => {
                    warn!("Could not determine config directory, using defaults");
                    TomlSettings::default()
                }
            },
        };

        let defaults = Settings::default();

        Ok(Settings {
            apify_api_token: resolve_token(APIFY_TOKEN_ENV, toml.apify_api_token, "apify"),
            spotify_api_token: resolve_token(SPOTIFY_TOKEN_ENV, toml.spotify_api_token, "spotify"),
            poll_interval_secs: toml.poll_interval_secs.unwrap_or(defaults.poll_interval_secs),
            poll_budget_secs: toml.poll_budget_secs.unwrap_or(defaults.poll_budget_secs),
            recency_window_weeks: toml
                .recency_window_weeks
                .unwrap_or(defaults.recency_window_weeks),
        })
    }
}

/// Resolve one token with ENV → TOML priority, warning when both are set.
fn resolve_token(env_var: &str, toml_value: Option<String>, which: &str) -> String {
    let env_value = std::env::var(env_var).ok().filter(|v| !v.trim().is_empty());
    let toml_value = toml_value.filter(|v| !v.trim().is_empty());

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} token found in both {} and settings file; using environment",
            which, env_var
        );
    }

    env_value.or(toml_value).unwrap_or_default()
}

/// Default platform settings file path (`<config dir>/tagscout/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tagscout").join("config.toml"))
}
