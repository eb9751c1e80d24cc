//! Runtime configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `DASHBOARD_AUTH_API_URL` | `https://dev.apinetbo.bekindnetwork.com` |
//! | `DASHBOARD_API_URL` | `https://dev.api.bekindnetwork.com` |
//! | `DASHBOARD_TIMEOUT_SECS` | `30` |
//! | `DASHBOARD_TOKEN_FILE` | `.actions-dashboard/session.json` |
//! | `DASHBOARD_PAGE_SIZE` | `10` |

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_AUTH_API_URL: &str = "https://dev.apinetbo.bekindnetwork.com";
pub const DEFAULT_API_URL: &str = "https://dev.api.bekindnetwork.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TOKEN_FILE: &str = ".actions-dashboard/session.json";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Errors raised while reading the configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Where the backend lives and how the dashboard talks to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the host serving login.
    pub auth_api_url: String,
    /// Base URL of the host serving the actions resource.
    pub api_url: String,
    pub request_timeout: Duration,
    /// File holding the persisted session token.
    pub token_path: PathBuf,
    /// Initial page size of the listing.
    pub page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_api_url: DEFAULT_AUTH_API_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token_path: PathBuf::from(DEFAULT_TOKEN_FILE),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Reads the process environment, falling back to the development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a configuration from any variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            auth_api_url: text(&lookup, "DASHBOARD_AUTH_API_URL")?
                .unwrap_or(defaults.auth_api_url),
            api_url: text(&lookup, "DASHBOARD_API_URL")?.unwrap_or(defaults.api_url),
            request_timeout: number(&lookup, "DASHBOARD_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            token_path: text(&lookup, "DASHBOARD_TOKEN_FILE")?
                .map(PathBuf::from)
                .unwrap_or(defaults.token_path),
            page_size: number(&lookup, "DASHBOARD_PAGE_SIZE")?
                .map(u32::try_from)
                .transpose()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "DASHBOARD_PAGE_SIZE",
                    value: lookup("DASHBOARD_PAGE_SIZE").unwrap_or_default(),
                })?
                .unwrap_or(defaults.page_size),
        })
    }
}

/// An unset variable is `None`; a set but blank one is an error.
fn text(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<String>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty { var }),
        Some(value) => Ok(Some(value.trim().to_string())),
    }
}

fn number(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    let Some(value) = text(lookup, var)? else {
        return Ok(None);
    };
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError::InvalidNumber { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_unset_environment_gives_dev_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.api_url, "https://dev.api.bekindnetwork.com");
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            ("DASHBOARD_API_URL", "http://localhost:5000 "),
            ("DASHBOARD_TIMEOUT_SECS", "5"),
            ("DASHBOARD_PAGE_SIZE", "20"),
            ("DASHBOARD_TOKEN_FILE", "/tmp/t.json"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.auth_api_url, DEFAULT_AUTH_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.page_size, 20);
        assert_eq!(config.token_path, PathBuf::from("/tmp/t.json"));
    }

    #[test]
    fn test_bad_numbers_are_rejected() {
        let err = Config::from_lookup(lookup(&[("DASHBOARD_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: "DASHBOARD_TIMEOUT_SECS",
                value: "soon".into()
            }
        );
        assert!(Config::from_lookup(lookup(&[("DASHBOARD_PAGE_SIZE", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DASHBOARD_PAGE_SIZE", "99999999999")])).is_err());
    }

    #[test]
    fn test_blank_url_is_rejected() {
        let err = Config::from_lookup(lookup(&[("DASHBOARD_AUTH_API_URL", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty { var: "DASHBOARD_AUTH_API_URL" });
    }
}
