use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use crate::domain::registration::ProblemCatalog;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_WEBHOOK_URL: &str = "http://127.0.0.1:8081/exec";
pub const DEFAULT_EVENT_PREFIX: &str = "nutpam-2025";
pub const DEFAULT_RELAY_TIMEOUT_SECS: u64 = 30;

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddress { var: &'static str, value: String },

    #[error("{var} must be a positive number of seconds: {value}")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} must name at least one problem track")]
    EmptyCatalog { var: &'static str },
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Spreadsheet webhook receiving each registration
    pub webhook_url: String,
    /// First segment of every minted team ID
    pub event_prefix: String,
    pub relay_timeout: Duration,
    pub problem_tracks: ProblemCatalog,
}

impl AppConfig {
    /// Reads configuration from the process environment
    ///
    /// Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddress {
                var: "BIND_ADDR",
                value: bind_raw.clone(),
            })?;

        let webhook_url = lookup("SHEETS_WEBHOOK_URL").unwrap_or_else(|| {
            tracing::warn!("SHEETS_WEBHOOK_URL not set, using default");
            DEFAULT_WEBHOOK_URL.to_string()
        });

        let event_prefix = lookup("EVENT_PREFIX")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EVENT_PREFIX.to_string());

        let relay_timeout = match lookup("RELAY_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        var: "RELAY_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_RELAY_TIMEOUT_SECS),
        };

        let problem_tracks = match lookup("PROBLEM_TRACKS") {
            Some(csv) => {
                let catalog = ProblemCatalog::from_csv(&csv);
                if catalog.is_empty() {
                    return Err(ConfigError::EmptyCatalog {
                        var: "PROBLEM_TRACKS",
                    });
                }
                catalog
            }
            None => ProblemCatalog::default(),
        };

        Ok(Self {
            bind_addr,
            webhook_url,
            event_prefix,
            relay_timeout,
            problem_tracks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.webhook_url, DEFAULT_WEBHOOK_URL);
        assert_eq!(config.event_prefix, DEFAULT_EVENT_PREFIX);
        assert_eq!(config.relay_timeout, Duration::from_secs(30));
        assert_eq!(config.problem_tracks, ProblemCatalog::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("SHEETS_WEBHOOK_URL", "https://hooks.example.com/exec"),
            ("EVENT_PREFIX", "hack-2026"),
            ("RELAY_TIMEOUT_SECS", "5"),
            ("PROBLEM_TRACKS", "AI, Health"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.webhook_url, "https://hooks.example.com/exec");
        assert_eq!(config.event_prefix, "hack-2026");
        assert_eq!(config.relay_timeout, Duration::from_secs(5));
        assert!(config.problem_tracks.contains("Health"));
    }

    #[test]
    fn rejects_bad_address() {
        assert!(matches!(
            config_from(&[("BIND_ADDR", "localhost")]),
            Err(ConfigError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(matches!(
            config_from(&[("RELAY_TIMEOUT_SECS", "0")]),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            config_from(&[("RELAY_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidTimeout { .. })
        ));
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(matches!(
            config_from(&[("PROBLEM_TRACKS", " , ")]),
            Err(ConfigError::EmptyCatalog { .. })
        ));
    }

    #[test]
    fn blank_prefix_falls_back() {
        let config = config_from(&[("EVENT_PREFIX", "  ")]).unwrap();
        assert_eq!(config.event_prefix, DEFAULT_EVENT_PREFIX);
    }
}
