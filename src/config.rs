//! Process configuration.
//!
//! Read once at startup from the environment (after `.env` files are
//! loaded by the binary). Missing values are left empty and only surface as
//! upstream failures at request time.

use crate::services::RestClientConfig;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_FRONTEND_DIST: &str = "build";

/// Immutable process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Jira server root, e.g. `https://jira.example.com`.
    pub jira_url: String,

    /// Stash REST base, e.g. `https://stash.example.com/rest/api/1.0`.
    pub stash_url: String,

    /// User shared by both upstreams.
    pub username: String,

    /// Password shared by both upstreams.
    pub password: String,

    /// Listen port.
    pub port: u16,

    /// Directory holding the prebuilt frontend bundle.
    pub frontend_dist: PathBuf,
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!(
                    "[config] Ignoring invalid PORT {:?}, using {}",
                    raw,
                    DEFAULT_PORT
                );
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            jira_url: lookup("JIRA_URL").unwrap_or_default(),
            stash_url: lookup("STASH_URL").unwrap_or_default(),
            username: lookup("JIRA_USER").unwrap_or_default(),
            password: lookup("JIRA_PASS").unwrap_or_default(),
            port,
            frontend_dist: lookup("FRONTEND_DIST")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FRONTEND_DIST)),
        }
    }

    pub fn jira_client_config(&self) -> RestClientConfig {
        RestClientConfig {
            base_url: self.jira_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            ..Default::default()
        }
    }

    pub fn stash_client_config(&self) -> RestClientConfig {
        RestClientConfig {
            base_url: self.stash_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.port, 5000);
        assert_eq!(config.jira_url, "");
        assert_eq!(config.username, "");
        assert_eq!(config.frontend_dist, PathBuf::from("build"));
    }

    #[test]
    fn test_reads_all_keys() {
        let config = Config::from_lookup(lookup_from(&[
            ("JIRA_URL", "https://jira.example.com"),
            ("STASH_URL", "https://stash.example.com/rest/api/1.0"),
            ("JIRA_USER", "svc-scraper"),
            ("JIRA_PASS", "hunter2"),
            ("PORT", "8080"),
            ("FRONTEND_DIST", "/srv/frontend"),
        ]));

        assert_eq!(config.port, 8080);
        assert_eq!(config.frontend_dist, PathBuf::from("/srv/frontend"));

        let jira = config.jira_client_config();
        assert_eq!(jira.base_url, "https://jira.example.com");
        assert_eq!(jira.username, "svc-scraper");
        assert_eq!(jira.timeout_secs, 30);

        let stash = config.stash_client_config();
        assert_eq!(stash.base_url, "https://stash.example.com/rest/api/1.0");
        assert_eq!(stash.password, "hunter2");
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = Config::from_lookup(lookup_from(&[("PORT", "http")]));
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
