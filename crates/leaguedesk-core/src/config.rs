//! Service configuration management.
//!
//! Configuration is read from a JSON file and then overridden by
//! environment variables, so a deployment can run from the environment
//! alone. The file is looked up at `$LEAGUEDESK_CONFIG` or
//! `~/.config/leaguedesk/config.json`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for the config directory path
const APP_NAME: &str = "leaguedesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DEFAULT_DATABASE_URL: &str = "sqlite://leaguedesk.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_AUTH_SERVICE_URL: &str = "http://127.0.0.1:3001";

/// Seconds the current season config is served from memory.
const DEFAULT_SEASON_CACHE_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub auth_service_url: String,
    /// Directory for daily rolling log files; stderr only when unset.
    pub log_dir: Option<PathBuf>,
    pub season_cache_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            auth_service_url: DEFAULT_AUTH_SERVICE_URL.to_string(),
            log_dir: None,
            season_cache_secs: DEFAULT_SEASON_CACHE_SECS,
        }
    }
}

impl Config {
    /// Load the config file (if any), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?
            }
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(addr) = lookup("LEAGUEDESK_BIND") {
            self.bind_addr = addr;
        }
        if let Some(url) = lookup("AUTH_SERVICE_URL") {
            self.auth_service_url = url.trim_end_matches('/').to_string();
        }
        if let Some(dir) = lookup("LEAGUEDESK_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(secs) = lookup("LEAGUEDESK_SEASON_CACHE_SECS").and_then(|s| s.parse().ok()) {
            self.season_cache_secs = secs;
        }
    }

    pub fn season_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.season_cache_secs)
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("LEAGUEDESK_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database_url, "sqlite://leaguedesk.db");
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert!(config.log_dir.is_none());
        assert_eq!(config.season_cache_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_URL", "sqlite::memory:"),
            ("AUTH_SERVICE_URL", "https://auth.example.org/"),
            ("LEAGUEDESK_LOG_DIR", "/var/log/leaguedesk"),
            ("LEAGUEDESK_SEASON_CACHE_SECS", "5"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.auth_service_url, "https://auth.example.org");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/leaguedesk")));
        assert_eq!(config.season_cache_secs, 5);
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"bind_addr": "0.0.0.0:8080"}"#).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.database_url, "sqlite://leaguedesk.db");
    }
}
