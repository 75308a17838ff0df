//! Dashboard and server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::rank::RankConfig;
use crate::vvo::{DEFAULT_BASE_URL, VvoConfig};

/// Default listen address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Bounds and expiry of the persisted lists.
#[derive(Debug, Clone)]
pub struct ListLimits {
    pub search_history: usize,
    pub favorites: usize,
    pub route_history: usize,
    /// Lifetime of each stored list, refreshed on every write.
    pub ttl: Duration,
}

impl Default for ListLimits {
    fn default() -> Self {
        Self {
            search_history: 10,
            favorites: 5,
            route_history: 8,
            ttl: Duration::from_secs(30 * 24 * 60 * 60),
        }
    }
}

/// Behaviour of the dashboard service.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub rank: RankConfig,
    pub lists: ListLimits,
    /// Quiet period after the last keystroke before a stop search fires.
    pub search_debounce: Duration,
    /// Departures shown when a stop is opened.
    pub default_departure_count: u32,
    /// Departures added by "load more".
    pub load_more_step: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            rank: RankConfig::default(),
            lists: ListLimits::default(),
            search_debounce: Duration::from_millis(300),
            default_departure_count: 10,
            load_more_step: 10,
        }
    }
}

/// Errors in environment configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Process-level configuration of the server binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub vvo: VvoConfig,
    /// JSON file backing the persisted lists; in-memory when `None`.
    pub store_path: Option<PathBuf>,
    /// Serve canned demo data instead of calling VVO.
    pub mock: bool,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// - `DASHBOARD_ADDR`: listen address (default `127.0.0.1:3000`)
    /// - `VVO_BASE_URL`: API base URL
    /// - `VVO_TIMEOUT_SECS`: request timeout
    /// - `DASHBOARD_STORE`: path of the list store file
    /// - `DASHBOARD_MOCK`: `1`/`true` to use demo data
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from a variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let addr_raw = get("DASHBOARD_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "DASHBOARD_ADDR",
                value: addr_raw.clone(),
                reason: e.to_string(),
            })?;

        let mut vvo = VvoConfig::new()
            .with_base_url(get("VVO_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()));
        if let Some(raw) = get("VVO_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                var: "VVO_TIMEOUT_SECS",
                value: raw.clone(),
                reason: e.to_string(),
            })?;
            vvo = vvo.with_timeout(secs);
        }

        let mock = match get("DASHBOARD_MOCK").as_deref().map(str::to_ascii_lowercase) {
            None => false,
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
            Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
            Some(v) => {
                return Err(ConfigError::Invalid {
                    var: "DASHBOARD_MOCK",
                    value: v,
                    reason: "expected a boolean".to_string(),
                });
            }
        };

        Ok(Self {
            addr,
            vvo,
            store_path: get("DASHBOARD_STORE").map(PathBuf::from),
            mock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert_eq!(config.default_departure_count, 10);
        assert_eq!(config.lists.favorites, 5);
        assert_eq!(config.lists.search_history, 10);
        assert_eq!(config.lists.route_history, 8);
        assert_eq!(config.lists.ttl, Duration::from_secs(2_592_000));
    }

    #[test]
    fn server_defaults_from_empty_env() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(config.vvo.base_url, DEFAULT_BASE_URL);
        assert!(config.store_path.is_none());
        assert!(!config.mock);
    }

    #[test]
    fn server_reads_env() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("DASHBOARD_ADDR", "0.0.0.0:8080"),
            ("VVO_BASE_URL", "http://localhost:9000"),
            ("VVO_TIMEOUT_SECS", "5"),
            ("DASHBOARD_STORE", "/tmp/lists.json"),
            ("DASHBOARD_MOCK", "TRUE"),
        ]))
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.vvo.base_url, "http://localhost:9000");
        assert_eq!(config.vvo.timeout_secs, 5);
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/lists.json")));
        assert!(config.mock);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("DASHBOARD_ADDR", "nowhere")])).unwrap_err();
        assert!(err.to_string().contains("DASHBOARD_ADDR"));

        assert!(ServerConfig::from_lookup(lookup(&[("VVO_TIMEOUT_SECS", "soon")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("DASHBOARD_MOCK", "maybe")])).is_err());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = ServerConfig::from_lookup(lookup(&[("DASHBOARD_STORE", "  ")])).unwrap();
        assert!(config.store_path.is_none());
    }
}
