//! Configuration types shared across the orchestrator and the store.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Global configuration for the `StockSight` orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SightConfig {
    /// Timeout applied to each individual provider call. Expiry counts as a fetch failure.
    pub provider_timeout: Duration,
    /// How long a live (successful) fetch outcome is memoized. Zero disables memoization.
    pub memo_ttl: Duration,
    /// How long failed or cache-served outcomes are memoized before a retry is allowed.
    pub memo_failure_ttl: Duration,
    /// Maximum number of memoized (symbol, period, interval) outcomes.
    pub memo_capacity: u64,
}

impl Default for SightConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(10),
            memo_ttl: Duration::from_secs(300),
            memo_failure_ttl: Duration::from_secs(60),
            memo_capacity: 256,
        }
    }
}

/// Configuration for the SQLite-backed store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database file. `:memory:` is accepted and pins the pool to a single connection.
    pub path: PathBuf,
    /// Maximum number of pooled connections.
    pub pool_size: u32,
    /// Rolling window of bars replaced on every refresh.
    pub refresh_window: Duration,
    /// Bars older than this are purged during a refresh. `None` keeps everything.
    pub retention: Option<Duration>,
    /// SQLite busy timeout applied to every connection.
    pub busy_timeout: Duration,
}

impl StoreConfig {
    /// Default configuration pointing at `path`.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stocksight.db"),
            pool_size: 4,
            refresh_window: Duration::from_secs(30 * 24 * 60 * 60),
            retention: None,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = SightConfig::default();
        assert_eq!(cfg.provider_timeout, Duration::from_secs(10));
        assert_eq!(cfg.memo_ttl, Duration::from_secs(300));
        assert!(cfg.memo_failure_ttl < cfg.memo_ttl);

        let store = StoreConfig::at("/tmp/x.db");
        assert_eq!(store.path, PathBuf::from("/tmp/x.db"));
        assert_eq!(store.refresh_window.as_secs(), 30 * 86_400);
        assert!(store.retention.is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = StoreConfig {
            retention: Some(Duration::from_secs(86_400 * 800)),
            ..StoreConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: StoreConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
