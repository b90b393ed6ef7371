//! Service configuration from environment.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    /// TTL for cached single-zone lookups.
    pub zone_cache_ttl: Duration,
    /// TTL for cached zone lists.
    pub list_cache_ttl: Duration,
    /// Default TTL for everything else in the cache.
    pub default_cache_ttl: Duration,
    /// Soft cap used by the periodic cache prune.
    pub cache_max_entries: usize,
    /// Total attempts per queued task before it is dropped.
    pub queue_max_attempts: u32,
    /// Yield delay after each processed task so the worker never starves
    /// other work.
    pub queue_drain_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "data/zonewatch.db".to_string(),
            zone_cache_ttl: Duration::from_secs(300),
            list_cache_ttl: Duration::from_secs(120),
            default_cache_ttl: Duration::from_secs(300),
            cache_max_entries: 10_000,
            queue_max_attempts: 3,
            queue_drain_delay: Duration::from_millis(25),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_path: env::var("ZONEWATCH_DB").unwrap_or(defaults.database_path),
            zone_cache_ttl: secs_var("ZONEWATCH_ZONE_CACHE_TTL_SECS", defaults.zone_cache_ttl),
            list_cache_ttl: secs_var("ZONEWATCH_LIST_CACHE_TTL_SECS", defaults.list_cache_ttl),
            default_cache_ttl: secs_var(
                "ZONEWATCH_DEFAULT_CACHE_TTL_SECS",
                defaults.default_cache_ttl,
            ),
            cache_max_entries: env::var("ZONEWATCH_CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.cache_max_entries),
            queue_max_attempts: env::var("ZONEWATCH_QUEUE_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.queue_max_attempts),
            queue_drain_delay: env::var("ZONEWATCH_QUEUE_DRAIN_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.queue_drain_delay),
        }
    }
}

fn secs_var(name: &str, default: Duration) -> Duration {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
