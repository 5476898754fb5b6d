//! Configuration for queue watchers.

use std::time::Duration;

use portal_core::{DEFAULT_MINUTES_PER_PATIENT, ProgressPolicy};

/// Default period between idle checks.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Default time without a refresh or projection before a watcher stops itself.
/// Three missed 30 second view refreshes.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// How long watchers live without their view, and how they project progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatcherConfig {
    /// Period of the idle-check timer.
    pub check_interval: Duration,
    /// A watcher with no activity for this long stops.
    pub idle_timeout: Duration,
    /// Projection policy applied to cached snapshots.
    pub policy: ProgressPolicy,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            check_interval: DEFAULT_CHECK_INTERVAL,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            policy: ProgressPolicy::default(),
        }
    }
}

impl WatcherConfig {
    /// Build from `PORTAL_WATCH_IDLE_SECS` and `PORTAL_MINUTES_PER_PATIENT`,
    /// falling back to the defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let idle_secs = lookup("PORTAL_WATCH_IDLE_SECS").and_then(|v| v.trim().parse::<u64>().ok());
        let minutes = lookup("PORTAL_MINUTES_PER_PATIENT")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_MINUTES_PER_PATIENT);

        let mut config = Self::default().with_minutes_per_patient(minutes);
        match idle_secs {
            Some(0) => {
                tracing::warn!("PORTAL_WATCH_IDLE_SECS=0 ignored, using default idle timeout");
            }
            Some(secs) => config = config.with_idle_timeout(Duration::from_secs(secs)),
            None => {}
        }
        config
    }

    /// Set the idle-check period.
    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    /// Set how long a watcher may sit unused.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Set the per-patient wait estimate.
    pub fn with_minutes_per_patient(mut self, minutes: u32) -> Self {
        self.policy = ProgressPolicy::with_minutes_per_patient(minutes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_ninety_second_idle_and_fifteen_minutes() {
        let config = WatcherConfig::from_lookup(lookup(&[]));
        assert_eq!(config.check_interval, Duration::from_secs(30));
        assert_eq!(config.idle_timeout, Duration::from_secs(90));
        assert_eq!(config.policy.minutes_per_patient, 15);
    }

    #[test]
    fn reads_overrides() {
        let config = WatcherConfig::from_lookup(lookup(&[
            ("PORTAL_WATCH_IDLE_SECS", "300"),
            ("PORTAL_MINUTES_PER_PATIENT", " 8 "),
        ]));
        assert_eq!(config.idle_timeout, Duration::from_secs(300));
        assert_eq!(config.policy.minutes_per_patient, 8);
    }

    #[test]
    fn ignores_garbage_and_zero_timeout() {
        let config = WatcherConfig::from_lookup(lookup(&[
            ("PORTAL_WATCH_IDLE_SECS", "0"),
            ("PORTAL_MINUTES_PER_PATIENT", "soon"),
        ]));
        assert_eq!(config, WatcherConfig::default());
    }
}
