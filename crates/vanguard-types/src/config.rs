use std::{io::Read, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The engine's recognized configuration surface (§6).
///
/// Loading this from a specific file format or merging it with CLI flags is
/// out of scope for this crate (see the crate-level docs); `EngineConfig` is
/// the landing type any such collaborator deserializes into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum expected net profit (base units) for a bundle to be built.
    pub min_profit_threshold: u128,
    pub max_priority_fee: u64,
    /// Maximum slippage, in basis points, `0..=10_000`.
    pub max_slippage_bps: u16,
    pub num_workers: usize,
    /// Enables the research-only sandwich strategy. Requires
    /// `simulation_only = true`; see [`EngineConfig::validate`].
    pub enable_sandwich: bool,
    /// When true, sandwich opportunities are detected and sized but never
    /// built into a dispatched bundle.
    pub simulation_only: bool,
    pub relay_urls: Vec<String>,
    pub queue_capacity: usize,
    pub pool_cache_capacity: usize,
    #[serde(with = "duration_micros")]
    pub refresh_max_age: Duration,
    pub budget_total_us: u64
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_profit_threshold: 0,
            max_priority_fee: u64::MAX,
            max_slippage_bps: 50,
            num_workers: 4,
            enable_sandwich: false,
            simulation_only: true,
            relay_urls: Vec::new(),
            queue_capacity: 10_000,
            pool_cache_capacity: 1_000,
            refresh_max_age: Duration::from_millis(400),
            budget_total_us: 10_000
        }
    }
}

impl EngineConfig {
    /// Parses a config from a reader (JSON), matching the shape other
    /// engine-lifecycle collaborators (a CLI loader, a hot-reload watcher)
    /// would feed this type.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, ConfigError> {
        let mut buf = String::new();
        reader
            .read_to_string(&mut buf)
            .map_err(|e| ConfigError::Malformed(e.to_string()))?;
        let config: Self =
            serde_json::from_str(&buf).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Enforces the config-class invariants from §7. Called once at startup;
    /// never re-checked mid-flight since none of these can change without a
    /// restart.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enable_sandwich && !self.simulation_only {
            return Err(ConfigError::SandwichWithoutSimulationOnly);
        }
        if self.max_slippage_bps > 10_000 {
            return Err(ConfigError::InvalidConfig(format!(
                "max_slippage_bps must be <= 10_000, got {}",
                self.max_slippage_bps
            )));
        }
        if self.num_workers == 0 {
            return Err(ConfigError::InvalidConfig("num_workers must be > 0".into()));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::InvalidConfig("queue_capacity must be > 0".into()));
        }
        if self.pool_cache_capacity == 0 {
            return Err(ConfigError::InvalidConfig("pool_cache_capacity must be > 0".into()));
        }
        if self.budget_total_us == 0 {
            return Err(ConfigError::InvalidConfig("budget_total_us must be > 0".into()));
        }
        if self.relay_urls.len() < 2 {
            return Err(ConfigError::InvalidConfig(
                "at least 2 relay_urls are required to meet the \u{2265}2-relay submit contract"
                    .into()
            ));
        }
        Ok(())
    }
}

mod duration_micros {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        (d.as_micros() as u64).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let micros = u64::deserialize(d)?;
        Ok(Duration::from_micros(micros))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_once_relays_are_set() {
        let mut config = EngineConfig::default();
        assert!(config.validate().is_err(), "no relays configured yet");
        config.relay_urls = vec!["relay-a".into(), "relay-b".into()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sandwich_requires_simulation_only() {
        let mut config = EngineConfig::default();
        config.relay_urls = vec!["a".into(), "b".into()];
        config.enable_sandwich = true;
        config.simulation_only = false;
        assert_eq!(config.validate(), Err(ConfigError::SandwichWithoutSimulationOnly));

        config.simulation_only = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_slippage_over_ten_thousand_bps() {
        let mut config = EngineConfig::default();
        config.relay_urls = vec!["a".into(), "b".into()];
        config.max_slippage_bps = 10_001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let mut config = EngineConfig::default();
        config.relay_urls = vec!["a".into(), "b".into()];
        let json = serde_json::to_string(&config).unwrap();
        let parsed = EngineConfig::from_reader(json.as_bytes()).unwrap();
        assert_eq!(config, parsed);
    }
}
