use serde::{Deserialize, Serialize};

use crate::counter::NewCounter;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub counters: CountersConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Waiting line configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// Maximum number of waiting requests
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Minutes budgeted per request ahead when estimating waits
    #[serde(default = "default_minutes_per_request")]
    pub minutes_per_request: u32,
    /// Id handed to the first submitted request
    #[serde(default = "default_first_request_id")]
    pub first_request_id: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            minutes_per_request: default_minutes_per_request(),
            first_request_id: default_first_request_id(),
        }
    }
}

fn default_capacity() -> usize {
    200
}

fn default_minutes_per_request() -> u32 {
    4
}

fn default_first_request_id() -> u64 {
    1001
}

/// Counter pool configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CountersConfig {
    /// Maximum number of counters (0 = unlimited)
    #[serde(default = "default_max_counters")]
    pub max_counters: usize,
    /// Average service time a new counter starts with, in minutes
    #[serde(default = "default_service_minutes")]
    pub default_service_minutes: f64,
    /// Counters opened at startup
    #[serde(default, rename = "preset", skip_serializing_if = "Vec::is_empty")]
    pub presets: Vec<NewCounter>,
}

impl Default for CountersConfig {
    fn default() -> Self {
        Self {
            max_counters: default_max_counters(),
            default_service_minutes: default_service_minutes(),
            presets: Vec::new(),
        }
    }
}

fn default_max_counters() -> usize {
    15
}

fn default_service_minutes() -> f64 {
    3.0
}

/// Retired request history configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryConfig {
    /// Number of terminal requests kept for auditing (0 = disabled)
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: default_history_limit(),
        }
    }
}

fn default_history_limit() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.queue.capacity, 200);
        assert_eq!(config.queue.minutes_per_request, 4);
        assert_eq!(config.queue.first_request_id, 1001);
        assert_eq!(config.counters.max_counters, 15);
        assert_eq!(config.counters.default_service_minutes, 3.0);
        assert!(config.counters.presets.is_empty());
        assert_eq!(config.history.limit, 100);
    }

    #[test]
    fn test_deserialize_queue_section() {
        let toml = r#"
[queue]
capacity = 100
minutes_per_request = 5
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.queue.capacity, 100);
        assert_eq!(config.queue.minutes_per_request, 5);
        assert_eq!(config.queue.first_request_id, 1001); // default
    }

    #[test]
    fn test_deserialize_counter_presets() {
        let toml = r#"
[counters]
max_counters = 10
default_service_minutes = 5.0

[[counters.preset]]
label = "Flight Booking"
operator = "Bob Smith"
specialization = "flight"

[[counters.preset]]
label = "General Service"
operator = "Emma Brown"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.counters.max_counters, 10);
        assert_eq!(config.counters.default_service_minutes, 5.0);
        assert_eq!(config.counters.presets.len(), 2);
        assert_eq!(
            config.counters.presets[0].specialization.as_deref(),
            Some("flight")
        );
        assert!(config.counters.presets[1].specialization.is_none());
    }

    #[test]
    fn test_serialize_roundtrip_keeps_presets() {
        let mut config = Config::default();
        config
            .counters
            .presets
            .push(NewCounter::generalist("General", "Emma"));
        let text = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.counters.presets, config.counters.presets);
    }
}
