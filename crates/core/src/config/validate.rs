use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Queue capacity is not 0
/// - Default service time is a finite, non-negative number
/// - Presets fit within `max_counters` and have labels
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.queue.capacity == 0 {
        return Err(ConfigError::ValidationError(
            "queue.capacity cannot be 0".to_string(),
        ));
    }

    let minutes = config.counters.default_service_minutes;
    if !minutes.is_finite() || minutes < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "counters.default_service_minutes must be a non-negative number, got {}",
            minutes
        )));
    }

    let max = config.counters.max_counters;
    if max != 0 && config.counters.presets.len() > max {
        return Err(ConfigError::ValidationError(format!(
            "{} counter presets exceed counters.max_counters = {}",
            config.counters.presets.len(),
            max
        )));
    }

    if let Some(idx) = config
        .counters
        .presets
        .iter()
        .position(|p| p.label.trim().is_empty())
    {
        return Err(ConfigError::ValidationError(format!(
            "counters.preset[{}] has an empty label",
            idx
        )));
    }

    Ok(())
}
