//! Custom validation functions for configuration.
//!
//! Shared checks used by the section modules.

use validator::ValidationError;

use crate::lot::LevelConfig;

fn one_of(value: &str, allowed: &[&str], code: &'static str) -> Result<(), ValidationError> {
    if allowed.contains(&value.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new(code))
    }
}

/// Validate the slot-selection strategy name.
pub fn validate_strategy(name: &str) -> Result<(), ValidationError> {
    one_of(name, &["nearest", "best_fit", "balanced"], "invalid_strategy")
}

/// Validate the fee policy name.
pub fn validate_fee_policy(name: &str) -> Result<(), ValidationError> {
    one_of(name, &["hourly", "tiered"], "invalid_fee_policy")
}

/// Validate the clock anomaly handling mode.
pub fn validate_clock_anomaly(mode: &str) -> Result<(), ValidationError> {
    one_of(mode, &["floor", "reject"], "invalid_clock_anomaly")
}

/// Validate a tracing level name.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    one_of(
        level,
        &["trace", "debug", "info", "warn", "error"],
        "invalid_log_level",
    )
}

/// Every level must offer at least one slot and level names must be unique.
pub fn validate_levels(levels: &[LevelConfig]) -> Result<(), ValidationError> {
    if levels.iter().any(|level| level.total_slots() == 0) {
        return Err(ValidationError::new("empty_level"));
    }
    for (i, level) in levels.iter().enumerate() {
        if levels[..i].iter().any(|other| other.name == level.name) {
            return Err(ValidationError::new("duplicate_level_name"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        assert!(validate_strategy("Best_Fit").is_ok());
        assert!(validate_fee_policy("TIERED").is_ok());
        assert!(validate_log_level("Warn").is_ok());
    }

    #[test]
    fn unknown_names_fail() {
        assert_eq!(
            validate_strategy("random").unwrap_err().code,
            "invalid_strategy"
        );
        assert!(validate_clock_anomaly("ignore").is_err());
    }

    #[test]
    fn levels_need_slots_and_unique_names() {
        let level = |name: &str, cars| LevelConfig {
            name: name.into(),
            cars,
            bikes: 0,
            trucks: 0,
        };
        assert!(validate_levels(&[level("a", 1), level("b", 2)]).is_ok());
        assert_eq!(
            validate_levels(&[level("a", 0)]).unwrap_err().code,
            "empty_level"
        );
        assert_eq!(
            validate_levels(&[level("a", 1), level("a", 1)]).unwrap_err().code,
            "duplicate_level_name"
        );
    }
}
