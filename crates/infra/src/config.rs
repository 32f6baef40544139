//! Process configuration.
//!
//! Read once from the environment at startup. Unparseable values fall back to
//! their defaults with a warning rather than failing startup.

use serde::{Deserialize, Serialize};

use shelfkeep_inventory::ReservationMode;

pub const ENV_LOG_LEVEL: &str = "SHELFKEEP_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "SHELFKEEP_LOG_JSON";
pub const ENV_RESERVATION_MODE: &str = "SHELFKEEP_RESERVATION_MODE";
pub const ENV_DEFAULT_LOW_STOCK_THRESHOLD: &str = "SHELFKEEP_DEFAULT_LOW_STOCK_THRESHOLD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub log_json: bool,
    pub reservation_mode: ReservationMode,
    /// Threshold applied to stock registered without an explicit minimum.
    pub default_low_stock_threshold: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: true,
            reservation_mode: ReservationMode::BestEffort,
            default_low_stock_threshold: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let log_level = read(ENV_LOG_LEVEL).unwrap_or(defaults.log_level);
        let log_json = parse_or(ENV_LOG_JSON, read(ENV_LOG_JSON), defaults.log_json, parse_bool);
        let reservation_mode = parse_or(
            ENV_RESERVATION_MODE,
            read(ENV_RESERVATION_MODE),
            defaults.reservation_mode,
            |v| v.parse().ok(),
        );
        let default_low_stock_threshold = parse_or(
            ENV_DEFAULT_LOW_STOCK_THRESHOLD,
            read(ENV_DEFAULT_LOW_STOCK_THRESHOLD),
            defaults.default_low_stock_threshold,
            |v| v.parse().ok().map(Some),
        );

        Self {
            log_level,
            log_json,
            reservation_mode,
            default_low_stock_threshold,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or<T: core::fmt::Debug>(
    key: &str,
    raw: Option<String>,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match parse(&raw) {
        Some(value) => value,
        None => {
            tracing::warn!(key, value = %raw, fallback = ?default, "ignoring invalid configuration value");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(from_pairs(&[]), Config::default());
    }

    #[test]
    fn values_are_read() {
        let config = from_pairs(&[
            (ENV_LOG_LEVEL, "debug"),
            (ENV_LOG_JSON, "false"),
            (ENV_RESERVATION_MODE, "all_or_nothing"),
            (ENV_DEFAULT_LOW_STOCK_THRESHOLD, "10"),
        ]);
        assert_eq!(config.log_level, "debug");
        assert!(!config.log_json);
        assert_eq!(config.reservation_mode, ReservationMode::AllOrNothing);
        assert_eq!(config.default_low_stock_threshold, Some(10));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = from_pairs(&[
            (ENV_LOG_JSON, "maybe"),
            (ENV_RESERVATION_MODE, "sometimes"),
            (ENV_DEFAULT_LOW_STOCK_THRESHOLD, "-3"),
        ]);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let config: Config = serde_json::from_str(r#"{"reservation_mode":"all_or_nothing"}"#).unwrap();
        assert_eq!(config.reservation_mode, ReservationMode::AllOrNothing);
        assert_eq!(config.log_level, "info");
    }
}
