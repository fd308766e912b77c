use core::fmt;
use core::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const FILTER_VAR: &str = "RUST_LOG";
pub const FORMAT_VAR: &str = "CROWDFUND_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: unsupported log format '{value}' (expected 'json' or 'pretty')")]
    InvalidLogFormat { var: &'static str, value: String },

    #[error("{var}: invalid filter '{value}': {reason}")]
    InvalidFilter {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Output format of the fmt subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => f.write_str("json"),
            LogFormat::Pretty => f.write_str("pretty"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(ConfigError::InvalidLogFormat {
                var: FORMAT_VAR,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directives, e.g. `info,crowdfund_auth=debug`.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl ObservabilityConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank variables
    /// fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let filter = present(FILTER_VAR).unwrap_or_else(|| DEFAULT_FILTER.to_string());
        EnvFilter::try_new(&filter).map_err(|e| ConfigError::InvalidFilter {
            var: FILTER_VAR,
            value: filter.clone(),
            reason: e.to_string(),
        })?;
        let format = match present(FORMAT_VAR) {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self { filter, format })
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ObservabilityConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ObservabilityConfig::default());
        assert_eq!(config.filter, "info");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn reads_filter_and_format() {
        let config = ObservabilityConfig::from_lookup(lookup(&[
            ("RUST_LOG", "warn,crowdfund_auth=debug"),
            ("CROWDFUND_LOG_FORMAT", "Pretty"),
        ]))
        .unwrap();
        assert_eq!(config.filter, "warn,crowdfund_auth=debug");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn blank_values_fall_back() {
        let config = ObservabilityConfig::from_lookup(lookup(&[
            ("RUST_LOG", "  "),
            ("CROWDFUND_LOG_FORMAT", ""),
        ]))
        .unwrap();
        assert_eq!(config, ObservabilityConfig::default());
    }

    #[test]
    fn rejects_invalid_filter() {
        let err = ObservabilityConfig::from_lookup(lookup(&[("RUST_LOG", "info,crowdfund_auth=loud")]))
            .unwrap_err();
        assert!(matches!(
            &err,
            ConfigError::InvalidFilter { var: "RUST_LOG", value, .. } if value == "info,crowdfund_auth=loud"
        ));
        assert!(err.to_string().starts_with("RUST_LOG: invalid filter 'info,crowdfund_auth=loud'"));
    }

    #[test]
    fn rejects_unknown_format() {
        let err = ObservabilityConfig::from_lookup(lookup(&[("CROWDFUND_LOG_FORMAT", "xml")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "CROWDFUND_LOG_FORMAT: unsupported log format 'xml' (expected 'json' or 'pretty')"
        );
    }
}
