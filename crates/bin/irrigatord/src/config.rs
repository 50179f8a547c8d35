//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `irrigator.toml` in the working directory (or the file named by
//! `IRRIGATOR_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::time::Duration;

use irrigator_adapter_virtual::VirtualConfig;
use irrigator_domain::faucet::FaucetConfig;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Identity of this irrigation computer.
    pub computer: ComputerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Flow counter sampling.
    pub monitor: MonitorConfig,
    /// Simulated relay board and counters.
    #[serde(rename = "virtual")]
    pub virtual_hardware: VirtualConfig,
    /// Faucets known to this computer (local and remote).
    pub faucets: Vec<FaucetConfig>,
}

/// Computer identity.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ComputerConfig {
    /// Name faucets refer to in their `computer` field.
    pub name: String,
    /// Keep local faucets closed.
    pub disabled: bool,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Counter monitor configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between two flow samples.
    pub sample_interval_secs: u64,
}

impl Config {
    /// Load configuration from `irrigator.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("IRRIGATOR_CONFIG").unwrap_or_else(|_| "irrigator.toml".to_string());
        Self::load_from(&path, |key| std::env::var(key).ok())
    }

    fn load_from(path: &str, var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(var);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Parse and validate a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Validation`] for semantic problems.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("IRRIGATOR_COMPUTER_NAME") {
            self.computer.name = val;
        }
        if let Some(val) = var("IRRIGATOR_DISABLED") {
            self.computer.disabled = matches!(val.trim(), "1" | "true" | "yes");
        }
        if let Some(val) = var("IRRIGATOR_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.computer.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "computer name must not be empty".to_string(),
            ));
        }
        if self.monitor.sample_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "sample interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Interval between two counter samples.
    #[must_use]
    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs(self.monitor.sample_interval_secs)
    }
}

impl Default for ComputerConfig {
    fn default() -> Self {
        Self {
            name: "local".to_string(),
            disabled: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "irrigatord=info,irrigator_app=info,irrigator_adapter_virtual=info".to_string(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sample_interval_secs: 60,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("{name}-{}.toml", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.computer.name, "local");
        assert_eq!(config.monitor.sample_interval_secs, 60);
        assert_eq!(config.virtual_hardware.relay_count, 16);
        assert!(config.faucets.is_empty());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.computer.name, "local");
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [computer]
            name = 'pita'
            disabled = true

            [logging]
            filter = 'debug'

            [monitor]
            sample_interval_secs = 5

            [virtual]
            relay_count = 8

            [[virtual.counters]]
            id = 'main'
            flow = 3.5

            [[faucets]]
            name = 'roses drips'
            faucet_type = 'virtual'
            relay = 3
            counter = 'main'

            [[faucets]]
            name = 'lawn'
            computer = 'pata'
            default_duration = 900
        ";
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.computer.name, "pita");
        assert!(config.computer.disabled);
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.sample_interval(), Duration::from_secs(5));
        assert_eq!(config.virtual_hardware.relay_count, 8);
        assert_eq!(config.virtual_hardware.counters[0].id, "main");
        assert_eq!(config.faucets.len(), 2);
        assert_eq!(config.faucets[0].relay.as_str(), "3");
        assert_eq!(config.faucets[1].faucet_type, "generic");
        assert_eq!(config.faucets[1].computer.as_deref(), Some("pata"));
        assert_eq!(config.faucets[1].default_duration, 900);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.computer.name, "local");
    }

    #[test]
    fn should_reject_empty_computer_name() {
        let result = Config::from_toml("[computer]\nname = ''");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_zero_sample_interval() {
        let mut config = Config::default();
        config.monitor.sample_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_faucet_without_name() {
        let result = Config::from_toml("[[faucets]]\nrelay = 1");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result = Config::from_toml("invalid {{{");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn should_apply_overrides_before_validating_file() {
        let path = write_temp("irrigator-override", "[computer]\nname = ''");
        let config = Config::load_from(&path, |key| {
            (key == "IRRIGATOR_COMPUTER_NAME").then(|| "pata".to_string())
        })
        .unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.computer.name, "pata");
    }

    #[test]
    fn should_reject_invalid_file_without_override() {
        let path = write_temp("irrigator-invalid", "[computer]\nname = ''");
        assert!(Config::from_file(&path).is_ok());
        let result = Config::load_from(&path, |_| None);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_prefer_rust_log_over_irrigator_log() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            "IRRIGATOR_LOG" => Some("debug".to_string()),
            "RUST_LOG" => Some("trace".to_string()),
            "IRRIGATOR_DISABLED" => Some("true".to_string()),
            _ => None,
        });
        assert_eq!(config.logging.filter, "trace");
        assert!(config.computer.disabled);
    }
}
