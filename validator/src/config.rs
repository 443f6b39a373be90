//! Validator configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ValidationError;
use crate::mode::{FailureMode, ValidationMode};

/// Longest fork/merge reference walk before giving up.
pub const DEFAULT_MAX_CYCLE_LENGTH: usize = 64;

/// Configuration for a validator.
///
/// Can be loaded from a TOML file via [`ValidatorConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Preset name: "minimal", "full" or "offline".
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Per-flag overrides on top of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_creation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_purpose: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline: Option<bool>,

    #[serde(default)]
    pub failure_mode: FailureMode,

    /// Maximum hops in a fork/merge reference walk.
    #[serde(default = "default_max_cycle_length")]
    pub max_cycle_length: usize,

    /// How far a timestamp may lie ahead of the local clock.
    #[serde(default)]
    pub max_clock_skew_millis: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory of token JSON files used to resolve references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_dir: Option<PathBuf>,
}

fn default_mode() -> String {
    "full".to_string()
}

fn default_max_cycle_length() -> usize {
    DEFAULT_MAX_CYCLE_LENGTH
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ValidatorConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ValidationError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ValidationError> {
        toml::from_str(s).map_err(|e| ValidationError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ValidationError> {
        toml::to_string_pretty(self).map_err(|e| ValidationError::Config(e.to_string()))
    }

    /// The preset with every explicit override applied.
    pub fn validation_mode(&self) -> Result<ValidationMode, ValidationError> {
        let mut mode: ValidationMode = self.mode.parse()?;
        if let Some(v) = self.public_value {
            mode.public_value = v;
        }
        if let Some(v) = self.validate_creation {
            mode.validate_creation = v;
        }
        if let Some(v) = self.validate_purpose {
            mode.validate_purpose = v;
        }
        if let Some(v) = self.offline {
            mode.offline = v;
        }
        Ok(mode.with_failure_mode(self.failure_mode))
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            public_value: None,
            validate_creation: None,
            validate_purpose: None,
            offline: None,
            failure_mode: FailureMode::default(),
            max_cycle_length: default_max_cycle_length(),
            max_clock_skew_millis: 0,
            log_format: default_log_format(),
            log_level: default_log_level(),
            repository_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = ValidatorConfig::default();
        let parsed = ValidatorConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = ValidatorConfig::from_toml_str("").unwrap();
        assert_eq!(config.max_cycle_length, 64);
        assert_eq!(config.validation_mode().unwrap(), ValidationMode::FULL);
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let toml = r#"
            mode = "minimal"
            validate_creation = true
            failure_mode = "fail-at-end"
            repository_dir = "/var/lib/custody"
        "#;
        let config = ValidatorConfig::from_toml_str(toml).unwrap();
        let mode = config.validation_mode().unwrap();
        assert!(mode.validate_creation);
        assert!(!mode.public_value);
        assert_eq!(mode.failure_mode, FailureMode::FailAtEnd);
        assert_eq!(config.repository_dir, Some(PathBuf::from("/var/lib/custody")));
    }

    #[test]
    fn unknown_preset_is_a_config_error() {
        let config = ValidatorConfig::from_toml_str("mode = \"strict\"").unwrap();
        assert!(matches!(config.validation_mode(), Err(ValidationError::Config(_))));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ValidatorConfig::from_toml_file(dir.path().join("absent.toml"));
        assert!(matches!(err, Err(ValidationError::Config(_))));
    }
}
