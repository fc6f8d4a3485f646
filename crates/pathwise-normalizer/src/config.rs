//! Configuration for the Normalizer

use serde::{Deserialize, Serialize};

/// Configuration for the Normalizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Largest record count a caller may request
    pub max_count: usize,

    /// Options retained on a quiz question
    pub max_quiz_options: usize,

    /// Options a question needs to survive normalization
    pub min_options: usize,

    /// Longest prefix (bytes) the incremental bracket scan will try to parse
    pub max_scan_bytes: usize,
}

impl NormalizerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_count == 0 {
            return Err("max_count must be greater than 0".to_string());
        }
        if self.min_options < pathwise_domain::MIN_OPTIONS {
            return Err(format!(
                "min_options must be at least {}",
                pathwise_domain::MIN_OPTIONS
            ));
        }
        if self.max_quiz_options < self.min_options {
            return Err("max_quiz_options cannot be below min_options".to_string());
        }
        if self.max_scan_bytes == 0 {
            return Err("max_scan_bytes must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for NormalizerConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_count: 50,
            max_quiz_options: 4,
            min_options: 2,
            max_scan_bytes: 64 * 1024,
        }
    }
}

impl NormalizerConfig {
    /// Strict preset: smaller requests, shorter scans, four-option questions only
    pub fn strict() -> Self {
        Self {
            max_count: 20,
            max_quiz_options: 4,
            min_options: 4,
            max_scan_bytes: 16 * 1024,
        }
    }

    /// Lenient preset: large papers and long model responses
    pub fn lenient() -> Self {
        Self {
            max_count: 200,
            max_quiz_options: 6,
            min_options: 2,
            max_scan_bytes: 256 * 1024,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(NormalizerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(NormalizerConfig::strict().validate().is_ok());
        assert!(NormalizerConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_invalid_max_count() {
        let mut config = NormalizerConfig::default();
        config.max_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_min_options_cannot_go_below_two() {
        let mut config = NormalizerConfig::default();
        config.min_options = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_quiz_cap_below_minimum() {
        let mut config = NormalizerConfig::default();
        config.min_options = 3;
        config.max_quiz_options = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = NormalizerConfig::from_toml("max_count = 10").unwrap();
        assert_eq!(config.max_count, 10);
        assert_eq!(config.max_quiz_options, 4);
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        assert!(NormalizerConfig::from_toml("max_scan_bytes = 0").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = NormalizerConfig::lenient();
        let toml_str = config.to_toml().unwrap();
        let parsed = NormalizerConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
