//! The deployment configuration file.

use {
    crate::error::ConfigError,
    serde::{Deserialize, Serialize},
    std::{fs, path::Path},
    verdant_compensation::CompensationConfig,
    verdant_price_oracle::OracleConfig,
    verdant_pricing::{calculator, PricingConfig},
};

/// One versioned snapshot of everything tunable at runtime.
///
/// Components are handed the section they need when they are built and
/// never look configuration up on their own.  Quotes record the `version`
/// they were priced under so a checkout can detect a config change in
/// between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdantConfig {
    /// Monotonic revision; every published change bumps it.
    pub version: u64,
    /// How often a long-running process should look for a newer revision.
    pub refresh_interval_secs: u64,
    pub pricing: PricingConfig,
    pub compensation: CompensationConfig,
    pub oracle: OracleConfig,
}

impl Default for VerdantConfig {
    fn default() -> Self {
        Self {
            version: 1,
            refresh_interval_secs: 300,
            pricing: PricingConfig::default(),
            compensation: CompensationConfig::default(),
            oracle: OracleConfig::default(),
        }
    }
}

impl VerdantConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_yaml_str(&raw)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, yaml).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                section: "root",
                reason: "refresh_interval_secs must be > 0".to_string(),
            });
        }
        calculator::validate_config(&self.pricing).map_err(|e| ConfigError::Invalid {
            section: "pricing",
            reason: e.to_string(),
        })?;
        self.compensation
            .validate()
            .map_err(|e| ConfigError::Invalid {
                section: "compensation",
                reason: e.to_string(),
            })?;
        self.oracle.validate().map_err(|e| ConfigError::Invalid {
            section: "oracle",
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
