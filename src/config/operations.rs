//! Config loading, validation, and utility operations.

use super::model::PidFileConfig;
use crate::error::{PidFileError, Result};
use std::path::Path;

impl PidFileConfig {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(PidFileConfig)` - Successfully loaded and validated config
    /// * `Err(PidFileError::Configuration)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            PidFileError::Configuration(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    ///
    /// An empty document yields the default config.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PidFileConfig = if yaml.trim().is_empty() {
            PidFileConfig::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                PidFileError::Configuration(format!("failed to parse config YAML: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            PidFileError::Configuration(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values independent of the platform.
    ///
    /// Validation rules:
    /// - `name`, if set, must be non-empty and a bare file name
    /// - `mode`, if set, must fit in the permission bits (`0o7777`)
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(PidFileError::Configuration(
                    "pidfile name must be non-empty".to_string(),
                ));
            }
            if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
                return Err(PidFileError::Configuration(format!(
                    "pidfile name '{}' must not contain a path separator; use `directory` instead",
                    name
                )));
            }
        }

        if let Some(mode) = self.mode
            && mode > 0o7777
        {
            return Err(PidFileError::Configuration(format!(
                "mode {:#o} is not a valid permission mask",
                mode
            )));
        }

        Ok(())
    }
}
