use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

use j1939_core::FuelType;

use crate::bus::DEFAULT_ENGINE_SPEED_THRESHOLD_RPM;

const CONFIG_DIR: &str = ".j1939-verifier";
const CONFIG_FILE: &str = "config.json";

/// Verifier settings stored in .j1939-verifier/config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifierConfig {
    /// Used until the vehicle reports its own fuel type
    #[serde(default)]
    pub fuel_type: FuelType,
    #[serde(default = "default_threshold")]
    pub engine_speed_threshold_rpm: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_ENGINE_SPEED_THRESHOLD_RPM
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            fuel_type: FuelType::default(),
            engine_speed_threshold_rpm: DEFAULT_ENGINE_SPEED_THRESHOLD_RPM,
        }
    }
}

impl VerifierConfig {
    pub fn with_fuel_type(mut self, fuel_type: FuelType) -> Self {
        self.fuel_type = fuel_type;
        self
    }

    pub fn with_engine_speed_threshold(mut self, rpm: f64) -> Self {
        self.engine_speed_threshold_rpm = rpm;
        self
    }

    /// Read config from a directory, falling back to defaults
    pub async fn read(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_DIR).join(CONFIG_FILE);

        if !config_path.exists() {
            debug!(path = %config_path.display(), "Config file does not exist, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&config_path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    debug!(path = %config_path.display(), "Config loaded successfully");
                    config
                }
                Err(e) => {
                    warn!(path = %config_path.display(), error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %config_path.display(), error = %e, "Failed to read config file, using defaults");
                Self::default()
            }
        }
    }

    /// Write config under a directory
    pub async fn write(&self, dir: &Path) -> std::io::Result<()> {
        let config_dir = dir.join(CONFIG_DIR);
        let config_path = config_dir.join(CONFIG_FILE);

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).await?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(&config_path, content).await?;
        debug!(path = %config_path.display(), "Config saved successfully");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_read_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let config = VerifierConfig::read(temp_dir.path()).await;
        assert_eq!(config, VerifierConfig::default());
        assert_eq!(config.engine_speed_threshold_rpm, 300.0);
        assert_eq!(config.fuel_type, FuelType::Diesel);
    }

    #[tokio::test]
    async fn test_config_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let config = VerifierConfig::default()
            .with_fuel_type(FuelType::Cng)
            .with_engine_speed_threshold(450.0);

        config.write(temp_dir.path()).await.unwrap();

        let loaded = VerifierConfig::read(temp_dir.path()).await;
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_config_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir).await.unwrap();
        fs::write(dir.join(CONFIG_FILE), r#"{"fuel_type":"cng"}"#).await.unwrap();

        let loaded = VerifierConfig::read(temp_dir.path()).await;
        assert_eq!(loaded.fuel_type, FuelType::Cng);
        assert_eq!(loaded.engine_speed_threshold_rpm, 300.0);
    }

    #[tokio::test]
    async fn test_config_invalid_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir).await.unwrap();
        fs::write(dir.join(CONFIG_FILE), "not json").await.unwrap();

        assert_eq!(VerifierConfig::read(temp_dir.path()).await, VerifierConfig::default());
    }
}
