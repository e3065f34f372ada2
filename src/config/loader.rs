//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::WfhLimits;

use super::types::{EngineConfig, RuntimeConfig, ScoringPolicy, WfhLimitsConfig};

/// Loads and provides access to engine configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and validates them before they reach the scorer.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── scoring.yaml     # Designation priorities, distance and WFH weights
/// ├── wfh_limits.yaml  # Global monthly WFH caps by designation
/// └── runtime.yaml     # Retry, throttle, scheduler, server, logging
/// ```
///
/// # Example
///
/// ```no_run
/// use seat_allocator::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Manager priority: {}", loader.scoring().base_priority("manager"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `scoring.yaml` or `wfh_limits.yaml` is missing
    /// - Any file contains invalid YAML
    /// - Any value violates the scoring or limit invariants
    ///
    /// `runtime.yaml` is optional; defaults apply when it is absent.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let scoring = Self::load_yaml::<ScoringPolicy>(&path.join("scoring.yaml"))?;
        let limits = Self::load_yaml::<WfhLimitsConfig>(&path.join("wfh_limits.yaml"))?;

        let runtime_path = path.join("runtime.yaml");
        let runtime = if runtime_path.exists() {
            Self::load_yaml::<RuntimeConfig>(&runtime_path)?
        } else {
            RuntimeConfig::default()
        };

        let config = EngineConfig::new(scoring, limits.limits, runtime);
        config.scoring().validate()?;
        config.wfh_limits().validate()?;

        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns a mutable engine configuration.
    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    /// Returns the scoring policy.
    pub fn scoring(&self) -> &ScoringPolicy {
        self.config.scoring()
    }

    /// Returns the global WFH limits.
    pub fn wfh_limits(&self) -> &WfhLimits {
        self.config.wfh_limits()
    }

    /// Returns the runtime configuration.
    pub fn runtime(&self) -> &RuntimeConfig {
        self.config.runtime()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "seat_allocator_{}_{}",
            name,
            uuid::Uuid::new_v4()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.scoring().base_priority("manager"), Decimal::new(5, 0));
        assert_eq!(loader.scoring().distance.reference, Decimal::new(20, 0));
        assert_eq!(loader.scoring().wfh.low_usage_threshold, Decimal::new(25, 2));
    }

    #[test]
    fn test_wfh_limits_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        assert_eq!(loader.wfh_limits().get("manager"), Some(4));
        assert_eq!(loader.wfh_limits().get("Senior"), Some(6));
        assert_eq!(loader.wfh_limits().get("junior"), Some(8));
        assert_eq!(loader.wfh_limits().get("intern"), Some(8));
    }

    #[test]
    fn test_runtime_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        assert_eq!(loader.runtime().throttle.batch_size, 5);
        assert_eq!(loader.runtime().throttle.delay_ms, 300);
        assert_eq!(loader.runtime().retry.max_attempts, 3);
        assert_eq!(loader.runtime().server.port, 3000);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("scoring.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_malformed_yaml_returns_parse_error() {
        let dir = scratch_dir("malformed");
        fs::write(dir.join("scoring.yaml"), "designation_priorities: [unclosed").unwrap();

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert!(path.contains("scoring.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_limit_in_file_is_rejected() {
        let dir = scratch_dir("zero_limit");
        fs::write(
            dir.join("scoring.yaml"),
            "designation_priorities:\n  manager: 5\n",
        )
        .unwrap();
        fs::write(dir.join("wfh_limits.yaml"), "limits:\n  manager: 0\n").unwrap();

        assert!(matches!(
            ConfigLoader::load(&dir),
            Err(EngineError::Configuration { .. })
        ));
    }

    #[test]
    fn test_runtime_file_is_optional_and_keys_are_normalized() {
        let dir = scratch_dir("no_runtime");
        fs::write(
            dir.join("scoring.yaml"),
            "designation_priorities:\n  Manager: 5\n",
        )
        .unwrap();
        fs::write(dir.join("wfh_limits.yaml"), "limits:\n  Manager: 4\n").unwrap();

        let loader = ConfigLoader::load(&dir).unwrap();
        assert_eq!(loader.runtime(), &RuntimeConfig::default());
        assert_eq!(loader.scoring().base_priority("manager"), Decimal::new(5, 0));
        assert_eq!(loader.wfh_limits().get("manager"), Some(4));
    }
}
