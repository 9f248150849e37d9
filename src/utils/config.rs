use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::utils::error::{DataStoreError, DataStoreResult};

/// Main DataStore configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DataStoreConfig {
    pub id_strategy: IdStrategy,
    pub drift_policy: DriftPolicy,
    pub connection_delay_ms: u64,
    /// Emit a debug event for every statement executed
    pub log_statements: bool,
}

/// How INSERT assigns the synthetic `id` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// `id = row count + 1`; may repeat an id after deletions
    RowCount,
    /// Per-table counter that never goes backwards
    Monotonic,
}

/// What `migrate` does when an applied version is supplied with new `up` text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftPolicy {
    /// Skip silently
    Ignore,
    /// Fail with `MigrationError::Conflict`
    Reject,
}

impl Default for DataStoreConfig {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::RowCount,
            drift_policy: DriftPolicy::Ignore,
            connection_delay_ms: 0,
            log_statements: true,
        }
    }
}

impl DataStoreConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> DataStoreResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| DataStoreError::Configuration(format!("Invalid configuration: {}", e)))
    }

    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> DataStoreResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DataStoreError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    pub fn with_drift_policy(mut self, policy: DriftPolicy) -> Self {
        self.drift_policy = policy;
        self
    }

    pub fn with_connection_delay(mut self, delay_ms: u64) -> Self {
        self.connection_delay_ms = delay_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_datastore_config_default() {
        let config = DataStoreConfig::default();

        assert_eq!(config.id_strategy, IdStrategy::RowCount);
        assert_eq!(config.drift_policy, DriftPolicy::Ignore);
        assert_eq!(config.connection_delay_ms, 0);
        assert!(config.log_statements);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = DataStoreConfig::from_json_str(r#"{"id_strategy": "monotonic"}"#).unwrap();

        assert_eq!(config.id_strategy, IdStrategy::Monotonic);
        assert_eq!(config.drift_policy, DriftPolicy::Ignore);
    }

    #[test]
    fn test_config_rejects_unknown_policy() {
        let result = DataStoreConfig::from_json_str(r#"{"drift_policy": "explode"}"#);

        match result {
            Err(DataStoreError::Configuration(msg)) => {
                assert!(msg.contains("Invalid configuration"))
            }
            _ => panic!("Expected Configuration error"),
        }
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"drift_policy": "reject", "connection_delay_ms": 5}}"#).unwrap();

        let config = DataStoreConfig::from_file(file.path()).unwrap();
        assert_eq!(config.drift_policy, DriftPolicy::Reject);
        assert_eq!(config.connection_delay_ms, 5);
    }

    #[test]
    fn test_config_from_missing_file() {
        let result = DataStoreConfig::from_file("/definitely/not/here.json");
        assert!(matches!(result, Err(DataStoreError::Configuration(_))));
    }

    #[test]
    fn test_config_builders() {
        let config = DataStoreConfig::default()
            .with_id_strategy(IdStrategy::Monotonic)
            .with_drift_policy(DriftPolicy::Reject)
            .with_connection_delay(10);

        assert_eq!(config.id_strategy, IdStrategy::Monotonic);
        assert_eq!(config.drift_policy, DriftPolicy::Reject);
        assert_eq!(config.connection_delay_ms, 10);
    }
}
