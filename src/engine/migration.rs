use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use crate::engine::engine::DataStoreEngine;
use crate::utils::config::DriftPolicy;
use crate::utils::error::{DataStoreError, DataStoreResult, MigrationError};

/// A named, versioned schema change
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Migration {
    pub version: String,
    pub up: String,
    /// Recorded but never run by the engine
    #[serde(default)]
    pub down: String,
    #[serde(default)]
    pub description: String,
}

impl Migration {
    pub fn new(version: impl Into<String>, up: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            up: up.into(),
            down: String::new(),
            description: String::new(),
        }
    }

    pub fn with_down(mut self, down: impl Into<String>) -> Self {
        self.down = down.into();
        self
    }

    /// Load a JSON array of migrations
    pub fn load_file(path: impl AsRef<Path>) -> DataStoreResult<Vec<Migration>> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DataStoreError::Configuration(format!(
                "Failed to read migrations {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Version and `up` text of a migration that has run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigration {
    pub version: String,
    pub up: String,
}

/// Append-only record of applied versions, in application order
#[derive(Debug, Clone, Default)]
pub struct MigrationLedger {
    applied: Vec<AppliedMigration>,
}

impl MigrationLedger {
    pub fn get(&self, version: &str) -> Option<&AppliedMigration> {
        self.applied.iter().find(|m| m.version == version)
    }

    pub fn is_applied(&self, version: &str) -> bool {
        self.get(version).is_some()
    }

    pub fn record(&mut self, migration: &Migration) {
        if self.is_applied(&migration.version) {
            return;
        }
        self.applied.push(AppliedMigration {
            version: migration.version.clone(),
            up: migration.up.clone(),
        });
    }

    pub fn versions(&self) -> Vec<String> {
        self.applied.iter().map(|m| m.version.clone()).collect()
    }
}

impl DataStoreEngine {
    /// Apply unapplied migrations in order.
    ///
    /// A version already in the ledger is skipped even when its `up` text has
    /// changed, unless the drift policy is [`DriftPolicy::Reject`].
    pub async fn migrate(&self, migrations: &[Migration]) -> DataStoreResult<()> {
        self.ensure_connected()?;

        for migration in migrations {
            let applied_up = self
                .state
                .read()
                .await
                .ledger
                .get(&migration.version)
                .map(|applied| applied.up.clone());

            if let Some(applied_up) = applied_up {
                if applied_up != migration.up && self.config().drift_policy == DriftPolicy::Reject {
                    let version = migration.version.clone();
                    return Err(MigrationError::Conflict { version }.into());
                }
                debug!(version = %migration.version, "migration already applied, skipping");
                continue;
            }

            self.execute(&migration.up, &[]).await?;
            self.state.write().await.ledger.record(migration);
            info!(
                version = %migration.version,
                description = %migration.description,
                "applied migration"
            );
        }

        Ok(())
    }

    /// Versions applied so far, in application order
    pub async fn applied_migrations(&self) -> DataStoreResult<Vec<String>> {
        self.ensure_connected()?;
        Ok(self.state.read().await.ledger.versions())
    }
}
