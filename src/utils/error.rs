use thiserror::Error;

/// Main error type for the DataStore engine
#[derive(Debug, Error)]
pub enum DataStoreError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Connection lifecycle errors
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("DataStore is not connected; call connect() first")]
    NotConnected,
}

/// Transaction errors
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Raised by `Transaction::rollback` so the body unwinds to the manager
    #[error("Rollback requested")]
    RollbackRequested,

    /// Statement issued through a handle that was already rolled back
    #[error("Transaction is no longer active")]
    NotActive,

    /// Surfaced to the caller after the snapshot has been restored
    #[error("Transaction rolled back: {reason}")]
    RolledBack { reason: String },
}

/// Migration errors
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Migration '{version}' was already applied with different content")]
    Conflict { version: String },
}

impl From<serde_json::Error> for DataStoreError {
    fn from(err: serde_json::Error) -> Self {
        DataStoreError::Serialization(err.to_string())
    }
}

impl DataStoreError {
    /// True when the error escaped a transaction whose snapshot was restored
    pub fn is_rolled_back(&self) -> bool {
        matches!(self, DataStoreError::Transaction(TransactionError::RolledBack { .. }))
    }
}

/// Result type alias for DataStore operations
pub type DataStoreResult<T> = Result<T, DataStoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datastore_error_from_connection_error() {
        let err: DataStoreError = ConnectionError::NotConnected.into();

        match err {
            DataStoreError::Connection(ConnectionError::NotConnected) => {}
            _ => panic!("Expected Connection error"),
        }
    }

    #[test]
    fn test_datastore_error_from_transaction_error() {
        let err: DataStoreError =
            TransactionError::RolledBack { reason: "boom".to_string() }.into();

        assert!(err.is_rolled_back());
        assert!(err.to_string().contains("Transaction rolled back: boom"));
    }

    #[test]
    fn test_rollback_requested_is_not_rolled_back() {
        let err: DataStoreError = TransactionError::RollbackRequested.into();
        assert!(!err.is_rolled_back());
    }

    #[test]
    fn test_migration_conflict_display() {
        let err: DataStoreError = MigrationError::Conflict { version: "001".to_string() }.into();
        assert_eq!(
            err.to_string(),
            "Migration error: Migration '001' was already applied with different content"
        );
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DataStoreError = parse_err.into();

        match err {
            DataStoreError::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_datastore_result_type() {
        let success: DataStoreResult<String> = Ok("success".to_string());
        let failure: DataStoreResult<String> =
            Err(DataStoreError::Internal("test error".to_string()));

        assert!(success.is_ok());
        match failure {
            Err(DataStoreError::Internal(msg)) => assert_eq!(msg, "test error"),
            _ => panic!("Expected Internal error"),
        }
    }
}
