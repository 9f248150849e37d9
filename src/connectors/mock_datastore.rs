use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::info;
use crate::connectors::datastore_trait::{Connection, DataStore, DataStoreCapabilities};
use crate::engine::{DataStoreEngine, Migration, StatementKind, Transaction};
use crate::utils::{
    config::DataStoreConfig,
    error::DataStoreResult,
    types::{ExecuteResult, Row, Value},
};

/// In-memory DataStore for local development and testing.
///
/// Understands a narrow SQL subset (CREATE TABLE, DROP TABLE, INSERT,
/// UPDATE, DELETE, SELECT with an AND-chain WHERE, single-column ORDER BY
/// and LIMIT) over schema-less rows. Malformed input degrades to empty or
/// zero results instead of failing, which keeps tests short but means a
/// typo in a WHERE clause can silently widen a match.
#[derive(Debug, Clone)]
pub struct MockDataStore {
    engine: DataStoreEngine,
    connection_delay_ms: u64,
}

impl MockDataStore {
    /// Create a mock store with default configuration
    pub fn new() -> DataStoreResult<Self> {
        Self::with_config(DataStoreConfig::default())
    }

    pub fn with_config(config: DataStoreConfig) -> DataStoreResult<Self> {
        let connection_delay_ms = config.connection_delay_ms;
        Ok(Self {
            engine: DataStoreEngine::new(config)?,
            connection_delay_ms,
        })
    }

    pub fn config(&self) -> &DataStoreConfig {
        self.engine.config()
    }

    /// Append rows to a table directly, bypassing SQL; usable before `connect`
    pub async fn add_test_data(&self, table: &str, rows: Vec<Row>) {
        let mut state = self.engine.state.write().await;
        for row in rows {
            state.store.append(table, row);
        }
    }

    /// Run `body` atomically with respect to this store's tables.
    ///
    /// Any error from the body, including [`Transaction::rollback`], restores
    /// the tables and surfaces as `TransactionError::RolledBack`.
    pub async fn transaction<F, Fut, T>(&self, body: F) -> DataStoreResult<T>
    where
        F: FnOnce(Transaction) -> Fut,
        Fut: Future<Output = DataStoreResult<T>>,
    {
        self.engine.transaction(body).await
    }

    /// Query with rows deserialized into `T`
    pub async fn query_as<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> DataStoreResult<Vec<T>> {
        self.engine.query_as(sql, params).await
    }

    /// Statement kind by leading keyword
    pub fn classify(&self, sql: &str) -> StatementKind {
        self.engine.parser().classify(sql)
    }

    pub async fn table_names(&self) -> DataStoreResult<Vec<String>> {
        self.engine.table_names().await
    }

    pub async fn applied_migrations(&self) -> DataStoreResult<Vec<String>> {
        self.engine.applied_migrations().await
    }
}

#[async_trait]
impl DataStore for MockDataStore {
    async fn connect(&self) -> DataStoreResult<()> {
        if self.engine.is_connected() {
            return Ok(());
        }

        // Simulate connection delay
        if self.connection_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.connection_delay_ms)).await;
        }

        self.engine.set_connected(true);
        info!("mock datastore connected");
        Ok(())
    }

    async fn query(&self, sql: &str, params: &[Value]) -> DataStoreResult<Vec<Row>> {
        self.engine.query(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> DataStoreResult<ExecuteResult> {
        self.engine.execute(sql, params).await
    }

    async fn migrate(&self, migrations: &[Migration]) -> DataStoreResult<()> {
        self.engine.migrate(migrations).await
    }

    fn get_connection(&self) -> DataStoreResult<Connection> {
        self.engine.ensure_connected()?;
        Ok(Connection::new(self.engine.clone()))
    }

    async fn disconnect(&self) -> DataStoreResult<()> {
        self.engine.set_connected(false);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.engine.is_connected()
    }

    fn get_capabilities(&self) -> DataStoreCapabilities {
        DataStoreCapabilities {
            supports_transactions: true,
            supports_migrations: true,
            ..DataStoreCapabilities::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{ConnectionError, DataStoreError};

    async fn connected_store() -> MockDataStore {
        let store = MockDataStore::new().unwrap();
        store.connect().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_mock_datastore_creation() {
        let store = MockDataStore::new().unwrap();

        assert!(!store.is_connected());
        assert_eq!(store.config(), &DataStoreConfig::default());
    }

    #[tokio::test]
    async fn test_mock_datastore_connection_lifecycle() {
        let store = MockDataStore::new().unwrap();

        store.connect().await.unwrap();
        assert!(store.is_connected());

        // connect is idempotent
        store.connect().await.unwrap();
        assert!(store.is_connected());

        store.disconnect().await.unwrap();
        assert!(!store.is_connected());
    }

    #[tokio::test]
    async fn test_mock_datastore_connection_delay() {
        let config = DataStoreConfig::default().with_connection_delay(10);
        let store = MockDataStore::with_config(config).unwrap();

        let start = std::time::Instant::now();
        store.connect().await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_mock_datastore_query_without_connection() {
        let store = MockDataStore::new().unwrap();

        match store.query("SELECT * FROM users", &[]).await {
            Err(DataStoreError::Connection(ConnectionError::NotConnected)) => {}
            other => panic!("Expected NotConnected, got {:?}", other),
        }
        assert!(store.get_connection().is_err());
        assert!(store.migrate(&[]).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_datastore_operations_fail_after_disconnect() {
        let store = connected_store().await;
        let connection = store.get_connection().unwrap();

        store.disconnect().await.unwrap();

        assert!(connection.query("SELECT * FROM t", &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_add_test_data_before_connect() {
        let store = MockDataStore::new().unwrap();
        let alice = Row::from_pairs(vec![("id", Value::from(1)), ("name", Value::from("Alice"))]);
        store.add_test_data("users", vec![alice]).await;
        store.connect().await.unwrap();

        let rows = store.query("SELECT name FROM users", &[]).await.unwrap();
        assert_eq!(rows, vec![Row::from_pairs(vec![("name", Value::from("Alice"))])]);
    }

    #[tokio::test]
    async fn test_connection_shares_tables() {
        let store = connected_store().await;
        let connection = store.get_connection().unwrap();

        connection.execute("INSERT INTO t (x) VALUES ($1)", &[Value::from(1)]).await.unwrap();
        connection.close().await.unwrap();

        assert_eq!(store.query("SELECT * FROM t", &[]).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_datastore_capabilities() {
        let capabilities = MockDataStore::new().unwrap().get_capabilities();

        assert!(capabilities.supports_transactions);
        assert!(capabilities.supports_migrations);
        assert!(!capabilities.supports_joins);
        assert_eq!(capabilities.max_concurrent_writers, Some(1));
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let store: Box<dyn DataStore> = Box::new(MockDataStore::new().unwrap());
        store.connect().await.unwrap();

        store.execute("CREATE TABLE t(x)", &[]).await.unwrap();
        assert!(store.query("SELECT * FROM t", &[]).await.unwrap().is_empty());
    }
}
