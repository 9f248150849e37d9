use async_trait::async_trait;
use crate::engine::{DataStoreEngine, Migration};
use crate::utils::{
    error::DataStoreResult,
    types::{ExecuteResult, Row, Value},
};

/// Provider-agnostic relational data interface
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Mark the store ready; must precede every other operation
    async fn connect(&self) -> DataStoreResult<()>;

    /// Run a read statement
    async fn query(&self, sql: &str, params: &[Value]) -> DataStoreResult<Vec<Row>>;

    /// Run a write statement
    async fn execute(&self, sql: &str, params: &[Value]) -> DataStoreResult<ExecuteResult>;

    /// Apply unapplied migrations in order
    async fn migrate(&self, migrations: &[Migration]) -> DataStoreResult<()>;

    /// Borrow a connection sharing this store's tables
    fn get_connection(&self) -> DataStoreResult<Connection>;

    /// Close the store; later operations fail until `connect` is called again
    async fn disconnect(&self) -> DataStoreResult<()>;

    fn is_connected(&self) -> bool;

    fn get_capabilities(&self) -> DataStoreCapabilities;
}

/// Capabilities supported by a DataStore backend
#[derive(Debug, Clone, PartialEq)]
pub struct DataStoreCapabilities {
    pub supports_joins: bool,
    pub supports_aggregations: bool,
    pub supports_subqueries: bool,
    pub supports_transactions: bool,
    pub supports_migrations: bool,
    pub max_concurrent_writers: Option<u32>,
}

impl Default for DataStoreCapabilities {
    fn default() -> Self {
        Self {
            supports_joins: false,
            supports_aggregations: false,
            supports_subqueries: false,
            supports_transactions: false,
            supports_migrations: false,
            max_concurrent_writers: Some(1),
        }
    }
}

/// Thin handle over the same query/execute primitives as its store
#[derive(Debug, Clone)]
pub struct Connection {
    engine: DataStoreEngine,
}

impl Connection {
    pub(crate) fn new(engine: DataStoreEngine) -> Self {
        Self { engine }
    }

    pub async fn query(&self, sql: &str, params: &[Value]) -> DataStoreResult<Vec<Row>> {
        self.engine.query(sql, params).await
    }

    pub async fn execute(&self, sql: &str, params: &[Value]) -> DataStoreResult<ExecuteResult> {
        self.engine.execute(sql, params).await
    }

    /// No-op; the tables belong to the store, not the connection
    pub async fn close(self) -> DataStoreResult<()> {
        Ok(())
    }
}
