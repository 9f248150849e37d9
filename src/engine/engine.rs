use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    engine::{
        migration::MigrationLedger,
        mutation_executor::execute_mutation,
        query_executor::execute_select,
        statement::{Statement, StatementParser},
        store::TableStore,
    },
    utils::{
        config::DataStoreConfig,
        error::{ConnectionError, DataStoreResult},
        types::{ExecuteResult, Row, Value},
    },
};

/// Mutable state owned by one engine instance
#[derive(Debug, Default)]
pub(crate) struct EngineState {
    pub(crate) store: TableStore,
    pub(crate) ledger: MigrationLedger,
}

/// In-memory SQL engine shared by the mock DataStore, its connections and
/// its transactions.
///
/// Clones share the same tables. Each call holds the state lock only for its
/// own duration, so callers interleave at `.await` points and there is no
/// isolation between overlapping transactions.
#[derive(Debug, Clone)]
pub struct DataStoreEngine {
    parser: Arc<StatementParser>,
    pub(crate) state: Arc<RwLock<EngineState>>,
    connected: Arc<AtomicBool>,
    config: Arc<DataStoreConfig>,
}

impl DataStoreEngine {
    /// Create a new, not yet connected engine
    pub fn new(config: DataStoreConfig) -> DataStoreResult<Self> {
        Ok(Self {
            parser: Arc::new(StatementParser::new()?),
            state: Arc::new(RwLock::new(EngineState::default())),
            connected: Arc::new(AtomicBool::new(false)),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &DataStoreConfig {
        &self.config
    }

    pub fn parser(&self) -> &StatementParser {
        &self.parser
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub(crate) fn ensure_connected(&self) -> DataStoreResult<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(ConnectionError::NotConnected.into())
        }
    }

    fn parse_logged(&self, sql: &str, params: &[Value]) -> Statement {
        let statement = self.parser.parse(sql);
        if self.config.log_statements {
            debug!(
                sql = sql.trim(),
                params = params.len(),
                kind = ?self.parser.classify(sql),
                "statement"
            );
        }
        statement
    }

    /// Read path. Write statements passed here still run and yield no rows.
    pub async fn query(&self, sql: &str, params: &[Value]) -> DataStoreResult<Vec<Row>> {
        self.ensure_connected()?;

        match self.parse_logged(sql, params) {
            Statement::Select(select) => {
                let state = self.state.read().await;
                let rows = execute_select(&state.store, &select, params);
                debug!(table = %select.table, rows = rows.len(), "select complete");
                Ok(rows)
            }
            Statement::Unrecognized => Ok(Vec::new()),
            statement => {
                self.apply(&statement, params).await;
                Ok(Vec::new())
            }
        }
    }

    /// Read path with rows deserialized into `T`
    pub async fn query_as<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> DataStoreResult<Vec<T>> {
        let rows = self.query(sql, params).await?;
        rows.iter()
            .map(|row| -> DataStoreResult<T> {
                let json = serde_json::to_value(row)?;
                Ok(serde_json::from_value(json)?)
            })
            .collect()
    }

    /// Write path. SELECT and unrecognized text report zero affected rows.
    pub async fn execute(&self, sql: &str, params: &[Value]) -> DataStoreResult<ExecuteResult> {
        self.ensure_connected()?;

        let statement = self.parse_logged(sql, params);
        Ok(self.apply(&statement, params).await)
    }

    async fn apply(&self, statement: &Statement, params: &[Value]) -> ExecuteResult {
        let mut state = self.state.write().await;
        let result = execute_mutation(&mut state.store, statement, params, self.config.id_strategy);
        debug!(
            rows_affected = result.rows_affected,
            insert_id = ?result.insert_id,
            "mutation complete"
        );
        result
    }

    /// Table names in sorted order
    pub async fn table_names(&self) -> DataStoreResult<Vec<String>> {
        self.ensure_connected()?;
        Ok(self.state.read().await.store.table_names())
    }
}
