use std::future::Future;
use std::sync::Arc;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::engine::engine::DataStoreEngine;
use crate::engine::store::Snapshot;
use crate::utils::{
    error::{DataStoreResult, TransactionError},
    types::{ExecuteResult, Row, Value},
};

/// Lifecycle of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Idle,
    Active,
    Committed,
    RolledBack,
}

/// Handle passed to a transaction body.
///
/// Statements run directly against the live tables; nothing is buffered, so
/// other callers of the same engine see the effects immediately.
#[derive(Debug, Clone)]
pub struct Transaction {
    engine: DataStoreEngine,
    shared: Arc<Mutex<TransactionShared>>,
}

/// Phase and begin snapshot, shared by every clone of one handle
#[derive(Debug)]
struct TransactionShared {
    state: TransactionState,
    snapshot: Option<Snapshot>,
}

impl Transaction {
    pub async fn query(&self, sql: &str, params: &[Value]) -> DataStoreResult<Vec<Row>> {
        self.ensure_active().await?;
        self.engine.query(sql, params).await
    }

    pub async fn query_as<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> DataStoreResult<Vec<T>> {
        self.ensure_active().await?;
        self.engine.query_as(sql, params).await
    }

    pub async fn execute(&self, sql: &str, params: &[Value]) -> DataStoreResult<ExecuteResult> {
        self.ensure_active().await?;
        self.engine.execute(sql, params).await
    }

    pub async fn state(&self) -> TransactionState {
        self.shared.lock().await.state
    }

    /// Mark the transaction committed; applied statements already stand
    pub async fn commit(&self) -> DataStoreResult<()> {
        let mut shared = self.shared.lock().await;
        match shared.state {
            TransactionState::RolledBack => Err(TransactionError::NotActive.into()),
            state => {
                shared.state = advance(state, TransactionState::Committed);
                Ok(())
            }
        }
    }

    /// Restore the begin snapshot now and mark the transaction rolled back.
    ///
    /// Always returns `Err(RollbackRequested)`. The enclosing `transaction`
    /// call fails even if the body discards this error and returns `Ok`.
    pub async fn rollback(&self) -> DataStoreResult<()> {
        let mut shared = self.shared.lock().await;
        if let Some(snapshot) = shared.snapshot.take() {
            self.engine.state.write().await.store.restore(snapshot);
            let from = shared.state;
            shared.state = advance(from, TransactionState::RolledBack);
        }
        Err(TransactionError::RollbackRequested.into())
    }

    async fn ensure_active(&self) -> DataStoreResult<()> {
        match self.shared.lock().await.state {
            TransactionState::RolledBack => Err(TransactionError::NotActive.into()),
            _ => Ok(()),
        }
    }
}

impl DataStoreEngine {
    /// Run `body` with snapshot/restore semantics.
    ///
    /// On `Ok` the applied statements stand. On any `Err`, or after
    /// [`Transaction::rollback`] was called, the tables are back at the
    /// snapshot taken at begin and `TransactionError::RolledBack` is returned.
    pub async fn transaction<F, Fut, T>(&self, body: F) -> DataStoreResult<T>
    where
        F: FnOnce(Transaction) -> Fut,
        Fut: Future<Output = DataStoreResult<T>>,
    {
        self.ensure_connected()?;

        let snapshot = self.state.read().await.store.snapshot();
        let shared = Arc::new(Mutex::new(TransactionShared {
            state: advance(TransactionState::Idle, TransactionState::Active),
            snapshot: Some(snapshot),
        }));

        let outcome = body(Transaction { engine: self.clone(), shared: Arc::clone(&shared) }).await;

        let mut shared = shared.lock().await;
        let reason = match (shared.state, outcome) {
            (TransactionState::RolledBack, _) => "rollback requested".to_string(),
            (state, Ok(value)) => {
                advance(state, TransactionState::Committed);
                return Ok(value);
            }
            (state, Err(err)) => {
                if let Some(snapshot) = shared.snapshot.take() {
                    self.state.write().await.store.restore(snapshot);
                }
                shared.state = advance(state, TransactionState::RolledBack);
                err.to_string()
            }
        };

        warn!(%reason, "transaction rolled back");
        Err(TransactionError::RolledBack { reason }.into())
    }
}

fn advance(from: TransactionState, to: TransactionState) -> TransactionState {
    debug!(?from, ?to, "transaction state");
    to
}
