//! # Graph Session Gateway
//!
//! The only component that talks to the graph store.
//!
//! - `execute_read` runs one query on a pooled session and materializes every
//!   record before returning.
//! - `execute_write` runs one query inside an explicit transaction, committed
//!   on success and rolled back on any failure. No automatic retry.
//! - `verify_connectivity` never errors; failures and timeouts read `false`.
//! - `close` releases the pool. It is idempotent, and every later call fails
//!   with [`WikiGraphError::Connection`].
//!
//! The store itself sits behind [`GraphBackend`]; [`bolt::BoltBackend`] is the
//! production implementer.

pub mod bolt;

use crate::config::Neo4jSettings;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use wikigraph_core::catalog;
use wikigraph_core::{CypherQuery, Record, WikiGraphError};

/// A graph store reachable by parameterized Cypher.
#[async_trait]
pub trait GraphBackend: Send + Sync {
    /// Run a read query and collect every record.
    async fn run_read(&self, query: &CypherQuery) -> Result<Vec<Record>, WikiGraphError>;

    /// Run a query in a managed transaction and collect every record.
    async fn run_write(&self, query: &CypherQuery) -> Result<Vec<Record>, WikiGraphError>;

    /// Round-trip a trivial query.
    async fn ping(&self) -> Result<(), WikiGraphError> {
        self.run_read(&catalog::connectivity_probe()).await.map(|_| ())
    }

    /// Release pooled connections.
    async fn shutdown(&self) {}
}

// =============================================================================
// GATEWAY
// =============================================================================

/// Shared handle to the graph store, created once at startup.
pub struct GraphGateway {
    backend: RwLock<Option<Arc<dyn GraphBackend>>>,
    probe_timeout: Duration,
}

impl GraphGateway {
    /// Wrap an already-connected backend.
    #[must_use]
    pub fn new(backend: Arc<dyn GraphBackend>, probe_timeout: Duration) -> Self {
        Self {
            backend: RwLock::new(Some(backend)),
            probe_timeout,
        }
    }

    /// Open a Bolt connection pool.
    pub async fn connect(settings: &Neo4jSettings) -> Result<Self, WikiGraphError> {
        let backend = bolt::BoltBackend::connect(settings).await?;
        tracing::info!(
            uri = %settings.uri,
            max_connections = settings.max_connections,
            "Graph store pool created"
        );
        Ok(Self::new(Arc::new(backend), settings.connectivity_timeout()))
    }

    async fn backend(&self) -> Result<Arc<dyn GraphBackend>, WikiGraphError> {
        self.backend
            .read()
            .await
            .clone()
            .ok_or_else(|| WikiGraphError::Connection("graph gateway is closed".to_string()))
    }

    pub async fn execute_read(&self, query: &CypherQuery) -> Result<Vec<Record>, WikiGraphError> {
        let backend = self.backend().await?;
        let records = backend.run_read(query).await.inspect_err(|e| {
            tracing::debug!(error = %e, "Read query failed");
        })?;
        tracing::trace!(rows = records.len(), "Read query completed");
        Ok(records)
    }

    pub async fn execute_write(&self, query: &CypherQuery) -> Result<Vec<Record>, WikiGraphError> {
        let backend = self.backend().await?;
        let records = backend.run_write(query).await.inspect_err(|e| {
            tracing::debug!(error = %e, "Write transaction rolled back");
        })?;
        tracing::trace!(rows = records.len(), "Write transaction committed");
        Ok(records)
    }

    /// Whether the store answers within the probe timeout.
    pub async fn verify_connectivity(&self) -> bool {
        let Ok(backend) = self.backend().await else {
            return false;
        };
        match tokio::time::timeout(self.probe_timeout, backend.ping()).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Graph store connectivity check failed");
                false
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.probe_timeout.as_millis() as u64,
                    "Graph store connectivity check timed out"
                );
                false
            }
        }
    }

    /// Release the pool. Later calls fail with a connection error.
    pub async fn close(&self) {
        let taken = self.backend.write().await.take();
        if let Some(backend) = taken {
            backend.shutdown().await;
            tracing::info!("Graph store pool closed");
        }
    }

    pub async fn is_closed(&self) -> bool {
        self.backend.read().await.is_none()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingBackend {
        reads: AtomicUsize,
        writes: AtomicUsize,
        fail: bool,
        stall: bool,
    }

    #[async_trait]
    impl GraphBackend for CountingBackend {
        async fn run_read(&self, _query: &CypherQuery) -> Result<Vec<Record>, WikiGraphError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.stall {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            if self.fail {
                return Err(WikiGraphError::Query("boom".to_string()));
            }
            Ok(vec![Record::new()])
        }

        async fn run_write(&self, _query: &CypherQuery) -> Result<Vec<Record>, WikiGraphError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    fn gateway(backend: CountingBackend) -> (GraphGateway, Arc<CountingBackend>) {
        let backend = Arc::new(backend);
        let gateway = GraphGateway::new(backend.clone(), Duration::from_millis(50));
        (gateway, backend)
    }

    #[tokio::test]
    async fn reads_and_writes_reach_the_backend() {
        let (gateway, backend) = gateway(CountingBackend::default());
        let q = CypherQuery::new("RETURN 1");
        assert_eq!(gateway.execute_read(&q).await.unwrap().len(), 1);
        gateway.execute_write(&q).await.unwrap();
        assert_eq!(backend.reads.load(Ordering::SeqCst), 1);
        assert_eq!(backend.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn engine_errors_pass_through() {
        let (gateway, _) = gateway(CountingBackend {
            fail: true,
            ..CountingBackend::default()
        });
        let err = gateway
            .execute_read(&CypherQuery::new("RETURN 1"))
            .await
            .unwrap_err();
        assert_eq!(err, WikiGraphError::Query("boom".to_string()));
    }

    #[tokio::test]
    async fn connectivity_swallows_failures() {
        let (gateway, _) = gateway(CountingBackend {
            fail: true,
            ..CountingBackend::default()
        });
        assert!(!gateway.verify_connectivity().await);
    }

    #[tokio::test]
    async fn connectivity_times_out() {
        let (gateway, _) = gateway(CountingBackend {
            stall: true,
            ..CountingBackend::default()
        });
        assert!(!gateway.verify_connectivity().await);
    }

    #[tokio::test]
    async fn close_is_idempotent_and_final() {
        let (gateway, _) = gateway(CountingBackend::default());
        assert!(gateway.verify_connectivity().await);

        gateway.close().await;
        gateway.close().await;
        assert!(gateway.is_closed().await);
        assert!(!gateway.verify_connectivity().await);

        let err = gateway
            .execute_read(&CypherQuery::new("RETURN 1"))
            .await
            .unwrap_err();
        assert!(matches!(err, WikiGraphError::Connection(_)));
    }
}
