//! Bolt implementation of [`GraphBackend`] on the `neo4rs` driver.
//!
//! JSON parameters are converted to Bolt values on the way in; rows are
//! deserialized into ordered JSON records on the way out.

use super::GraphBackend;
use crate::config::Neo4jSettings;
use async_trait::async_trait;
use neo4rs::{BoltList, BoltMap, BoltNull, BoltString, BoltType, ConfigBuilder, Graph, Query, Row};
use serde_json::Value;
use wikigraph_core::{CypherQuery, Record, WikiGraphError};

pub struct BoltBackend {
    graph: Graph,
}

impl BoltBackend {
    /// Build the connection pool.
    ///
    /// The pool connects lazily; use [`GraphBackend::ping`] to find out
    /// whether the store is actually reachable.
    pub async fn connect(settings: &Neo4jSettings) -> Result<Self, WikiGraphError> {
        let mut builder = ConfigBuilder::default()
            .uri(settings.uri.as_str())
            .user(settings.user.as_str())
            .password(settings.password.as_str())
            .max_connections(settings.max_connections)
            .fetch_size(settings.fetch_size);
        if let Some(database) = settings.database.as_deref() {
            builder = builder.db(database);
        }
        let config = builder
            .build()
            .map_err(|e| WikiGraphError::Config(format!("invalid Bolt configuration: {e}")))?;

        let graph = Graph::connect(config)
            .await
            .map_err(|e| WikiGraphError::Connection(format!("cannot create Bolt pool: {e}")))?;
        Ok(Self { graph })
    }
}

#[async_trait]
impl GraphBackend for BoltBackend {
    async fn run_read(&self, query: &CypherQuery) -> Result<Vec<Record>, WikiGraphError> {
        let mut stream = self
            .graph
            .execute(to_bolt_query(query))
            .await
            .map_err(query_error)?;

        let mut records = Vec::new();
        while let Some(row) = stream.next().await.map_err(query_error)? {
            records.push(to_record(&row)?);
        }
        Ok(records)
    }

    async fn run_write(&self, query: &CypherQuery) -> Result<Vec<Record>, WikiGraphError> {
        let mut txn = self.graph.start_txn().await.map_err(query_error)?;

        let outcome: Result<Vec<Record>, WikiGraphError> = async {
            let mut stream = txn.execute(to_bolt_query(query)).await.map_err(query_error)?;
            let mut records = Vec::new();
            while let Some(row) = stream.next(txn.handle()).await.map_err(query_error)? {
                records.push(to_record(&row)?);
            }
            Ok(records)
        }
        .await;

        match outcome {
            Ok(records) => {
                txn.commit().await.map_err(query_error)?;
                Ok(records)
            }
            Err(e) => {
                if let Err(rollback) = txn.rollback().await {
                    tracing::warn!(error = %rollback, "Rollback failed");
                }
                Err(e)
            }
        }
    }
}

fn query_error(e: neo4rs::Error) -> WikiGraphError {
    WikiGraphError::Query(e.to_string())
}

fn to_bolt_query(query: &CypherQuery) -> Query {
    query
        .params
        .iter()
        .fold(Query::new(query.text.clone()), |q, (name, value)| {
            q.param(name, to_bolt(value))
        })
}

fn to_record(row: &Row) -> Result<Record, WikiGraphError> {
    row.to::<Record>()
        .map_err(|e| WikiGraphError::Decode(format!("cannot decode row: {e}")))
}

/// Convert a JSON parameter value to its Bolt counterpart.
fn to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::from(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => BoltType::from(i),
            None => BoltType::from(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => BoltType::from(s.as_str()),
        Value::Array(items) => {
            BoltType::List(BoltList::from(items.iter().map(to_bolt).collect::<Vec<_>>()))
        }
        Value::Object(entries) => {
            let mut map = BoltMap::new();
            for (key, item) in entries {
                map.put(BoltString::from(key.as_str()), to_bolt(item));
            }
            BoltType::Map(map)
        }
    }
}
