//! Scripted graph store for integration tests.
//!
//! Replies are chosen by substring rules over the query text. Every query is
//! recorded. The engine's projection catalog is simulated so projection
//! lifecycles can be asserted without a database.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wikigraph::gateway::{GraphBackend, GraphGateway};
use wikigraph::service::GraphService;
use wikigraph_core::{CypherQuery, Record, WikiGraphError};

enum Reply {
    Rows(Vec<Record>),
    Fail(WikiGraphError),
}

struct Rule {
    needles: Vec<String>,
    reply: Reply,
}

impl Rule {
    fn matches(&self, text: &str) -> bool {
        self.needles.iter().all(|needle| text.contains(needle.as_str()))
    }
}

/// Build a record from a JSON object literal.
pub fn row(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("row must be a JSON object, got {other}"),
    }
}

pub struct ScriptedBackend {
    rules: Mutex<Vec<Rule>>,
    log: Mutex<Vec<CypherQuery>>,
    writes: Mutex<Vec<CypherQuery>>,
    reachable: AtomicBool,
    gds_installed: AtomicBool,
    malformed_projection: AtomicBool,
    catalog: Mutex<BTreeSet<String>>,
    projected: Mutex<Vec<String>>,
    node_count: i64,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            log: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
            reachable: AtomicBool::new(true),
            gds_installed: AtomicBool::new(true),
            malformed_projection: AtomicBool::new(false),
            catalog: Mutex::new(BTreeSet::new()),
            projected: Mutex::new(Vec::new()),
            node_count: 6,
        }
    }
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A store without the graph data science procedures.
    pub fn without_gds() -> Arc<Self> {
        let backend = Self::default();
        backend.gds_installed.store(false, Ordering::SeqCst);
        Arc::new(backend)
    }

    /// Answer queries containing every needle with `rows`.
    pub fn respond(&self, needles: &[&str], rows: Vec<Record>) {
        self.push(needles, Reply::Rows(rows));
    }

    /// Fail queries containing every needle with `error`.
    pub fn fail(&self, needles: &[&str], error: WikiGraphError) {
        self.push(needles, Reply::Fail(error));
    }

    fn push(&self, needles: &[&str], reply: Reply) {
        self.rules.lock().unwrap().push(Rule {
            needles: needles.iter().map(|n| (*n).to_string()).collect(),
            reply,
        });
    }

    /// Put a projection in the simulated catalog, as a crashed process would
    /// have left it.
    pub fn seed_projection(&self, name: &str) {
        self.catalog.lock().unwrap().insert(name.to_string());
    }

    /// Create projections but answer with a summary row of the wrong shape.
    pub fn malformed_projection_rows(&self) {
        self.malformed_projection.store(true, Ordering::SeqCst);
    }

    /// Targets of every drop issued, in order.
    pub fn dropped_names(&self) -> Vec<String> {
        self.queries()
            .iter()
            .filter(|q| q.text.contains("gds.graph.drop"))
            .map(Self::graph_name)
            .collect()
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Every query seen so far, reads and writes, in order.
    pub fn queries(&self) -> Vec<CypherQuery> {
        self.log.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<CypherQuery> {
        self.writes.lock().unwrap().clone()
    }

    pub fn count_matching(&self, needle: &str) -> usize {
        self.queries()
            .iter()
            .filter(|q| q.text.contains(needle))
            .count()
    }

    /// Projections currently held by the simulated catalog.
    pub fn live_projections(&self) -> BTreeSet<String> {
        self.catalog.lock().unwrap().clone()
    }

    /// Every projection name ever created, in order.
    pub fn projected_names(&self) -> Vec<String> {
        self.projected.lock().unwrap().clone()
    }

    fn graph_name(query: &CypherQuery) -> String {
        query
            .get("graph_name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    fn answer(&self, query: &CypherQuery) -> Result<Vec<Record>, WikiGraphError> {
        self.log.lock().unwrap().push(query.clone());

        if !self.reachable.load(Ordering::SeqCst) {
            return Err(WikiGraphError::Connection("connection refused".into()));
        }
        let text = query.text.as_str();
        if text.contains("gds.") && !self.gds_installed.load(Ordering::SeqCst) {
            return Err(WikiGraphError::Query(
                "There is no procedure with the name `gds.graph.project` registered".into(),
            ));
        }

        if let Some(rule) = self.rules.lock().unwrap().iter().find(|r| r.matches(text)) {
            if let Reply::Fail(error) = &rule.reply {
                return Err(error.clone());
            }
        }

        if text.contains("gds.graph.drop") {
            self.catalog.lock().unwrap().remove(&Self::graph_name(query));
            return Ok(Vec::new());
        }
        if text.contains("gds.graph.list") {
            let catalog = self.catalog.lock().unwrap();
            return Ok(catalog
                .iter()
                .map(|name| row(json!({"graphName": name})))
                .collect());
        }
        if text.contains("gds.graph.project") {
            let name = Self::graph_name(query);
            self.catalog.lock().unwrap().insert(name.clone());
            self.projected.lock().unwrap().push(name.clone());
            if self.malformed_projection.load(Ordering::SeqCst) {
                return Ok(vec![row(json!({
                    "graphName": name,
                    "nodeCount": 6.5,
                    "relationshipCount": 8,
                }))]);
            }
            return Ok(vec![row(json!({
                "graphName": name,
                "nodeCount": self.node_count,
                "relationshipCount": 8,
            }))]);
        }

        let rules = self.rules.lock().unwrap();
        Ok(match rules.iter().find(|r| r.matches(text)) {
            Some(Rule {
                reply: Reply::Rows(rows),
                ..
            }) => rows.clone(),
            _ => Vec::new(),
        })
    }
}

#[async_trait]
impl GraphBackend for ScriptedBackend {
    async fn run_read(&self, query: &CypherQuery) -> Result<Vec<Record>, WikiGraphError> {
        tokio::task::yield_now().await;
        self.answer(query)
    }

    async fn run_write(&self, query: &CypherQuery) -> Result<Vec<Record>, WikiGraphError> {
        self.writes.lock().unwrap().push(query.clone());
        self.answer(query)
    }
}

pub fn gateway(backend: &Arc<ScriptedBackend>) -> Arc<GraphGateway> {
    let dyn_backend: Arc<dyn GraphBackend> = backend.clone();
    Arc::new(GraphGateway::new(dyn_backend, Duration::from_millis(500)))
}

pub fn service(backend: &Arc<ScriptedBackend>) -> GraphService {
    GraphService::new(gateway(backend), true)
}
