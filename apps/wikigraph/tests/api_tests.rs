//! Integration tests for the WikiGraph HTTP API.
//!
//! Uses axum-test against a router backed by a scripted graph store.

#![allow(clippy::unwrap_used, clippy::panic)]

mod support;

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;
use support::{ScriptedBackend, row, service};
use wikigraph::api::{
    AppState, ErrorResponse, HealthResponse, QueryResponse, RecommendationResponse, RootResponse,
    create_router,
};
use wikigraph::config::ServerSettings;
use wikigraph::service::{DatabaseState, HealthStatus};
use wikigraph_core::{
    EntityNode, PageRankReport, PathResult, SimilarityReport, Subgraph, WikiGraphError,
};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn server_with(backend: &Arc<ScriptedBackend>, settings: ServerSettings) -> TestServer {
    let state = AppState::new(Arc::new(service(backend)), settings.debug);
    TestServer::new(create_router(state, &settings)).unwrap()
}

fn test_server(backend: &Arc<ScriptedBackend>) -> TestServer {
    server_with(backend, ServerSettings::default())
}

fn bearer(key: &str) -> HeaderValue {
    format!("Bearer {key}").parse::<HeaderValue>().unwrap()
}

// =============================================================================
// ROOT & HEALTH
// =============================================================================

#[tokio::test]
async fn test_root_banner() {
    let backend = ScriptedBackend::new();
    let server = test_server(&backend);

    let response = server.get("/").await;
    response.assert_status_ok();
    let root: RootResponse = response.json();
    assert_eq!(root.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_connected() {
    let backend = ScriptedBackend::new();
    let server = test_server(&backend);

    let response = server.get("/health").await;
    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, HealthStatus::Healthy);
    assert_eq!(health.database, DatabaseState::Connected);
    assert!(!health.version.is_empty());
}

#[tokio::test]
async fn test_health_degraded_is_still_ok() {
    let backend = ScriptedBackend::new();
    backend.set_reachable(false);
    let server = test_server(&backend);

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
}

// =============================================================================
// LOOKUP
// =============================================================================

#[tokio::test]
async fn test_search_returns_entities() {
    let backend = ScriptedBackend::new();
    backend.respond(
        &["toLower($search_term)"],
        vec![row(json!({"id": 3, "labels": ["Article"], "properties": {"title": "Rust"}}))],
    );
    let server = test_server(&backend);

    let response = server
        .post("/api/v1/search")
        .json(&json!({"search_term": "rust"}))
        .await;
    response.assert_status_ok();
    let entities: Vec<EntityNode> = response.json();
    assert_eq!(entities.len(), 1);
    assert_eq!(backend.queries()[0].get("limit"), Some(&json!(10)));
}

#[tokio::test]
async fn test_search_limit_out_of_range() {
    let backend = ScriptedBackend::new();
    let server = test_server(&backend);

    let response = server
        .post("/api/v1/search")
        .json(&json!({"search_term": "rust", "limit": 500}))
        .await;
    response.assert_status_bad_request();
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "ValidationError");
    assert!(backend.queries().is_empty());
}

#[tokio::test]
async fn test_entity_not_found() {
    let backend = ScriptedBackend::new();
    let server = test_server(&backend);

    let response = server.get("/api/v1/entities/77").await;
    response.assert_status_not_found();
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "NotFound");
    assert!(body.message.contains("77"));
}

#[tokio::test]
async fn test_relationships_bad_direction() {
    let backend = ScriptedBackend::new();
    let server = test_server(&backend);

    let response = server
        .get("/api/v1/entities/1/relationships")
        .add_query_param("direction", "sideways")
        .await;
    response.assert_status_bad_request();
    assert!(backend.queries().is_empty());
}

#[tokio::test]
async fn test_relationships_default_both() {
    let backend = ScriptedBackend::new();
    let server = test_server(&backend);

    let response = server.get("/api/v1/entities/1/relationships").await;
    response.assert_status_ok();
    assert!(backend.queries()[0].text.contains("startNode"));
}

// =============================================================================
// RAW QUERY
// =============================================================================

#[tokio::test]
async fn test_query_returns_data_and_count() {
    let backend = ScriptedBackend::new();
    backend.respond(
        &["RETURN n.title AS title"],
        vec![row(json!({"title": "A"})), row(json!({"title": "B"}))],
    );
    let server = test_server(&backend);

    let response = server
        .post("/api/v1/query")
        .json(&json!({"query": "MATCH (n:Article) RETURN n.title AS title", "parameters": {}}))
        .await;
    response.assert_status_ok();
    let result: QueryResponse = response.json();
    assert_eq!(result.count, 2);
    assert_eq!(result.data[1]["title"], "B");
}

#[tokio::test]
async fn test_write_query_uses_transaction() {
    let backend = ScriptedBackend::new();
    let server = test_server(&backend);

    let response = server
        .post("/api/v1/query/write")
        .json(&json!({"query": "CREATE (:Tag {name: $name})", "parameters": {"name": "x"}}))
        .await;
    response.assert_status_ok();
    assert_eq!(backend.writes().len(), 1);
}

#[tokio::test]
async fn test_engine_error_hides_detail_outside_debug() {
    let backend = ScriptedBackend::new();
    backend.fail(
        &["BROKEN"],
        WikiGraphError::Query("Invalid input 'BROKEN'".into()),
    );
    let server = test_server(&backend);

    let response = server
        .post("/api/v1/query")
        .json(&json!({"query": "BROKEN"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "DatabaseError");
    assert!(body.detail.is_none());
}

#[tokio::test]
async fn test_engine_error_detail_in_debug() {
    let backend = ScriptedBackend::new();
    backend.fail(
        &["BROKEN"],
        WikiGraphError::Query("Invalid input 'BROKEN'".into()),
    );
    let server = server_with(
        &backend,
        ServerSettings {
            debug: true,
            ..ServerSettings::default()
        },
    );

    let response = server
        .post("/api/v1/query")
        .json(&json!({"query": "BROKEN"}))
        .await;
    let body: ErrorResponse = response.json();
    assert!(body.detail.unwrap().contains("BROKEN"));
}

#[tokio::test]
async fn test_unreachable_store_is_unavailable() {
    let backend = ScriptedBackend::new();
    backend.set_reachable(false);
    let server = test_server(&backend);

    let response = server.get("/api/v1/entities/1").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// ADVANCED QUERIES
// =============================================================================

#[tokio::test]
async fn test_pathfinding_no_path() {
    let backend = ScriptedBackend::new();
    let server = test_server(&backend);

    let response = server
        .post("/api/v1/advanced/pathfinding")
        .json(&json!({"source_id": 1, "target_id": 2}))
        .await;
    response.assert_status_ok();
    let path: PathResult = response.json();
    assert!(!path.exists);
    assert!(backend.queries()[0].text.contains("*..5]"));
}

#[tokio::test]
async fn test_pathfinding_depth_bound() {
    let backend = ScriptedBackend::new();
    let server = test_server(&backend);

    let response = server
        .post("/api/v1/advanced/pathfinding")
        .json(&json!({"source_id": 1, "target_id": 2, "max_depth": 11}))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_recommendations_envelope() {
    let backend = ScriptedBackend::new();
    backend.respond(
        &["AS reason"],
        vec![
            row(json!({"id": 5, "target": 1, "community_id": 2, "score": 3.0, "reason": "2 common references"})),
            row(json!({"id": 9, "target": 0, "community_id": 2, "score": 1.0, "reason": "1 common references"})),
        ],
    );
    let server = test_server(&backend);

    let response = server
        .post("/api/v1/advanced/recommendations")
        .json(&json!({"article_id": 5, "strategy": "references"}))
        .await;
    response.assert_status_ok();
    let body: RecommendationResponse = response.json();
    assert_eq!(body.source_id, 5);
    assert_eq!(body.count, 1);
    assert_eq!(body.recommendations[0].id, 9);
}

#[tokio::test]
async fn test_recommendations_unknown_strategy() {
    let backend = ScriptedBackend::new();
    let server = test_server(&backend);

    let response = server
        .post("/api/v1/advanced/recommendations")
        .json(&json!({"article_id": 5, "strategy": "trending"}))
        .await;
    response.assert_status_bad_request();
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "ValidationError");
    assert!(backend.queries().is_empty());
}

#[tokio::test]
async fn test_analytics_top_n_bound() {
    let backend = ScriptedBackend::new();
    let server = test_server(&backend);

    let response = server
        .get("/api/v1/advanced/analytics")
        .add_query_param("top_n", 0)
        .await;
    response.assert_status_bad_request();
    assert!(backend.queries().is_empty());
}

#[tokio::test]
async fn test_analytics_defaults() {
    let backend = ScriptedBackend::new();
    backend.respond(
        &["refers_to_traversals"],
        vec![row(json!({"total_articles": 4, "total_communities": 1, "refers_to_traversals": 6}))],
    );
    let server = test_server(&backend);

    let response = server.get("/api/v1/advanced/analytics").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_edges"], 3);
    assert_eq!(body["avg_degree"], 1.5);
}

#[tokio::test]
async fn test_subgraph_export_with_cross_edges() {
    let backend = ScriptedBackend::new();
    backend.respond(
        &["RETURN DISTINCT", "target_community"],
        vec![
            row(json!({"source": 1, "target": 2, "target_community": 4})),
            row(json!({"source": 1, "target": 8, "target_community": 6})),
        ],
    );
    let server = test_server(&backend);

    let response = server
        .post("/api/v1/advanced/subgraph/export")
        .json(&json!({"community_id": 4, "include_cross_edges": true}))
        .await;
    response.assert_status_ok();
    let subgraph: Subgraph = response.json();
    assert_eq!(subgraph.edge_count, 2);
    assert_eq!(subgraph.node_count, 0);
}

#[tokio::test]
async fn test_community_stats_not_found() {
    let backend = ScriptedBackend::new();
    let server = test_server(&backend);

    let response = server.get("/api/v1/advanced/communities/3/stats").await;
    response.assert_status_not_found();
}

// =============================================================================
// GRAPH ALGORITHMS
// =============================================================================

#[tokio::test]
async fn test_pagerank_defaults_from_empty_body() {
    let backend = ScriptedBackend::new();
    backend.respond(
        &["gds.pageRank.stream"],
        vec![row(json!({"article_id": "x", "article_title": "X", "score": 1.0}))],
    );
    let server = test_server(&backend);

    let response = server
        .post("/api/v1/advanced/gds/pagerank")
        .json(&json!({}))
        .await;
    response.assert_status_ok();
    let report: PageRankReport = response.json();
    assert_eq!(report.results[0].rank, 1);

    let stream = backend
        .queries()
        .into_iter()
        .find(|q| q.text.contains("gds.pageRank.stream"))
        .unwrap();
    assert_eq!(stream.get("max_iterations"), Some(&json!(20)));
    assert_eq!(stream.get("damping_factor"), Some(&json!(0.85)));
}

#[tokio::test]
async fn test_pagerank_invalid_damping() {
    let backend = ScriptedBackend::new();
    let server = test_server(&backend);

    let response = server
        .post("/api/v1/advanced/gds/pagerank")
        .json(&json!({"damping_factor": 1.2}))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_louvain_without_engine_uses_stored_partition() {
    let backend = ScriptedBackend::without_gds();
    backend.respond(
        &["count(a) AS size"],
        vec![row(json!({"community_id": 1, "size": 4, "density": 0.7}))],
    );
    let server = test_server(&backend);

    let response = server
        .post("/api/v1/advanced/gds/louvain")
        .json(&json!({"max_levels": 5}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_communities"], 1);
    assert_eq!(body["algorithm"], "Louvain");
}

#[tokio::test]
async fn test_similarity_unknown_source() {
    let backend = ScriptedBackend::new();
    let server = test_server(&backend);

    let response = server
        .post("/api/v1/advanced/gds/similarity")
        .json(&json!({"article_id": "nobody"}))
        .await;
    response.assert_status_ok();
    let report: SimilarityReport = response.json();
    assert_eq!(report.source_article_title, "Unknown");
    assert_eq!(report.count, 0);
}

// =============================================================================
// SECURITY
// =============================================================================

fn secured(backend: &Arc<ScriptedBackend>) -> TestServer {
    server_with(
        backend,
        ServerSettings {
            api_key: Some("s3cret".to_string()),
            ..ServerSettings::default()
        },
    )
}

#[tokio::test]
async fn test_auth_missing_header_rejected() {
    let backend = ScriptedBackend::new();
    let server = secured(&backend);

    let response = server.get("/api/v1/entities/1").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert!(backend.queries().is_empty());
}

#[tokio::test]
async fn test_auth_wrong_key_rejected() {
    let backend = ScriptedBackend::new();
    let server = secured(&backend);

    let response = server
        .get("/api/v1/entities/1")
        .add_header(header::AUTHORIZATION, bearer("nope"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_valid_bearer_accepted() {
    let backend = ScriptedBackend::new();
    backend.respond(
        &["WHERE id(n) = $entity_id"],
        vec![row(json!({"id": 1, "labels": ["Community"], "properties": {}}))],
    );
    let server = secured(&backend);

    let response = server
        .get("/api/v1/entities/1")
        .add_header(header::AUTHORIZATION, bearer("s3cret"))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_auth_public_routes_bypass() {
    let backend = ScriptedBackend::new();
    let server = secured(&backend);

    server.get("/").await.assert_status_ok();
    server.get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn test_rate_limit_exceeded() {
    let backend = ScriptedBackend::new();
    let server = server_with(
        &backend,
        ServerSettings {
            rate_limit: 1,
            ..ServerSettings::default()
        },
    );

    server.get("/").await.assert_status_ok();
    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let backend = ScriptedBackend::new();
    let server = test_server(&backend);

    server.get("/api/v1/nothing").await.assert_status_not_found();
}
