//! # WikiGraph HTTP API Module
//!
//! REST surface over [`GraphService`], built on axum.
//!
//! ## Endpoints
//!
//! - `GET /` - Service banner
//! - `GET /health` - Liveness plus database connectivity
//! - `POST /api/v1/query` - Raw parameterized read
//! - `POST /api/v1/query/write` - Raw parameterized write (managed transaction)
//! - `POST /api/v1/search` - Substring search over node properties
//! - `GET /api/v1/entities/{id}` - Entity by internal id
//! - `GET /api/v1/entities/{id}/relationships` - Relationships by direction
//! - `POST /api/v1/advanced/pathfinding` - Shortest path between Articles
//! - `POST /api/v1/advanced/recommendations` - Article recommendations
//! - `GET /api/v1/advanced/analytics` - Graph totals and top lists
//! - `POST /api/v1/advanced/subgraph/export` - Community subgraph
//! - `GET /api/v1/advanced/communities/{id}/stats` - Community statistics
//! - `POST /api/v1/advanced/gds/{pagerank,louvain,similarity}` - Graph algorithms
//!
//! ## Security
//!
//! CORS origins, the API key and the rate limit come from
//! [`ServerSettings`]; see [`crate::config`] for the matching variables.

mod auth;
mod error;
mod handlers;
mod middleware;
mod types;

pub use auth::ApiKey;
pub use error::ApiError;
pub use middleware::create_rate_limiter;
#[allow(unused_imports)]
pub use types::{
    AnalyticsQuery, ErrorResponse, HealthResponse, PathRequest, QueryRequest, QueryResponse,
    RecommendationRequest, RecommendationResponse, RootResponse, SearchRequest, SubgraphRequest,
};

use crate::config::ServerSettings;
use crate::service::GraphService;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use wikigraph_core::WikiGraphError;

// =============================================================================
// SERVER STATE
// =============================================================================

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<GraphService>,
    /// Include engine diagnostics in error bodies.
    pub debug: bool,
}

impl AppState {
    #[must_use]
    pub fn new(service: Arc<GraphService>, debug: bool) -> Self {
        Self { service, debug }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// `["*"]` allows every origin, a list allows those origins, and an empty
/// list (or one with no valid entries) allows localhost only.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o.trim() == "*") {
        tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
        return CorsLayer::permissive();
    }
    if origins.is_empty() {
        tracing::info!("CORS: No origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }

    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            let trimmed = origin.trim();
            match trimmed.parse::<HeaderValue>() {
                Ok(hv) => {
                    tracing::info!("CORS: Allowing origin: {}", trimmed);
                    Some(hv)
                }
                Err(e) => {
                    tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect();

    if allowed_origins.is_empty() {
        tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }
    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8000",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8000",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner): tracing, CORS, body limit, rate
/// limiting (if enabled), authentication (if configured).
pub fn create_router(state: AppState, server: &ServerSettings) -> Router {
    let cors = build_cors_layer(&server.cors_origins);

    let rate_limiter = if server.rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", server.rate_limit);
        Some(create_rate_limiter(server.rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let api_key = ApiKey::from_setting(server.api_key.as_deref());
    if api_key.is_some() {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set WIKIGRAPH_API_KEY to enable authentication."
        );
    }

    let api = Router::new()
        .route("/query", post(handlers::query_handler))
        .route("/query/write", post(handlers::write_query_handler))
        .route("/search", post(handlers::search_handler))
        .route("/entities/{id}", get(handlers::entity_handler))
        .route(
            "/entities/{id}/relationships",
            get(handlers::relationships_handler),
        );

    let advanced = Router::new()
        .route("/pathfinding", post(handlers::pathfinding_handler))
        .route("/recommendations", post(handlers::recommendations_handler))
        .route("/analytics", get(handlers::analytics_handler))
        .route("/subgraph/export", post(handlers::subgraph_handler))
        .route(
            "/communities/{id}/stats",
            get(handlers::community_stats_handler),
        )
        .route("/gds/pagerank", post(handlers::pagerank_handler))
        .route("/gds/louvain", post(handlers::louvain_handler))
        .route("/gds/similarity", post(handlers::similarity_handler));

    let mut router = Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .nest("/api/v1", api)
        .nest("/api/v1/advanced", advanced);

    if let Some(key) = api_key {
        router = router.layer(axum_middleware::from_fn_with_state(
            key,
            auth::api_key_auth_middleware,
        ));
    }

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Serve until Ctrl-C, then close the graph gateway.
pub async fn run_server(
    service: Arc<GraphService>,
    server: &ServerSettings,
) -> Result<(), WikiGraphError> {
    service.reclaim_projections().await;

    let state = AppState::new(service.clone(), server.debug);
    let router = create_router(state, server);

    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| WikiGraphError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("WikiGraph HTTP server listening on {}", addr);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| WikiGraphError::Io(format!("Server error: {}", e)));

    service.close().await;
    tracing::info!("Graph gateway closed");
    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
