//! # API Endpoint Handlers
//!
//! Thin adapters: extract, call one [`GraphService`](crate::service::GraphService)
//! operation, wrap the result.

use super::{
    AppState,
    error::ApiError,
    types::{
        AnalyticsQuery, HealthResponse, PathRequest, QueryRequest, QueryResponse,
        RecommendationRequest, RecommendationResponse, RelationshipsQuery, RootResponse,
        SearchRequest, SubgraphRequest,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use wikigraph_core::{
    Analytics, CommunityStats, Direction, EntityNode, LouvainParams, LouvainReport, PageRankParams,
    PageRankReport, PathResult, Relationship, SimilarityParams, SimilarityReport, Strategy,
    Subgraph, WikiGraphError,
};

type ApiResult<T> = Result<Json<T>, ApiError>;

impl AppState {
    fn reject(&self, error: WikiGraphError) -> ApiError {
        ApiError::new(error, self.debug)
    }
}

// =============================================================================
// ROOT / HEALTH
// =============================================================================

pub async fn root_handler() -> impl IntoResponse {
    Json(RootResponse::default())
}

/// Always 200; a lost database shows up as `degraded`.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse::from(state.service.health().await))
}

// =============================================================================
// RAW QUERY
// =============================================================================

pub async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> ApiResult<QueryResponse> {
    let rows = state
        .service
        .raw_read(&request.query, request.parameters)
        .await
        .map_err(|e| state.reject(e))?;
    Ok(Json(QueryResponse::from(rows)))
}

pub async fn write_query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> ApiResult<QueryResponse> {
    let rows = state
        .service
        .raw_write(&request.query, request.parameters)
        .await
        .map_err(|e| state.reject(e))?;
    Ok(Json(QueryResponse::from(rows)))
}

// =============================================================================
// LOOKUP
// =============================================================================

pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<Vec<EntityNode>> {
    state
        .service
        .search(&request.search_term, request.limit)
        .await
        .map(Json)
        .map_err(|e| state.reject(e))
}

pub async fn entity_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<EntityNode> {
    state
        .service
        .get_entity(id)
        .await
        .map(Json)
        .map_err(|e| state.reject(e))
}

pub async fn relationships_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<RelationshipsQuery>,
) -> ApiResult<Vec<Relationship>> {
    let direction = match query.direction.as_deref() {
        Some(raw) => raw.parse::<Direction>().map_err(|e| state.reject(e))?,
        None => Direction::default(),
    };
    state
        .service
        .get_relationships(id, direction)
        .await
        .map(Json)
        .map_err(|e| state.reject(e))
}

// =============================================================================
// ADVANCED QUERIES
// =============================================================================

pub async fn pathfinding_handler(
    State(state): State<AppState>,
    Json(request): Json<PathRequest>,
) -> ApiResult<PathResult> {
    state
        .service
        .shortest_path(request.source_id, request.target_id, request.max_depth)
        .await
        .map(Json)
        .map_err(|e| state.reject(e))
}

pub async fn recommendations_handler(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> ApiResult<RecommendationResponse> {
    let strategy: Strategy = request.strategy.parse().map_err(|e| state.reject(e))?;
    let recommendations = state
        .service
        .recommend(request.article_id, request.limit, strategy)
        .await
        .map_err(|e| state.reject(e))?;
    Ok(Json(RecommendationResponse::new(
        request.article_id,
        recommendations,
    )))
}

pub async fn analytics_handler(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<Analytics> {
    state
        .service
        .analytics(query.top_n)
        .await
        .map(Json)
        .map_err(|e| state.reject(e))
}

pub async fn subgraph_handler(
    State(state): State<AppState>,
    Json(request): Json<SubgraphRequest>,
) -> ApiResult<Subgraph> {
    state
        .service
        .export_subgraph(request.community_id, request.include_cross_edges)
        .await
        .map(Json)
        .map_err(|e| state.reject(e))
}

pub async fn community_stats_handler(
    State(state): State<AppState>,
    Path(community_id): Path<i64>,
) -> ApiResult<CommunityStats> {
    state
        .service
        .community_stats(community_id)
        .await
        .map(Json)
        .map_err(|e| state.reject(e))
}

// =============================================================================
// GRAPH ALGORITHMS
// =============================================================================

pub async fn pagerank_handler(
    State(state): State<AppState>,
    Json(params): Json<PageRankParams>,
) -> ApiResult<PageRankReport> {
    state
        .service
        .run_pagerank(params)
        .await
        .map(Json)
        .map_err(|e| state.reject(e))
}

pub async fn louvain_handler(
    State(state): State<AppState>,
    Json(params): Json<LouvainParams>,
) -> ApiResult<LouvainReport> {
    state
        .service
        .run_louvain(params)
        .await
        .map(Json)
        .map_err(|e| state.reject(e))
}

pub async fn similarity_handler(
    State(state): State<AppState>,
    Json(params): Json<SimilarityParams>,
) -> ApiResult<SimilarityReport> {
    state
        .service
        .run_similarity(params)
        .await
        .map(Json)
        .map_err(|e| state.reject(e))
}
