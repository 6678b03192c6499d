//! # API Request/Response Types
//!
//! JSON bodies of the HTTP API that are not already core result types.
//! Algorithm requests deserialize straight into the core parameter structs.

use crate::service::{DatabaseState, Health, HealthStatus};
use serde::{Deserialize, Serialize};
use wikigraph_core::primitives::{
    DEFAULT_PATH_DEPTH, DEFAULT_RECOMMENDATION_LIMIT, DEFAULT_SEARCH_LIMIT, DEFAULT_TOP_N,
};
use wikigraph_core::{Params, Record, RecommendedArticle, Strategy};

// =============================================================================
// ROOT / HEALTH
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

impl Default for RootResponse {
    fn default() -> Self {
        Self {
            message: "WikiGraph API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub database: DatabaseState,
    pub version: String,
}

impl From<Health> for HealthResponse {
    fn from(health: Health) -> Self {
        Self {
            status: health.status,
            database: health.database,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub detail: Option<String>,
}

// =============================================================================
// RAW QUERY
// =============================================================================

/// A parameterized Cypher statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub parameters: Params,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub data: Vec<Record>,
    pub count: usize,
}

impl From<Vec<Record>> for QueryResponse {
    fn from(data: Vec<Record>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

// =============================================================================
// LOOKUP
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub search_term: String,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

/// `?direction=incoming|outgoing|both`, parsed by the handler so a bad
/// value gets the standard error body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipsQuery {
    pub direction: Option<String>,
}

// =============================================================================
// ADVANCED QUERIES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathRequest {
    pub source_id: i64,
    pub target_id: i64,
    #[serde(default = "default_path_depth")]
    pub max_depth: u32,
}

fn default_path_depth() -> u32 {
    DEFAULT_PATH_DEPTH
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub article_id: i64,
    #[serde(default = "default_recommendation_limit")]
    pub limit: usize,
    #[serde(default = "default_strategy")]
    pub strategy: String,
}

fn default_recommendation_limit() -> usize {
    DEFAULT_RECOMMENDATION_LIMIT
}

fn default_strategy() -> String {
    Strategy::default().as_str().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub source_id: i64,
    pub recommendations: Vec<RecommendedArticle>,
    pub count: usize,
}

impl RecommendationResponse {
    #[must_use]
    pub fn new(source_id: i64, recommendations: Vec<RecommendedArticle>) -> Self {
        Self {
            source_id,
            count: recommendations.len(),
            recommendations,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for AnalyticsQuery {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgraphRequest {
    pub community_id: i64,
    #[serde(default)]
    pub include_cross_edges: bool,
}
