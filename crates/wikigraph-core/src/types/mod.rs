//! # Core Type Definitions
//!
//! This module contains the domain types the WikiGraph service reads out of
//! the graph store and hands to the API boundary:
//! - Generic graph wrappers (`EntityNode`, `Relationship`)
//! - Article / Community shapes (`ArticleRef`, `CommunityStats`, `ArticleStats`)
//! - Query results (`PathResult`, `RecommendedArticle`, `Analytics`, `Subgraph`)
//! - Closed request vocabularies (`Direction`, `Strategy`)
//! - Error types (`WikiGraphError`)
//!
//! Algorithm parameters and reports live in [`reports`].
//!
//! ## Two identity schemes
//!
//! Articles carry both a numeric `id` (used by the generic and advanced
//! queries) and a string `article_id` / `article_title` pair (used by the
//! algorithm queries). Neither is the engine's internal node id, which only
//! surfaces through `EntityNode::id` and `Relationship` endpoints.

pub mod reports;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use reports::{
    AlgorithmPath, CommunitySize, DetectedCommunity, LouvainOutcome, LouvainParams, LouvainReport,
    PageRankEntry, PageRankOutcome, PageRankParams, PageRankReport, ScoredArticle, SimilarArticle,
    SimilarityParams, SimilarityReport, SourceArticle,
};

/// Property map of a node or relationship, in engine order.
pub type Properties = serde_json::Map<String, serde_json::Value>;

// =============================================================================
// GENERIC GRAPH WRAPPERS
// =============================================================================

/// Any node in the store, addressed by its internal engine id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityNode {
    /// Internal engine id.
    pub id: i64,
    /// Node labels (type tags).
    pub labels: Vec<String>,
    /// Full property map.
    #[serde(default)]
    pub properties: Properties,
}

/// Any relationship in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Internal engine id of the relationship.
    pub id: i64,
    /// Relationship type, e.g. `REFERS_TO`.
    #[serde(rename = "type")]
    pub rel_type: String,
    pub start_node_id: i64,
    pub end_node_id: i64,
    #[serde(default)]
    pub properties: Properties,
}

// =============================================================================
// ARTICLES & COMMUNITIES
// =============================================================================

/// Compact Article projection used by paths and subgraph exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRef {
    pub id: i64,
    #[serde(default)]
    pub target: Option<i64>,
    #[serde(default)]
    pub community_id: Option<i64>,
}

/// Aggregate statistics for one Community.
///
/// The stored metrics (`size` through `level`) are whatever the bulk loader
/// wrote and may be absent; `article_count` and `internal_edges` are computed
/// live from BELONGS_TO / REFERS_TO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityStats {
    pub community_id: i64,
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub density: Option<f64>,
    #[serde(default)]
    pub avg_degree: Option<f64>,
    #[serde(default)]
    pub avg_traffic: Option<f64>,
    #[serde(default)]
    pub median_traffic: Option<f64>,
    #[serde(default)]
    pub level: Option<String>,
    /// Member Articles currently attached via BELONGS_TO.
    pub article_count: i64,
    /// REFERS_TO edges with both endpoints in the community, each counted once.
    pub internal_edges: i64,
}

/// Degree statistics for one Article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleStats {
    pub article_id: i64,
    /// REFERS_TO incidence count.
    pub degree: i64,
    #[serde(default)]
    pub community_id: Option<i64>,
    #[serde(default)]
    pub target: Option<i64>,
}

// =============================================================================
// PATHS
// =============================================================================

/// Result of a bounded shortest-path search.
///
/// A missing path is a normal outcome: `exists = false`, `length = 0` and an
/// empty `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    pub path: Vec<ArticleRef>,
    /// Number of edges in the path.
    pub length: i64,
    pub exists: bool,
}

impl PathResult {
    /// The "no path within the bound" outcome.
    #[must_use]
    pub fn none() -> Self {
        Self {
            path: Vec::new(),
            length: 0,
            exists: false,
        }
    }

    /// A path found by the engine.
    #[must_use]
    pub fn found(path: Vec<ArticleRef>, length: i64) -> Self {
        Self {
            path,
            length,
            exists: true,
        }
    }
}

// =============================================================================
// RECOMMENDATIONS
// =============================================================================

/// A recommended Article with its score and a human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedArticle {
    pub id: i64,
    #[serde(default)]
    pub target: Option<i64>,
    #[serde(default)]
    pub community_id: Option<i64>,
    pub score: f64,
    pub reason: String,
}

/// Recommendation strategy.
///
/// Unknown strategy strings are rejected by [`FromStr`] before any query is
/// built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Other Articles in the source's Community, scored by the Community's
    /// average traffic.
    #[default]
    Community,
    /// Articles two REFERS_TO hops away, scored by shared neighbours.
    References,
    /// Union of the two candidate sets, flat score 1.0.
    Hybrid,
}

impl Strategy {
    /// All accepted strategies, in documentation order.
    pub const ALL: [Strategy; 3] = [Strategy::Community, Strategy::References, Strategy::Hybrid];

    /// Wire name of the strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Community => "community",
            Self::References => "references",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = WikiGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| {
                WikiGraphError::Validation(
                    "Strategy must be 'community', 'references', or 'hybrid'".to_string(),
                )
            })
    }
}

// =============================================================================
// RELATIONSHIP DIRECTION
// =============================================================================

/// Direction filter for relationship lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Incoming,
    Outgoing,
    #[default]
    Both,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Direction::Incoming, Direction::Outgoing, Direction::Both];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = WikiGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.as_str() == s)
            .ok_or_else(|| {
                WikiGraphError::Validation(
                    "Direction must be 'incoming', 'outgoing', or 'both'".to_string(),
                )
            })
    }
}

// =============================================================================
// ANALYTICS
// =============================================================================

/// Whole-graph counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsTotals {
    pub total_articles: i64,
    pub total_communities: i64,
    /// Undirected REFERS_TO edges, each counted once.
    pub total_edges: i64,
    /// `2 × total_edges / total_articles`, or 0 for an empty graph.
    pub avg_degree: f64,
}

impl AnalyticsTotals {
    /// Build totals from raw counts.
    ///
    /// `refers_to_traversals` is the count returned by an undirected
    /// `()-[:REFERS_TO]-()` match, which sees every edge from both ends.
    #[must_use]
    pub fn from_raw(total_articles: i64, total_communities: i64, refers_to_traversals: i64) -> Self {
        let total_edges = refers_to_traversals / 2;
        let avg_degree = if total_articles > 0 {
            (total_edges * 2) as f64 / total_articles as f64
        } else {
            0.0
        };
        Self {
            total_articles,
            total_communities,
            total_edges,
            avg_degree,
        }
    }
}

/// Analytics response: totals plus the top communities and articles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total_articles: i64,
    pub total_communities: i64,
    pub total_edges: i64,
    pub avg_degree: f64,
    pub top_communities: Vec<CommunityStats>,
    pub top_articles: Vec<ArticleStats>,
}

impl Analytics {
    #[must_use]
    pub fn new(
        totals: AnalyticsTotals,
        top_communities: Vec<CommunityStats>,
        top_articles: Vec<ArticleStats>,
    ) -> Self {
        Self {
            total_articles: totals.total_articles,
            total_communities: totals.total_communities,
            total_edges: totals.total_edges,
            avg_degree: totals.avg_degree,
            top_communities,
            top_articles,
        }
    }
}

// =============================================================================
// SUBGRAPH EXPORT
// =============================================================================

/// One REFERS_TO edge of an exported subgraph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubgraphEdge {
    pub source: i64,
    pub target: i64,
    /// Community of the `target` endpoint; differs from the exported
    /// community only for cross-community edges.
    #[serde(default)]
    pub target_community: Option<i64>,
}

/// Member Articles of one Community plus their edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subgraph {
    pub community_id: i64,
    pub nodes: Vec<ArticleRef>,
    pub edges: Vec<SubgraphEdge>,
    pub node_count: usize,
    pub edge_count: usize,
}

impl Subgraph {
    #[must_use]
    pub fn new(community_id: i64, nodes: Vec<ArticleRef>, edges: Vec<SubgraphEdge>) -> Self {
        Self {
            community_id,
            node_count: nodes.len(),
            edge_count: edges.len(),
            nodes,
            edges,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the WikiGraph service.
///
/// - `Validation` is raised before any graph-store call.
/// - `NotFound` is a hollow result, distinct from a failed query.
/// - `AlgorithmUnavailable` never leaves the algorithm orchestrator; it routes
///   the request to the fallback path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WikiGraphError {
    /// Malformed or out-of-range caller input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The graph store rejected or failed to execute a query.
    #[error("Query failed: {0}")]
    Query(String),

    /// A well-formed lookup matched nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The native algorithm engine is missing or one of its calls failed.
    #[error("Native algorithm unavailable: {0}")]
    AlgorithmUnavailable(String),

    /// The connection pool could not be created, reached, or was closed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A record did not have the shape of the expected result.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

impl WikiGraphError {
    /// Whether the caller, not the service, is at fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}

// =============================================================================
// TESTS
// =============================================================================
