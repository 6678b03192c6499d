//! # Primitives
//!
//! Compile-time bounds and fixed vocabulary of the WikiGraph service.
//!
//! Every request parameter that reaches the graph store is checked against
//! one of these constants first, so each query the catalog builds is
//! computationally bounded.

// =============================================================================
// GRAPH VOCABULARY
// =============================================================================

/// Label of encyclopedia article nodes.
pub const ARTICLE_LABEL: &str = "Article";

/// Label of community nodes.
pub const COMMUNITY_LABEL: &str = "Community";

/// Article → Article reference edge. Traversed in both directions for
/// neighbourhoods.
pub const REFERS_TO: &str = "REFERS_TO";

/// Article → Community membership edge.
pub const BELONGS_TO: &str = "BELONGS_TO";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Smallest accepted result limit.
pub const MIN_LIMIT: usize = 1;

/// Maximum result count for free-text search.
pub const MAX_SEARCH_LIMIT: usize = 100;

/// Maximum length of a search term, in characters.
pub const MAX_SEARCH_TERM_LENGTH: usize = 256;

/// Maximum result count for recommendations.
pub const MAX_RECOMMENDATION_LIMIT: usize = 50;

/// Maximum `top_n` for analytics listings.
pub const MAX_TOP_N: usize = 50;

/// Maximum hop count for shortest-path search.
///
/// The bound is interpolated into the query text (variable-length patterns
/// cannot take a parameter), so it must be validated before formatting.
pub const MAX_PATH_DEPTH: u32 = 10;

/// Maximum result count for algorithm reports.
pub const MAX_ALGORITHM_LIMIT: usize = 100;

/// Maximum PageRank iterations.
pub const MAX_PAGERANK_ITERATIONS: u32 = 100;

/// Maximum Louvain hierarchy levels.
pub const MAX_LOUVAIN_LEVELS: u32 = 20;

/// Maximum length of caller-supplied Cypher (64KB).
pub const MAX_RAW_QUERY_LENGTH: usize = 65536;

// =============================================================================
// DEFAULTS
// =============================================================================

pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const DEFAULT_PATH_DEPTH: u32 = 5;
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;
pub const DEFAULT_TOP_N: usize = 10;

/// Modularity proxy used by the fallback Louvain path when a Community has
/// no stored density.
pub const DEFAULT_COMMUNITY_DENSITY: f64 = 0.5;
