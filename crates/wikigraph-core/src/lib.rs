//! # wikigraph-core
//!
//! The query and analytics logic of WikiGraph - THE LOGIC.
//!
//! WikiGraph serves an encyclopedia-derived property graph (Articles,
//! Communities, REFERS_TO and BELONGS_TO edges) held in an external graph
//! engine. This crate knows how to ask that engine questions and how to make
//! sense of the answers; it never talks to it.
//!
//! ## Layout
//!
//! - [`catalog`] builds parameterized Cypher for lookups, paths,
//!   recommendations, analytics and subgraph export.
//! - [`gds`] builds the native algorithm calls and post-processes their
//!   streams.
//! - [`fallback`] computes degree centrality, stored-partition summaries and
//!   exact Jaccard similarity from plain traversal rows.
//! - [`projection`] names projections and enumerates their lifecycle.
//! - [`shaper`] attaches ranks and timings and assembles reports.
//!
//! ## Architectural Constraints
//!
//! - NO async, NO network dependencies (pure Rust)
//! - Deterministic: identical rows in give identical results out
//! - Caller input reaches the engine only as bound parameters

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod fallback;
pub mod gds;
pub mod primitives;
pub mod projection;
pub mod query;
pub mod shaper;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Analytics, AnalyticsTotals, ArticleRef, ArticleStats, CommunityStats, Direction, EntityNode,
    PathResult, Properties, RecommendedArticle, Relationship, Strategy, Subgraph, SubgraphEdge,
    WikiGraphError,
};

// =============================================================================
// RE-EXPORTS: Algorithms
// =============================================================================

pub use types::{
    AlgorithmPath, CommunitySize, DetectedCommunity, LouvainOutcome, LouvainParams, LouvainReport,
    PageRankEntry, PageRankOutcome, PageRankParams, PageRankReport, ScoredArticle, SimilarArticle,
    SimilarityParams, SimilarityReport, SourceArticle,
};

pub use projection::{AlgorithmKind, ProjectionName, ProjectionStage};

// =============================================================================
// RE-EXPORTS: Queries
// =============================================================================

pub use query::{CypherQuery, Params, Record, decode, decode_all, decode_first};
