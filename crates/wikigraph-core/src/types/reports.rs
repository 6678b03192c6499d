//! Algorithm parameters, intermediate outcomes and response envelopes.
//!
//! Both the native and the fallback path produce the same `*Outcome` type;
//! the shaper turns an outcome into the `*Report` the API serializes.

use super::WikiGraphError;
use crate::primitives::{
    MAX_ALGORITHM_LIMIT, MAX_LOUVAIN_LEVELS, MAX_PAGERANK_ITERATIONS, MIN_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which implementation produced an algorithm result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmPath {
    Native,
    Fallback,
}

impl fmt::Display for AlgorithmPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Native => "native",
            Self::Fallback => "fallback",
        })
    }
}

fn check_limit(limit: usize, max: usize) -> Result<(), WikiGraphError> {
    if (MIN_LIMIT..=max).contains(&limit) {
        Ok(())
    } else {
        Err(WikiGraphError::Validation(format!(
            "limit must be between {MIN_LIMIT} and {max}, got {limit}"
        )))
    }
}

// =============================================================================
// PAGERANK
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRankParams {
    pub max_iterations: u32,
    pub damping_factor: f64,
    pub limit: usize,
}

impl Default for PageRankParams {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            damping_factor: 0.85,
            limit: 10,
        }
    }
}

impl PageRankParams {
    pub fn validate(&self) -> Result<(), WikiGraphError> {
        if !(1..=MAX_PAGERANK_ITERATIONS).contains(&self.max_iterations) {
            return Err(WikiGraphError::Validation(format!(
                "max_iterations must be between 1 and {MAX_PAGERANK_ITERATIONS}"
            )));
        }
        if !(self.damping_factor > 0.0 && self.damping_factor < 1.0) {
            return Err(WikiGraphError::Validation(
                "damping_factor must be strictly between 0 and 1".to_string(),
            ));
        }
        check_limit(self.limit, MAX_ALGORITHM_LIMIT)
    }
}

/// One scored Article before ranks are attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredArticle {
    #[serde(default)]
    pub article_id: Option<String>,
    #[serde(default)]
    pub article_title: Option<String>,
    pub score: f64,
}

/// Ranked-order PageRank rows plus the population they were drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRankOutcome {
    pub total_nodes: i64,
    pub articles: Vec<ScoredArticle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRankEntry {
    pub article_id: Option<String>,
    pub article_title: Option<String>,
    pub score: f64,
    /// 1-based position in the result list.
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRankReport {
    pub algorithm: String,
    pub total_nodes: i64,
    pub results: Vec<PageRankEntry>,
    pub execution_time_ms: f64,
}

// =============================================================================
// LOUVAIN
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LouvainParams {
    pub max_levels: u32,
    pub include_intermediate_communities: bool,
}

impl Default for LouvainParams {
    fn default() -> Self {
        Self {
            max_levels: 10,
            include_intermediate_communities: false,
        }
    }
}

impl LouvainParams {
    pub fn validate(&self) -> Result<(), WikiGraphError> {
        if (1..=MAX_LOUVAIN_LEVELS).contains(&self.max_levels) {
            Ok(())
        } else {
            Err(WikiGraphError::Validation(format!(
                "max_levels must be between 1 and {MAX_LOUVAIN_LEVELS}"
            )))
        }
    }
}

/// Community id and member count as streamed by the native Louvain query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunitySize {
    pub community_id: i64,
    pub size: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedCommunity {
    pub community_id: i64,
    pub size: i64,
    /// Per-community modularity proxy in [0, 1]. A heuristic, not the
    /// modularity of the partition.
    pub modularity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LouvainOutcome {
    /// Sorted by size, largest first.
    pub communities: Vec<DetectedCommunity>,
    /// Mean of the per-community proxies.
    pub modularity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LouvainReport {
    pub algorithm: String,
    pub total_communities: usize,
    pub modularity: f64,
    pub communities: Vec<DetectedCommunity>,
    pub execution_time_ms: f64,
}

// =============================================================================
// NODE SIMILARITY
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityParams {
    pub article_id: String,
    #[serde(default = "default_similarity_limit")]
    pub limit: usize,
    #[serde(default = "default_similarity_cutoff")]
    pub similarity_cutoff: f64,
}

fn default_similarity_limit() -> usize {
    10
}

fn default_similarity_cutoff() -> f64 {
    0.1
}

impl SimilarityParams {
    #[must_use]
    pub fn new(article_id: impl Into<String>) -> Self {
        Self {
            article_id: article_id.into(),
            limit: default_similarity_limit(),
            similarity_cutoff: default_similarity_cutoff(),
        }
    }

    pub fn validate(&self) -> Result<(), WikiGraphError> {
        if self.article_id.trim().is_empty() {
            return Err(WikiGraphError::Validation(
                "article_id must not be empty".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.similarity_cutoff) {
            return Err(WikiGraphError::Validation(
                "similarity_cutoff must be between 0 and 1".to_string(),
            ));
        }
        check_limit(self.limit, MAX_ALGORITHM_LIMIT)
    }
}

/// Display identity of the similarity source Article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceArticle {
    pub article_id: String,
    #[serde(default)]
    pub article_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarArticle {
    #[serde(default)]
    pub article_id: Option<String>,
    #[serde(default)]
    pub article_title: Option<String>,
    pub similarity_score: f64,
    pub common_neighbors: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityReport {
    pub algorithm: String,
    pub source_article_id: String,
    pub source_article_title: String,
    pub similar_articles: Vec<SimilarArticle>,
    pub count: usize,
    pub execution_time_ms: f64,
}
