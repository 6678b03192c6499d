//! # Fallback Algorithms
//!
//! Traversal-based stand-ins for the native algorithms, used when the
//! algorithm engine is absent or fails.
//!
//! Each fallback is split in two: a plain Cypher fetch of the raw
//! neighbourhood data, and a pure computation over the fetched rows that
//! produces the same outcome type as the native path.
//!
//! | Native | Fallback |
//! |--------|----------|
//! | PageRank | degree centrality, `degree / Σ degree` |
//! | Louvain | persisted Community assignments, stored density as proxy |
//! | Node Similarity | exact Jaccard over REFERS_TO neighbour sets |
//!
//! Scores are comparable to the native ones, not identical.

use crate::primitives::DEFAULT_COMMUNITY_DENSITY;
use crate::query::CypherQuery;
use crate::types::{
    DetectedCommunity, LouvainOutcome, PageRankOutcome, ScoredArticle, SimilarArticle,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

// =============================================================================
// DEGREE CENTRALITY (PageRank stand-in)
// =============================================================================

/// REFERS_TO degree of every Article.
#[must_use]
pub fn degree_listing() -> CypherQuery {
    CypherQuery::new(
        "MATCH (a:Article)
         OPTIONAL MATCH (a)-[r:REFERS_TO]-()
         RETURN a.article_id AS article_id,
                a.article_title AS article_title,
                count(r) AS degree",
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeRow {
    #[serde(default)]
    pub article_id: Option<String>,
    #[serde(default)]
    pub article_title: Option<String>,
    pub degree: i64,
}

/// Rank Articles by their share of the total degree.
///
/// Every Article scores `degree / Σ degree`, so scores across the full
/// listing sum to 1 (or are all 0 when there are no edges). Ties are broken
/// by `article_id`.
#[must_use]
pub fn degree_centrality(rows: Vec<DegreeRow>, limit: usize) -> PageRankOutcome {
    let total_nodes = rows.len() as i64;
    let total_degree: i64 = rows.iter().map(|r| r.degree.max(0)).sum();

    let mut articles: Vec<ScoredArticle> = rows
        .into_iter()
        .map(|row| ScoredArticle {
            score: if total_degree > 0 {
                row.degree.max(0) as f64 / total_degree as f64
            } else {
                0.0
            },
            article_id: row.article_id,
            article_title: row.article_title,
        })
        .collect();

    articles.sort_by(|a, b| by_score_then_id(a.score, b.score, &a.article_id, &b.article_id));
    articles.truncate(limit);

    PageRankOutcome {
        total_nodes,
        articles,
    }
}

// =============================================================================
// PERSISTED COMMUNITIES (Louvain stand-in)
// =============================================================================

/// Every Community with its live member count and stored density.
#[must_use]
pub fn community_membership() -> CypherQuery {
    CypherQuery::new(
        "MATCH (c:Community)
         OPTIONAL MATCH (a:Article)-[:BELONGS_TO]->(c)
         WITH c, count(a) AS size
         RETURN toInteger(c.community_id) AS community_id,
                size,
                toFloat(c.density) AS density",
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipRow {
    pub community_id: i64,
    pub size: i64,
    #[serde(default)]
    pub density: Option<f64>,
}

/// Report the stored partition as a Louvain outcome.
///
/// Communities without members are left out. Each community's proxy is its
/// stored density ([`DEFAULT_COMMUNITY_DENSITY`] when absent); the overall
/// value is their mean.
#[must_use]
pub fn community_labels(rows: Vec<MembershipRow>) -> LouvainOutcome {
    let mut communities: Vec<DetectedCommunity> = rows
        .into_iter()
        .filter(|row| row.size > 0)
        .map(|row| DetectedCommunity {
            community_id: row.community_id,
            size: row.size,
            modularity: row.density.unwrap_or(DEFAULT_COMMUNITY_DENSITY),
        })
        .collect();

    communities.sort_by(|a, b| {
        b.size
            .cmp(&a.size)
            .then_with(|| a.community_id.cmp(&b.community_id))
    });

    let modularity = if communities.is_empty() {
        0.0
    } else {
        communities.iter().map(|c| c.modularity).sum::<f64>() / communities.len() as f64
    };

    LouvainOutcome {
        communities,
        modularity,
    }
}

// =============================================================================
// JACCARD SIMILARITY (Node Similarity stand-in)
// =============================================================================

/// Neighbour sets of the source Article and of every distance-2 candidate.
///
/// Candidates exclude the source and its direct neighbours. One row per
/// candidate; each row repeats the source's neighbour set. Neighbours are
/// identified by internal node id.
#[must_use]
pub fn neighborhood(article_id: &str) -> CypherQuery {
    CypherQuery::new(
        "MATCH (source:Article {article_id: $article_id})
         OPTIONAL MATCH (source)-[:REFERS_TO]-(n)
         WITH source, collect(DISTINCT id(n)) AS source_neighbors
         OPTIONAL MATCH (source)-[:REFERS_TO]-(:Article)-[:REFERS_TO]-(candidate:Article)
         WHERE candidate.article_id <> $article_id
           AND NOT (source)-[:REFERS_TO]-(candidate)
         WITH source_neighbors, collect(DISTINCT candidate) AS candidates
         UNWIND candidates AS candidate
         OPTIONAL MATCH (candidate)-[:REFERS_TO]-(m)
         RETURN source_neighbors,
                candidate.article_id AS article_id,
                candidate.article_title AS article_title,
                collect(DISTINCT id(m)) AS candidate_neighbors",
    )
    .param("article_id", article_id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborhoodRow {
    #[serde(default)]
    pub source_neighbors: Vec<i64>,
    #[serde(default)]
    pub article_id: Option<String>,
    #[serde(default)]
    pub article_title: Option<String>,
    #[serde(default)]
    pub candidate_neighbors: Vec<i64>,
}

/// Exact Jaccard similarity `|S ∩ C| / |S ∪ C|` between the source's
/// neighbour set `S` and each candidate's set `C`.
///
/// Keeps scores at or above `cutoff`, best first (ties by `article_id`),
/// at most `limit` of them. `common_neighbors` is the exact `|S ∩ C|`.
#[must_use]
pub fn jaccard_similar(rows: &[NeighborhoodRow], cutoff: f64, limit: usize) -> Vec<SimilarArticle> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let source: BTreeSet<i64> = first.source_neighbors.iter().copied().collect();

    let mut similar: Vec<SimilarArticle> = rows
        .iter()
        .filter_map(|row| {
            let candidate: BTreeSet<i64> = row.candidate_neighbors.iter().copied().collect();
            let common = source.intersection(&candidate).count();
            let union = source.len() + candidate.len() - common;
            if union == 0 {
                return None;
            }
            let score = common as f64 / union as f64;
            (score >= cutoff).then(|| SimilarArticle {
                article_id: row.article_id.clone(),
                article_title: row.article_title.clone(),
                similarity_score: score,
                common_neighbors: common as i64,
            })
        })
        .collect();

    similar.sort_by(|a, b| {
        by_score_then_id(
            a.similarity_score,
            b.similarity_score,
            &a.article_id,
            &b.article_id,
        )
    });
    similar.truncate(limit);
    similar
}

/// Descending score, then ascending id.
fn by_score_then_id(
    score_a: f64,
    score_b: f64,
    id_a: &Option<String>,
    id_b: &Option<String>,
) -> Ordering {
    score_b
        .partial_cmp(&score_a)
        .unwrap_or(Ordering::Equal)
        .then_with(|| id_a.cmp(id_b))
}
