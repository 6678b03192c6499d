//! # Native Algorithm Queries
//!
//! Query text for the graph engine's algorithm procedures, and the pure
//! post-processing applied to what they stream back.
//!
//! Projections are addressed by `$graph_name`; the name is never formatted
//! into the text. Text-valued properties are not loaded into projections
//! (the engine only projects numeric properties); display identity is
//! resolved per streamed node with `gds.util.asNode`.

use crate::projection::{AlgorithmKind, ProjectionName};
use crate::query::CypherQuery;
use crate::types::{
    CommunitySize, DetectedCommunity, LouvainOutcome, LouvainParams, PageRankParams,
    SimilarArticle, SimilarityParams,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// PROJECTION LIFECYCLE
// =============================================================================

/// Row yielded by a successful projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionInfo {
    pub graph_name: String,
    pub node_count: i64,
    pub relationship_count: i64,
}

/// Project Article / REFERS_TO under `name`, oriented for its algorithm.
#[must_use]
pub fn project(name: &ProjectionName) -> CypherQuery {
    let text = if name.kind().undirected() {
        "CALL gds.graph.project(
             $graph_name,
             'Article',
             {REFERS_TO: {orientation: 'UNDIRECTED'}}
         )
         YIELD graphName, nodeCount, relationshipCount
         RETURN graphName, nodeCount, relationshipCount"
    } else {
        "CALL gds.graph.project($graph_name, 'Article', 'REFERS_TO')
         YIELD graphName, nodeCount, relationshipCount
         RETURN graphName, nodeCount, relationshipCount"
    };
    CypherQuery::new(text).param("graph_name", name.as_str())
}

/// Drop `name`, succeeding when it does not exist (`failIfMissing = false`).
#[must_use]
pub fn drop_projection(name: &ProjectionName) -> CypherQuery {
    CypherQuery::new(
        "CALL gds.graph.drop($graph_name, false)
         YIELD graphName
         RETURN graphName",
    )
    .param("graph_name", name.as_str())
}

/// One entry of the engine's projection catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedProjection {
    pub graph_name: String,
}

/// Every projection currently held by the engine, any owner.
#[must_use]
pub fn list_projections() -> CypherQuery {
    CypherQuery::new(
        "CALL gds.graph.list()
         YIELD graphName
         RETURN graphName
         ORDER BY graphName",
    )
}

// =============================================================================
// ALGORITHM STREAMS
// =============================================================================

/// PageRank over the projection, L1-normalised across the whole stream
/// before truncation.
#[must_use]
pub fn pagerank_stream(name: &ProjectionName, params: &PageRankParams) -> CypherQuery {
    debug_assert_eq!(name.kind(), AlgorithmKind::PageRank);
    CypherQuery::new(
        "CALL gds.pageRank.stream($graph_name, {
             maxIterations: $max_iterations,
             dampingFactor: $damping_factor
         })
         YIELD nodeId, score
         WITH collect({node_id: nodeId, raw: score}) AS rows, sum(score) AS total
         UNWIND rows AS row
         WITH gds.util.asNode(row.node_id) AS article,
              CASE WHEN total > 0 THEN row.raw / total ELSE 0.0 END AS score
         RETURN article.article_id AS article_id,
                article.article_title AS article_title,
                score
         ORDER BY score DESC, article_id ASC
         LIMIT $limit",
    )
    .param("graph_name", name.as_str())
    .param("max_iterations", params.max_iterations)
    .param("damping_factor", params.damping_factor)
    .param("limit", params.limit)
}

/// Louvain over the projection, grouped into community sizes.
#[must_use]
pub fn louvain_stream(name: &ProjectionName, params: &LouvainParams) -> CypherQuery {
    debug_assert_eq!(name.kind(), AlgorithmKind::Louvain);
    CypherQuery::new(
        "CALL gds.louvain.stream($graph_name, {
             maxLevels: $max_levels,
             includeIntermediateCommunities: $include_intermediate
         })
         YIELD nodeId, communityId
         WITH communityId, count(*) AS size
         RETURN communityId AS community_id, size
         ORDER BY size DESC, community_id ASC",
    )
    .param("graph_name", name.as_str())
    .param("max_levels", params.max_levels)
    .param("include_intermediate", params.include_intermediate_communities)
}

/// Node Similarity over the projection, keeping pairs that start at the
/// source Article.
#[must_use]
pub fn similarity_stream(name: &ProjectionName, params: &SimilarityParams) -> CypherQuery {
    debug_assert_eq!(name.kind(), AlgorithmKind::NodeSimilarity);
    CypherQuery::new(
        "CALL gds.nodeSimilarity.stream($graph_name, {
             similarityCutoff: $similarity_cutoff
         })
         YIELD node1, node2, similarity
         WITH gds.util.asNode(node1) AS source, gds.util.asNode(node2) AS target, similarity
         WHERE source.article_id = $article_id
         RETURN target.article_id AS article_id,
                target.article_title AS article_title,
                similarity AS similarity_score
         ORDER BY similarity_score DESC, article_id ASC
         LIMIT $limit",
    )
    .param("graph_name", name.as_str())
    .param("article_id", params.article_id.as_str())
    .param("similarity_cutoff", params.similarity_cutoff)
    .param("limit", params.limit)
}

// =============================================================================
// POST-PROCESSING
// =============================================================================

/// Turn streamed community sizes into a Louvain outcome.
///
/// Per-community proxy: `min(size / (2 × mean size), 1.0)`. Overall: mean of
/// the proxies. A heuristic for comparing runs, not true modularity.
#[must_use]
pub fn louvain_summary(mut sizes: Vec<CommunitySize>) -> LouvainOutcome {
    sizes.sort_by(|a, b| {
        b.size
            .cmp(&a.size)
            .then_with(|| a.community_id.cmp(&b.community_id))
    });

    if sizes.is_empty() {
        return LouvainOutcome {
            communities: Vec::new(),
            modularity: 0.0,
        };
    }

    let count = sizes.len() as f64;
    let mean_size = sizes.iter().map(|c| c.size as f64).sum::<f64>() / count;

    let communities: Vec<DetectedCommunity> = sizes
        .into_iter()
        .map(|c| DetectedCommunity {
            community_id: c.community_id,
            size: c.size,
            modularity: if mean_size > 0.0 {
                (c.size as f64 / (2.0 * mean_size)).min(1.0)
            } else {
                0.0
            },
        })
        .collect();

    let modularity = communities.iter().map(|c| c.modularity).sum::<f64>() / count;
    LouvainOutcome {
        communities,
        modularity,
    }
}

/// Shared-neighbour count reported alongside a native similarity score.
///
/// The native stream carries only the Jaccard score, so this is an estimate:
/// `round(similarity × 10)`. The fallback path reports exact counts.
#[must_use]
pub fn estimated_common_neighbors(similarity: f64) -> i64 {
    (similarity * 10.0).round() as i64
}

/// One streamed native similarity row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeSimilarRow {
    #[serde(default)]
    pub article_id: Option<String>,
    #[serde(default)]
    pub article_title: Option<String>,
    pub similarity_score: f64,
}

impl From<NativeSimilarRow> for SimilarArticle {
    fn from(row: NativeSimilarRow) -> Self {
        Self {
            common_neighbors: estimated_common_neighbors(row.similarity_score),
            article_id: row.article_id,
            article_title: row.article_title,
            similarity_score: row.similarity_score,
        }
    }
}
