//! # Query Catalog
//!
//! Every graph read or write the service performs outside the algorithm
//! engine is built here, from typed arguments, as a [`CypherQuery`].
//!
//! Rules every entry follows:
//! - Arguments are validated first; a rejected argument never produces text.
//! - Caller values are bound as parameters. The shortest-path depth is the
//!   only interpolated value, and it is range-checked beforehand.
//! - Rankings carry an explicit secondary order so results are stable.

use crate::primitives::{
    MAX_PATH_DEPTH, MAX_RECOMMENDATION_LIMIT, MAX_SEARCH_LIMIT, MAX_SEARCH_TERM_LENGTH, MAX_TOP_N,
    MIN_LIMIT,
};
use crate::query::CypherQuery;
use crate::types::{Direction, Strategy, WikiGraphError};

/// Check a result limit against `MIN_LIMIT..=max`.
pub fn validate_limit(name: &str, value: usize, max: usize) -> Result<(), WikiGraphError> {
    if (MIN_LIMIT..=max).contains(&value) {
        Ok(())
    } else {
        Err(WikiGraphError::Validation(format!(
            "{name} must be between {MIN_LIMIT} and {max}, got {value}"
        )))
    }
}

/// Liveness probe sent by the gateway.
#[must_use]
pub fn connectivity_probe() -> CypherQuery {
    CypherQuery::new("RETURN 1 AS ok")
}

// =============================================================================
// GENERIC LOOKUP
// =============================================================================

/// Case-insensitive substring match on `name` or `title`, across all labels.
pub fn search(term: &str, limit: usize) -> Result<CypherQuery, WikiGraphError> {
    if term.trim().is_empty() {
        return Err(WikiGraphError::Validation(
            "search term must not be empty".to_string(),
        ));
    }
    if term.chars().count() > MAX_SEARCH_TERM_LENGTH {
        return Err(WikiGraphError::Validation(format!(
            "search term exceeds {MAX_SEARCH_TERM_LENGTH} characters"
        )));
    }
    validate_limit("limit", limit, MAX_SEARCH_LIMIT)?;

    Ok(CypherQuery::new(
        "MATCH (n)
         WHERE toLower(n.name) CONTAINS toLower($search_term)
            OR toLower(n.title) CONTAINS toLower($search_term)
         RETURN id(n) AS id, labels(n) AS labels, properties(n) AS properties
         ORDER BY id
         LIMIT $limit",
    )
    .param("search_term", term)
    .param("limit", limit))
}

/// A node by internal engine id.
#[must_use]
pub fn entity_by_id(id: i64) -> CypherQuery {
    CypherQuery::new(
        "MATCH (n)
         WHERE id(n) = $entity_id
         RETURN id(n) AS id, labels(n) AS labels, properties(n) AS properties",
    )
    .param("entity_id", id)
}

/// Relationships of a node, filtered by direction.
///
/// For `Both` the endpoints come from `startNode(r)` / `endNode(r)` so the
/// stored direction is reported, not the match direction.
#[must_use]
pub fn relationships(id: i64, direction: Direction) -> CypherQuery {
    let text = match direction {
        Direction::Outgoing => {
            "MATCH (n)-[r]->(m)
             WHERE id(n) = $entity_id
             RETURN id(r) AS id, type(r) AS type,
                    id(n) AS start_node_id, id(m) AS end_node_id,
                    properties(r) AS properties
             ORDER BY id"
        }
        Direction::Incoming => {
            "MATCH (n)<-[r]-(m)
             WHERE id(n) = $entity_id
             RETURN id(r) AS id, type(r) AS type,
                    id(m) AS start_node_id, id(n) AS end_node_id,
                    properties(r) AS properties
             ORDER BY id"
        }
        Direction::Both => {
            "MATCH (n)-[r]-(m)
             WHERE id(n) = $entity_id
             RETURN id(r) AS id, type(r) AS type,
                    id(startNode(r)) AS start_node_id, id(endNode(r)) AS end_node_id,
                    properties(r) AS properties
             ORDER BY id"
        }
    };
    CypherQuery::new(text).param("entity_id", id)
}

// =============================================================================
// PATHS
// =============================================================================

/// Check a shortest-path hop bound.
pub fn validate_path_depth(max_depth: u32) -> Result<(), WikiGraphError> {
    if (1..=MAX_PATH_DEPTH).contains(&max_depth) {
        Ok(())
    } else {
        Err(WikiGraphError::Validation(format!(
            "max_depth must be between 1 and {MAX_PATH_DEPTH}, got {max_depth}"
        )))
    }
}

/// Undirected shortest path over REFERS_TO, at most `max_depth` hops.
///
/// No row back means no path within the bound.
pub fn shortest_path(source: i64, target: i64, max_depth: u32) -> Result<CypherQuery, WikiGraphError> {
    validate_path_depth(max_depth)?;
    let text = format!(
        "MATCH (source:Article {{id: $source_id}})
         MATCH (target:Article {{id: $target_id}})
         MATCH path = shortestPath((source)-[:REFERS_TO*..{max_depth}]-(target))
         RETURN [node IN nodes(path) | {{
                    id: node.id,
                    target: node.target,
                    community_id: node.community_id
                }}] AS path,
                length(path) AS length
         LIMIT 1"
    );
    Ok(CypherQuery::new(text)
        .param("source_id", source)
        .param("target_id", target))
}

/// An Article by its numeric `id` property.
#[must_use]
pub fn article_by_id(id: i64) -> CypherQuery {
    CypherQuery::new(
        "MATCH (a:Article {id: $article_id})
         RETURN a.id AS id, a.target AS target, a.community_id AS community_id
         LIMIT 1",
    )
    .param("article_id", id)
}

/// Display identity of an Article by its string `article_id`.
///
/// Resolved before any similarity work; no row back means the source does
/// not exist.
#[must_use]
pub fn similarity_source(article_id: &str) -> CypherQuery {
    CypherQuery::new(
        "MATCH (a:Article {article_id: $article_id})
         RETURN a.article_id AS article_id, a.article_title AS article_title
         LIMIT 1",
    )
    .param("article_id", article_id)
}

// =============================================================================
// RECOMMENDATIONS
// =============================================================================

/// Recommendations for an Article under one strategy.
pub fn recommend(
    article_id: i64,
    limit: usize,
    strategy: Strategy,
) -> Result<CypherQuery, WikiGraphError> {
    validate_limit("limit", limit, MAX_RECOMMENDATION_LIMIT)?;

    let text = match strategy {
        Strategy::Community => {
            "MATCH (source:Article {id: $article_id})-[:BELONGS_TO]->(c:Community)
             MATCH (recommended:Article)-[:BELONGS_TO]->(c)
             WHERE recommended.id <> $article_id
             RETURN recommended.id AS id,
                    recommended.target AS target,
                    recommended.community_id AS community_id,
                    coalesce(toFloat(c.avg_traffic), 0.0) AS score,
                    'Same community (ID: ' + toString(c.community_id) + ')' AS reason
             ORDER BY score DESC, id ASC
             LIMIT $limit"
        }
        Strategy::References => {
            "MATCH (source:Article {id: $article_id})-[:REFERS_TO]-(neighbor:Article)
             MATCH (neighbor)-[:REFERS_TO]-(recommended:Article)
             WHERE recommended.id <> $article_id
               AND NOT (source)-[:REFERS_TO]-(recommended)
             WITH recommended, count(DISTINCT neighbor) AS common_neighbors
             RETURN recommended.id AS id,
                    recommended.target AS target,
                    recommended.community_id AS community_id,
                    toFloat(common_neighbors) AS score,
                    toString(common_neighbors) + ' common references' AS reason
             ORDER BY score DESC, id ASC
             LIMIT $limit"
        }
        Strategy::Hybrid => {
            "MATCH (source:Article {id: $article_id})
             OPTIONAL MATCH (source)-[:BELONGS_TO]->(:Community)<-[:BELONGS_TO]-(peer:Article)
             WHERE peer.id <> $article_id
             WITH source, collect(DISTINCT peer) AS peers
             OPTIONAL MATCH (source)-[:REFERS_TO]-(:Article)-[:REFERS_TO]-(connected:Article)
             WHERE connected.id <> $article_id
               AND NOT (source)-[:REFERS_TO]-(connected)
             WITH peers + collect(DISTINCT connected) AS candidates
             UNWIND candidates AS recommended
             WITH DISTINCT recommended
             RETURN recommended.id AS id,
                    recommended.target AS target,
                    recommended.community_id AS community_id,
                    1.0 AS score,
                    'Hybrid recommendation' AS reason
             ORDER BY id ASC
             LIMIT $limit"
        }
    };

    Ok(CypherQuery::new(text)
        .param("article_id", article_id)
        .param("limit", limit))
}

// =============================================================================
// ANALYTICS
// =============================================================================

/// Raw whole-graph counts.
///
/// `refers_to_traversals` counts each REFERS_TO edge once per direction;
/// [`crate::types::AnalyticsTotals::from_raw`] halves it. Each count runs in
/// its own subquery so an empty label still yields a row.
#[must_use]
pub fn analytics_totals() -> CypherQuery {
    CypherQuery::new(
        "CALL { MATCH (a:Article) RETURN count(a) AS total_articles }
         CALL { MATCH (c:Community) RETURN count(c) AS total_communities }
         CALL { MATCH ()-[r:REFERS_TO]-() RETURN count(r) AS refers_to_traversals }
         RETURN total_articles, total_communities, refers_to_traversals",
    )
}

const COMMUNITY_STATS_PROJECTION: &str = "
         OPTIONAL MATCH (a:Article)-[:BELONGS_TO]->(c)
         WITH c, count(a) AS article_count
         OPTIONAL MATCH (a1:Article)-[:BELONGS_TO]->(c)
         OPTIONAL MATCH (a1)-[r:REFERS_TO]-(a2:Article)-[:BELONGS_TO]->(c)
         WITH c, article_count, count(DISTINCT r) AS internal_edges
         RETURN toInteger(c.community_id) AS community_id,
                toInteger(c.size) AS size,
                toFloat(c.density) AS density,
                toFloat(c.avg_degree) AS avg_degree,
                toFloat(c.avg_traffic) AS avg_traffic,
                toFloat(c.median_traffic) AS median_traffic,
                toString(c.level) AS level,
                article_count,
                internal_edges";

/// Communities with the most member Articles.
pub fn top_communities(top_n: usize) -> Result<CypherQuery, WikiGraphError> {
    validate_limit("top_n", top_n, MAX_TOP_N)?;
    let text = format!(
        "MATCH (c:Community){COMMUNITY_STATS_PROJECTION}
         ORDER BY article_count DESC, community_id ASC
         LIMIT $top_n"
    );
    Ok(CypherQuery::new(text).param("top_n", top_n))
}

/// Articles with the highest REFERS_TO degree.
pub fn top_articles(top_n: usize) -> Result<CypherQuery, WikiGraphError> {
    validate_limit("top_n", top_n, MAX_TOP_N)?;
    Ok(CypherQuery::new(
        "MATCH (a:Article)
         OPTIONAL MATCH (a)-[r:REFERS_TO]-()
         WITH a, count(r) AS degree
         RETURN a.id AS article_id,
                degree,
                a.community_id AS community_id,
                a.target AS target
         ORDER BY degree DESC, article_id ASC
         LIMIT $top_n",
    )
    .param("top_n", top_n))
}

/// The stats row of one Community. No row back means no such Community.
#[must_use]
pub fn community_stats(community_id: i64) -> CypherQuery {
    let text =
        format!("MATCH (c:Community {{community_id: $community_id}}){COMMUNITY_STATS_PROJECTION}");
    CypherQuery::new(text).param("community_id", community_id)
}

// =============================================================================
// SUBGRAPH EXPORT
// =============================================================================

/// Member Articles of a Community.
#[must_use]
pub fn subgraph_nodes(community_id: i64) -> CypherQuery {
    CypherQuery::new(
        "MATCH (a:Article)-[:BELONGS_TO]->(:Community {community_id: $community_id})
         RETURN a.id AS id, a.target AS target, a.community_id AS community_id
         ORDER BY id",
    )
    .param("community_id", community_id)
}

/// Edges of a Community's subgraph.
///
/// Internal-only edges are enumerated once each (`id(a1) < id(a2)`). With
/// cross edges every member's incident REFERS_TO edge is listed from the
/// member's side, together with the neighbour's community.
#[must_use]
pub fn subgraph_edges(community_id: i64, include_cross_edges: bool) -> CypherQuery {
    let text = if include_cross_edges {
        "MATCH (a1:Article)-[:BELONGS_TO]->(:Community {community_id: $community_id})
         MATCH (a1)-[:REFERS_TO]-(a2:Article)
         RETURN DISTINCT a1.id AS source, a2.id AS target, a2.community_id AS target_community
         ORDER BY source, target"
    } else {
        "MATCH (a1:Article)-[:BELONGS_TO]->(c:Community {community_id: $community_id})
         MATCH (a1)-[:REFERS_TO]-(a2:Article)-[:BELONGS_TO]->(c)
         WHERE id(a1) < id(a2)
         RETURN a1.id AS source, a2.id AS target, a2.community_id AS target_community
         ORDER BY source, target"
    };
    CypherQuery::new(text).param("community_id", community_id)
}

// =============================================================================
// TESTS
// =============================================================================
