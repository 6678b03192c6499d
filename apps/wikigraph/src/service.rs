//! # Graph Service
//!
//! The typed inbound boundary of WikiGraph. The HTTP API and the CLI call
//! nothing else.
//!
//! Every operation validates its arguments through the query catalog before
//! the first store call, so a rejected request never reaches the graph.

use crate::algorithms::AlgorithmOrchestrator;
use crate::config::Settings;
use crate::gateway::GraphGateway;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use wikigraph_core::query::int_column;
use wikigraph_core::{
    Analytics, AnalyticsTotals, ArticleRef, ArticleStats, CommunityStats, CypherQuery, Direction,
    EntityNode, LouvainParams, LouvainReport, PageRankParams, PageRankReport, Params, PathResult,
    Record, RecommendedArticle, Relationship, SimilarityParams, SimilarityReport, Strategy,
    Subgraph, SubgraphEdge, WikiGraphError, catalog, decode_all, decode_first, shaper,
};

// =============================================================================
// HEALTH
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseState {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: HealthStatus,
    pub database: DatabaseState,
}

/// Row shape of the shortest-path query.
#[derive(Deserialize)]
struct PathRow {
    path: Vec<ArticleRef>,
    length: i64,
}

// =============================================================================
// SERVICE
// =============================================================================

pub struct GraphService {
    gateway: Arc<GraphGateway>,
    algorithms: AlgorithmOrchestrator,
}

impl GraphService {
    /// Standard wiring over an existing gateway.
    #[must_use]
    pub fn new(gateway: Arc<GraphGateway>, native_enabled: bool) -> Self {
        let algorithms = AlgorithmOrchestrator::new(gateway.clone(), native_enabled);
        Self {
            gateway,
            algorithms,
        }
    }

    #[must_use]
    pub fn with_orchestrator(gateway: Arc<GraphGateway>, algorithms: AlgorithmOrchestrator) -> Self {
        Self {
            gateway,
            algorithms,
        }
    }

    /// Connect to the configured graph store.
    pub async fn connect(settings: &Settings) -> Result<Self, WikiGraphError> {
        let gateway = Arc::new(GraphGateway::connect(&settings.neo4j).await?);
        if !settings.algorithms.native_enabled {
            tracing::info!("Native algorithms disabled; using traversal fallbacks only");
        }
        Ok(Self::new(gateway, settings.algorithms.native_enabled))
    }

    #[must_use]
    pub fn gateway(&self) -> &Arc<GraphGateway> {
        &self.gateway
    }

    async fn read(&self, query: &CypherQuery) -> Result<Vec<Record>, WikiGraphError> {
        self.gateway.execute_read(query).await
    }

    // -------------------------------------------------------------------------
    // Generic lookup
    // -------------------------------------------------------------------------

    pub async fn search(&self, term: &str, limit: usize) -> Result<Vec<EntityNode>, WikiGraphError> {
        let query = catalog::search(term, limit)?;
        decode_all(self.read(&query).await?)
    }

    pub async fn get_entity(&self, id: i64) -> Result<EntityNode, WikiGraphError> {
        decode_first(self.read(&catalog::entity_by_id(id)).await?)?
            .ok_or_else(|| WikiGraphError::NotFound(format!("Entity with ID {id} not found")))
    }

    pub async fn get_relationships(
        &self,
        id: i64,
        direction: Direction,
    ) -> Result<Vec<Relationship>, WikiGraphError> {
        decode_all(self.read(&catalog::relationships(id, direction)).await?)
    }

    // -------------------------------------------------------------------------
    // Advanced queries
    // -------------------------------------------------------------------------

    /// Shortest REFERS_TO path between two Articles, at most `max_depth` hops.
    pub async fn shortest_path(
        &self,
        source: i64,
        target: i64,
        max_depth: u32,
    ) -> Result<PathResult, WikiGraphError> {
        catalog::validate_path_depth(max_depth)?;

        if source == target {
            let node = decode_first::<ArticleRef>(self.read(&catalog::article_by_id(source)).await?)?;
            return Ok(match node {
                Some(node) => PathResult::found(vec![node], 0),
                None => PathResult::none(),
            });
        }

        let query = catalog::shortest_path(source, target, max_depth)?;
        Ok(match decode_first::<PathRow>(self.read(&query).await?)? {
            Some(row) => PathResult::found(row.path, row.length),
            None => PathResult::none(),
        })
    }

    pub async fn recommend(
        &self,
        article_id: i64,
        limit: usize,
        strategy: Strategy,
    ) -> Result<Vec<RecommendedArticle>, WikiGraphError> {
        let query = catalog::recommend(article_id, limit, strategy)?;
        let rows: Vec<RecommendedArticle> = decode_all(self.read(&query).await?)?;
        Ok(shaper::finalize_recommendations(article_id, rows, limit))
    }

    pub async fn analytics(&self, top_n: usize) -> Result<Analytics, WikiGraphError> {
        let communities_query = catalog::top_communities(top_n)?;
        let articles_query = catalog::top_articles(top_n)?;

        let totals = match self.read(&catalog::analytics_totals()).await?.first() {
            Some(record) => AnalyticsTotals::from_raw(
                int_column(record, "total_articles")?,
                int_column(record, "total_communities")?,
                int_column(record, "refers_to_traversals")?,
            ),
            None => AnalyticsTotals::from_raw(0, 0, 0),
        };
        let top_communities: Vec<CommunityStats> =
            decode_all(self.read(&communities_query).await?)?;
        let top_articles: Vec<ArticleStats> = decode_all(self.read(&articles_query).await?)?;

        Ok(Analytics::new(totals, top_communities, top_articles))
    }

    pub async fn export_subgraph(
        &self,
        community_id: i64,
        include_cross_edges: bool,
    ) -> Result<Subgraph, WikiGraphError> {
        let nodes: Vec<ArticleRef> =
            decode_all(self.read(&catalog::subgraph_nodes(community_id)).await?)?;
        let edges: Vec<SubgraphEdge> = decode_all(
            self.read(&catalog::subgraph_edges(community_id, include_cross_edges))
                .await?,
        )?;
        Ok(Subgraph::new(community_id, nodes, edges))
    }

    pub async fn community_stats(&self, community_id: i64) -> Result<CommunityStats, WikiGraphError> {
        decode_first(self.read(&catalog::community_stats(community_id)).await?)?.ok_or_else(|| {
            WikiGraphError::NotFound(format!("Community {community_id} not found"))
        })
    }

    // -------------------------------------------------------------------------
    // Algorithms
    // -------------------------------------------------------------------------

    pub async fn run_pagerank(&self, params: PageRankParams) -> Result<PageRankReport, WikiGraphError> {
        self.algorithms.pagerank(params).await
    }

    pub async fn run_louvain(&self, params: LouvainParams) -> Result<LouvainReport, WikiGraphError> {
        self.algorithms.louvain(params).await
    }

    pub async fn run_similarity(
        &self,
        params: SimilarityParams,
    ) -> Result<SimilarityReport, WikiGraphError> {
        self.algorithms.similarity(params).await
    }

    // -------------------------------------------------------------------------
    // Raw Cypher
    // -------------------------------------------------------------------------

    pub async fn raw_read(&self, text: &str, params: Params) -> Result<Vec<Record>, WikiGraphError> {
        let query = CypherQuery::raw(text, params)?;
        self.gateway.execute_read(&query).await
    }

    pub async fn raw_write(&self, text: &str, params: Params) -> Result<Vec<Record>, WikiGraphError> {
        let query = CypherQuery::raw(text, params)?;
        self.gateway.execute_write(&query).await
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    pub async fn health(&self) -> Health {
        if self.gateway.verify_connectivity().await {
            Health {
                status: HealthStatus::Healthy,
                database: DatabaseState::Connected,
            }
        } else {
            Health {
                status: HealthStatus::Degraded,
                database: DatabaseState::Disconnected,
            }
        }
    }

    /// Startup housekeeping for the native algorithm engine.
    pub async fn reclaim_projections(&self) -> usize {
        self.algorithms.reclaim_projections().await
    }

    pub async fn close(&self) {
        if self.gateway.is_closed().await {
            tracing::debug!("Graph gateway already closed");
            return;
        }
        self.gateway.close().await;
    }
}
